//! In-memory backend for tests.
//!
//! Every call is appended to a request log before anything else happens, so
//! tests can assert both what was sent and that nothing was sent. Failures
//! are scripted with [`FakeBackend::fail_next`] and consumed in order.

use async_trait::async_trait;
use caseorg_client::{ApiError, Backend, Result};
use caseorg_types::{
    Ack, CaseLawQuery, CaseLawResults, CaseMatch, CaseSelection, DirListing, DirPath,
    NextInvoiceNumber, NoteFetch, SearchQuery, SearchResultRecord,
};
use std::collections::{BTreeMap, HashMap, VecDeque};
use tokio::sync::Mutex;

use crate::fixtures::NOTE_TEMPLATE;

pub struct FakeBackend {
    requests: Mutex<Vec<String>>,
    failures: Mutex<VecDeque<ApiError>>,
    search_results: Mutex<Vec<SearchResultRecord>>,
    dirs: Mutex<HashMap<DirPath, DirListing>>,
    years: Mutex<Vec<String>>,
    months: Mutex<BTreeMap<String, Vec<String>>>,
    cases: Mutex<BTreeMap<(String, String), Vec<String>>>,
    notes: Mutex<HashMap<CaseSelection, String>>,
    case_law: Mutex<CaseLawResults>,
    case_law_notes: Mutex<HashMap<i64, String>>,
    next_invoice: Mutex<Option<String>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            failures: Mutex::new(VecDeque::new()),
            search_results: Mutex::new(Vec::new()),
            dirs: Mutex::new(HashMap::new()),
            years: Mutex::new(Vec::new()),
            months: Mutex::new(BTreeMap::new()),
            cases: Mutex::new(BTreeMap::new()),
            notes: Mutex::new(HashMap::new()),
            case_law: Mutex::new(CaseLawResults::default()),
            case_law_notes: Mutex::new(HashMap::new()),
            next_invoice: Mutex::new(Some("INV-0001".to_string())),
        }
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests received so far, oldest first
    pub async fn requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }

    pub async fn clear_requests(&self) {
        self.requests.lock().await.clear();
    }

    /// Make the next call fail with `error`
    pub async fn fail_next(&self, error: ApiError) {
        self.failures.lock().await.push_back(error);
    }

    pub async fn set_search_results(&self, results: Vec<SearchResultRecord>) {
        *self.search_results.lock().await = results;
    }

    pub async fn set_dir(&self, path: DirPath, listing: DirListing) {
        self.dirs.lock().await.insert(path, listing);
    }

    pub async fn set_years(&self, years: &[&str]) {
        *self.years.lock().await = years.iter().map(|y| y.to_string()).collect();
    }

    pub async fn set_months(&self, year: &str, months: &[&str]) {
        self.months.lock().await.insert(
            year.to_string(),
            months.iter().map(|m| m.to_string()).collect(),
        );
    }

    pub async fn set_cases(&self, year: &str, month: &str, cases: &[&str]) {
        self.cases.lock().await.insert(
            (year.to_string(), month.to_string()),
            cases.iter().map(|c| c.to_string()).collect(),
        );
    }

    pub async fn set_note(&self, case: CaseSelection, content: &str) {
        self.notes.lock().await.insert(case, content.to_string());
    }

    pub async fn note(&self, case: &CaseSelection) -> Option<String> {
        self.notes.lock().await.get(case).cloned()
    }

    pub async fn set_case_law(&self, results: CaseLawResults) {
        *self.case_law.lock().await = results;
    }

    pub async fn set_next_invoice(&self, number: Option<&str>) {
        *self.next_invoice.lock().await = number.map(str::to_string);
    }

    /// Log the request, then fail if a failure is scripted
    async fn call(&self, request: String) -> Result<()> {
        self.requests.lock().await.push(request);
        match self.failures.lock().await.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn query_string(pairs: &[(&'static str, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}

#[async_trait]
impl Backend for FakeBackend {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResultRecord>> {
        self.call(format!("search {}", query_string(&query.pairs())))
            .await?;
        Ok(self.search_results.lock().await.clone())
    }

    async fn dir_tree(&self, path: &DirPath) -> Result<DirListing> {
        self.call(format!("dir_tree {}", path)).await?;
        Ok(self.dirs.lock().await.get(path).cloned().unwrap_or_default())
    }

    async fn years(&self) -> Result<Vec<String>> {
        self.call("years".to_string()).await?;
        Ok(self.years.lock().await.clone())
    }

    async fn months(&self, year: &str) -> Result<Vec<String>> {
        self.call(format!("months {}", year)).await?;
        Ok(self.months.lock().await.get(year).cloned().unwrap_or_default())
    }

    async fn cases(&self, year: &str, month: &str) -> Result<Vec<String>> {
        self.call(format!("cases {}/{}", year, month)).await?;
        let key = (year.to_string(), month.to_string());
        Ok(self.cases.lock().await.get(&key).cloned().unwrap_or_default())
    }

    async fn search_cases(&self, query: &str) -> Result<Vec<CaseMatch>> {
        self.call(format!("search_cases {}", query)).await?;
        let needle = query.to_lowercase();
        let cases = self.cases.lock().await;
        Ok(cases
            .iter()
            .flat_map(|((year, month), names)| {
                names.iter().map(move |name| CaseMatch {
                    case_name: name.clone(),
                    year: year.clone(),
                    month: month.clone(),
                })
            })
            .filter(|hit| hit.case_name.to_lowercase().contains(&needle))
            .collect())
    }

    async fn fetch_note(&self, case: &CaseSelection) -> Result<NoteFetch> {
        self.call(format!("fetch_note {}", case)).await?;
        Ok(match self.notes.lock().await.get(case) {
            Some(content) => NoteFetch {
                ok: true,
                content: Some(content.clone()),
                ..NoteFetch::default()
            },
            None => NoteFetch {
                ok: false,
                template: Some(NOTE_TEMPLATE.to_string()),
                msg: Some("Note.json not found".to_string()),
                ..NoteFetch::default()
            },
        })
    }

    async fn update_note(&self, case: &CaseSelection, content: &str) -> Result<Ack> {
        self.call(format!("update_note {} {}", case, content))
            .await?;
        self.notes
            .lock()
            .await
            .insert(case.clone(), content.to_string());
        Ok(Ack::ok())
    }

    async fn create_note(&self, case: &CaseSelection, content: &str) -> Result<Ack> {
        self.call(format!("create_note {} {}", case, content))
            .await?;
        let mut notes = self.notes.lock().await;
        if notes.contains_key(case) {
            return Err(ApiError::rejected("Note.json already exists"));
        }
        notes.insert(case.clone(), content.to_string());
        Ok(Ack::ok())
    }

    async fn fetch_case_law_note(&self, id: i64) -> Result<Ack> {
        self.call(format!("fetch_case_law_note {}", id)).await?;
        let content = self
            .case_law_notes
            .lock()
            .await
            .get(&id)
            .cloned()
            .unwrap_or_default();
        Ok(Ack {
            content: Some(content),
            ..Ack::ok()
        })
    }

    async fn save_case_law_note(&self, id: i64, content: &str) -> Result<Ack> {
        self.call(format!("save_case_law_note {} {}", id, content))
            .await?;
        self.case_law_notes
            .lock()
            .await
            .insert(id, content.to_string());
        Ok(Ack::ok())
    }

    async fn delete_file(&self, path: &str) -> Result<Ack> {
        self.call(format!("delete_file {}", path)).await?;
        self.search_results
            .lock()
            .await
            .retain(|record| record.path != path);
        Ok(Ack::ok())
    }

    async fn search_case_law(&self, query: &CaseLawQuery) -> Result<CaseLawResults> {
        self.call(format!("search_case_law {}", query_string(&query.pairs())))
            .await?;
        Ok(self.case_law.lock().await.clone())
    }

    async fn next_invoice_number(&self) -> Result<NextInvoiceNumber> {
        self.call("next_invoice_number".to_string()).await?;
        Ok(NextInvoiceNumber {
            ok: true,
            invoice_number: self.next_invoice.lock().await.clone(),
            msg: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_failure_is_consumed_once() {
        let backend = FakeBackend::new();
        backend.fail_next(ApiError::status(502, None)).await;

        assert!(backend.years().await.is_err());
        assert!(backend.years().await.is_ok());
        assert_eq!(backend.requests().await, vec!["years", "years"]);
    }

    #[tokio::test]
    async fn test_missing_note_offers_template() {
        let backend = FakeBackend::new();
        let fetch = backend
            .fetch_note(&CaseSelection::new("2024", "Mar", "Doe v. Roe"))
            .await
            .unwrap();
        assert!(!fetch.ok);
        assert_eq!(fetch.template.as_deref(), Some(NOTE_TEMPLATE));
    }
}
