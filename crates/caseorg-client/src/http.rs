use async_trait::async_trait;
use caseorg_types::{
    Ack, Acknowledged, CaseLawQuery, CaseLawResults, CaseMatch, CaseSearchResponse,
    CaseSelection, CasesResponse, CreateNoteBody, DeleteFileBody, DirListing, DirPath,
    MonthsResponse, NextInvoiceNumber, NoteBody, NoteFetch, SearchQuery, SearchResponse,
    SearchResultRecord, YearsResponse,
};
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::backend::Backend;
use crate::error::{ApiError, Result};

/// Talks to the case-organizer web backend. No retries: a failed call is
/// reported once and the caller decides what to show.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Fails when the HTTP client cannot be set up (no TLS backend, for one)
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn note_path(case: &CaseSelection) -> String {
        format!(
            "/api/note/{}/{}/{}",
            urlencoding::encode(&case.year),
            urlencoding::encode(&case.month),
            urlencoding::encode(&case.case_name)
        )
    }

    #[instrument(name = "caseorg_get", skip(self, query), level = "debug")]
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T> {
        let resp = self.client.get(self.url(path)).query(query).send().await?;
        decode(resp).await
    }

    #[instrument(name = "caseorg_post", skip(self, body), level = "debug")]
    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let resp = self.client.post(self.url(path)).json(body).send().await?;
        decode(resp).await
    }

    async fn post_ack<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<Ack> {
        let ack: Ack = self.post_json(path, body).await?;
        ensure_ok(ack)
    }
}

/// Non-2xx → `Status` (with the body's `msg` when it has one),
/// otherwise parse the body as `T`.
async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    let bytes = resp.bytes().await?;
    if !status.is_success() {
        let message = serde_json::from_slice::<Ack>(&bytes)
            .ok()
            .and_then(|ack| ack.msg);
        debug!(status = status.as_u16(), ?message, "backend returned failure status");
        return Err(ApiError::status(status.as_u16(), message));
    }
    Ok(serde_json::from_slice(&bytes)?)
}

fn ensure_ok<T: Acknowledged>(body: T) -> Result<T> {
    if body.is_ok() {
        Ok(body)
    } else {
        Err(ApiError::Rejected {
            message: body.message().map(str::to_string),
        })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResultRecord>> {
        let body: SearchResponse = self.get_json("/search", &query.pairs()).await?;
        Ok(body.results)
    }

    async fn dir_tree(&self, path: &DirPath) -> Result<DirListing> {
        let query = [("path", path.as_str().to_string())];
        let listing: DirListing = self.get_json("/api/dir-tree", &query).await?;
        match listing.error {
            Some(error) => Err(ApiError::rejected(error)),
            None => Ok(listing),
        }
    }

    async fn years(&self) -> Result<Vec<String>> {
        let body: YearsResponse = self.get_json("/api/years", &[]).await?;
        Ok(body.years)
    }

    async fn months(&self, year: &str) -> Result<Vec<String>> {
        let query = [("year", year.to_string())];
        let body: MonthsResponse = self.get_json("/api/months", &query).await?;
        Ok(body.months)
    }

    async fn cases(&self, year: &str, month: &str) -> Result<Vec<String>> {
        let query = [("year", year.to_string()), ("month", month.to_string())];
        let body: CasesResponse = self.get_json("/api/cases", &query).await?;
        Ok(body.cases)
    }

    async fn search_cases(&self, query: &str) -> Result<Vec<CaseMatch>> {
        let query = [("q", query.to_string())];
        let body: CaseSearchResponse = self.get_json("/api/cases/search", &query).await?;
        Ok(body.cases)
    }

    #[instrument(skip(self), level = "debug")]
    async fn fetch_note(&self, case: &CaseSelection) -> Result<NoteFetch> {
        let resp = self
            .client
            .get(self.url(&Self::note_path(case)))
            .send()
            .await?;
        // A missing note answers 404 with a template body; that is a valid probe result.
        if resp.status() == StatusCode::NOT_FOUND {
            let bytes = resp.bytes().await?;
            return match serde_json::from_slice::<NoteFetch>(&bytes) {
                Ok(fetch) => Ok(fetch),
                Err(_) => Err(ApiError::status(404, None)),
            };
        }
        decode(resp).await
    }

    async fn update_note(&self, case: &CaseSelection, content: &str) -> Result<Ack> {
        let body = NoteBody {
            content: content.to_string(),
        };
        self.post_ack(&Self::note_path(case), &body).await
    }

    async fn create_note(&self, case: &CaseSelection, content: &str) -> Result<Ack> {
        let body = CreateNoteBody {
            year: case.year.clone(),
            month: case.month.clone(),
            case: case.case_name.clone(),
            content: content.to_string(),
        };
        self.post_ack("/api/create-note", &body).await
    }

    async fn fetch_case_law_note(&self, id: i64) -> Result<Ack> {
        let ack: Ack = self
            .get_json(&format!("/case-law/{}/note", id), &[])
            .await?;
        ensure_ok(ack)
    }

    async fn save_case_law_note(&self, id: i64, content: &str) -> Result<Ack> {
        let body = NoteBody {
            content: content.to_string(),
        };
        self.post_ack(&format!("/case-law/{}/note", id), &body).await
    }

    async fn delete_file(&self, path: &str) -> Result<Ack> {
        let body = DeleteFileBody {
            path: path.to_string(),
        };
        self.post_ack("/api/delete-file", &body).await
    }

    async fn search_case_law(&self, query: &CaseLawQuery) -> Result<CaseLawResults> {
        let results: CaseLawResults = self.get_json("/case-law/search", &query.pairs()).await?;
        match results.error {
            Some(error) => Err(ApiError::rejected(error)),
            None => Ok(results),
        }
    }

    async fn next_invoice_number(&self) -> Result<NextInvoiceNumber> {
        let body: NextInvoiceNumber = self.get_json("/api/invoices/next-number", &[]).await?;
        ensure_ok(body)
    }
}
