use async_trait::async_trait;
use caseorg_types::{
    Ack, CaseLawQuery, CaseLawResults, CaseMatch, CaseSelection, DirListing, DirPath,
    NextInvoiceNumber, NoteFetch, SearchQuery, SearchResultRecord,
};

use crate::error::Result;

/// Every backend endpoint the browser core depends on.
///
/// Methods returning [`Ack`] only return `Ok` for acknowledged (`ok: true`)
/// answers. [`Backend::fetch_note`] is the exception: a missing note is a
/// normal answer (`ok: false`, usually with a template), not an error.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET /search`
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResultRecord>>;

    /// `GET /api/dir-tree?path=`
    async fn dir_tree(&self, path: &DirPath) -> Result<DirListing>;

    /// `GET /api/years`
    async fn years(&self) -> Result<Vec<String>>;

    /// `GET /api/months?year=`
    async fn months(&self, year: &str) -> Result<Vec<String>>;

    /// `GET /api/cases?year=&month=`
    async fn cases(&self, year: &str, month: &str) -> Result<Vec<String>>;

    /// `GET /api/cases/search?q=`
    async fn search_cases(&self, query: &str) -> Result<Vec<CaseMatch>>;

    /// `GET /api/note/{year}/{month}/{case}`
    async fn fetch_note(&self, case: &CaseSelection) -> Result<NoteFetch>;

    /// `POST /api/note/{year}/{month}/{case}`
    async fn update_note(&self, case: &CaseSelection, content: &str) -> Result<Ack>;

    /// `POST /api/create-note`
    async fn create_note(&self, case: &CaseSelection, content: &str) -> Result<Ack>;

    /// `GET /case-law/{id}/note`
    async fn fetch_case_law_note(&self, id: i64) -> Result<Ack>;

    /// `POST /case-law/{id}/note`
    async fn save_case_law_note(&self, id: i64, content: &str) -> Result<Ack>;

    /// `POST /api/delete-file`
    async fn delete_file(&self, path: &str) -> Result<Ack>;

    /// `GET /case-law/search`
    async fn search_case_law(&self, query: &CaseLawQuery) -> Result<CaseLawResults>;

    /// `GET /api/invoices/next-number`
    async fn next_invoice_number(&self) -> Result<NextInvoiceNumber>;
}
