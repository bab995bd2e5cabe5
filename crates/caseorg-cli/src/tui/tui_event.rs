use caseorg_client::ApiError;
use caseorg_core::case_law::CaseLawSearchRequest;
use caseorg_core::case_lookup::{CasesRequest, MonthsRequest, NameSearchRequest, NoteProbe};
use caseorg_core::directory::LevelRequest;
use caseorg_core::note_editor::SaveRequest;
use caseorg_core::results::DeleteRequest;
use caseorg_core::search::SearchRequest;
use caseorg_types::{
    Ack, CaseLawResults, CaseMatch, CaseSelection, DirListing, NextInvoiceNumber, NoteFetch,
    SearchResultRecord,
};

type Answer<T> = Result<T, ApiError>;

/// Backend answers delivered to the UI thread, each paired with the
/// request it completes
#[derive(Debug)]
pub enum TuiEvent {
    Years(Answer<Vec<String>>),
    Months(MonthsRequest, Answer<Vec<String>>),
    Cases(CasesRequest, Answer<Vec<String>>),
    NoteProbe(NoteProbe, Answer<NoteFetch>),
    NameSearch(NameSearchRequest, Answer<Vec<CaseMatch>>),
    Search(SearchRequest, Answer<Vec<SearchResultRecord>>),
    Level(LevelRequest, Answer<DirListing>),
    CaseLaw(CaseLawSearchRequest, Answer<CaseLawResults>),
    CaseLawNote(i64, Answer<Ack>),
    NoteSaved(SaveRequest, Answer<Ack>),
    Deleted(DeleteRequest, Answer<Ack>),
    Invoice(CaseSelection, Answer<NextInvoiceNumber>),
}
