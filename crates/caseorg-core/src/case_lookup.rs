//! Year → Month → Case cascade.
//!
//! Each stage's options load asynchronously after the upstream choice.
//! Completions are checked against the selection as it is when they
//! arrive, so a reload from an earlier choice can never overwrite a newer
//! one. Note and invoice availability are derived from the current state.

use caseorg_client::{ApiError, Backend};
use caseorg_types::{
    CaseMatch, CaseSelection, NOTE_FILE_NAME, NextInvoiceNumber, NoteContext, NoteFetch,
};
use tracing::{debug, info, warn};

use crate::generation::{Applied, GenerationCounter, RequestToken};
use crate::note_editor::{NoteEditor, NoteIntent, SaveOutcome, SaveTarget};
use crate::{Error, Result};

pub const NOTE_BUTTON_LABEL: &str = "View / Edit";

/// Options of one selector
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionList {
    pub options: Vec<String>,
    pub enabled: bool,
    pub loading: bool,
}

impl OptionList {
    fn disabled() -> Self {
        Self::default()
    }

    fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    fn loaded(options: Vec<String>) -> Self {
        Self {
            options,
            enabled: true,
            loading: false,
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.options.iter().any(|option| option == value)
    }
}

/// Note action for the selected case
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NoteButton {
    #[default]
    Hidden,
    /// Existence probe in flight
    Checking,
    /// A note exists and opens in update posture
    Update { content: String },
}

impl NoteButton {
    pub fn is_visible(&self) -> bool {
        matches!(self, NoteButton::Update { .. })
    }

    pub fn label(&self) -> Option<String> {
        match self {
            NoteButton::Update { .. } => Some(format!("{} {}", NOTE_BUTTON_LABEL, NOTE_FILE_NAME)),
            NoteButton::Hidden | NoteButton::Checking => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthsRequest {
    token: RequestToken,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CasesRequest {
    token: RequestToken,
    pub year: String,
    pub month: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteProbe {
    token: RequestToken,
    pub case: CaseSelection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSearchRequest {
    token: RequestToken,
    pub query: String,
}

/// Everything an invoice form needs up front
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDraft {
    pub case: CaseSelection,
    /// Suggested number; absent when the backend could not provide one
    pub invoice_number: Option<String>,
}

#[derive(Debug, Default)]
pub struct CaseLookupController {
    selection: CaseSelection,
    years: OptionList,
    months: OptionList,
    cases: OptionList,
    note: NoteButton,
    note_template: Option<String>,
    matches: Vec<CaseMatch>,
    months_generation: GenerationCounter,
    cases_generation: GenerationCounter,
    probe_generation: GenerationCounter,
    search_generation: GenerationCounter,
}

impl CaseLookupController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &CaseSelection {
        &self.selection
    }

    pub fn years(&self) -> &OptionList {
        &self.years
    }

    pub fn months(&self) -> &OptionList {
        &self.months
    }

    pub fn cases(&self) -> &OptionList {
        &self.cases
    }

    pub fn note_button(&self) -> &NoteButton {
        &self.note
    }

    /// Template offered by the backend for a case without a note
    pub fn note_template(&self) -> Option<&str> {
        self.note_template.as_deref()
    }

    pub fn matches(&self) -> &[CaseMatch] {
        &self.matches
    }

    /// Invoices need the full triple; note existence does not matter
    pub fn invoice_enabled(&self) -> bool {
        self.selection.is_complete()
    }

    pub fn complete_years(
        &mut self,
        result: std::result::Result<Vec<String>, ApiError>,
    ) -> Result<()> {
        let years = result.inspect_err(|err| warn!(error = %err, "loading years failed"))?;
        self.years = OptionList::loaded(years);
        Ok(())
    }

    pub async fn load_years(&mut self, backend: &dyn Backend) -> Result<()> {
        self.years.loading = true;
        let result = backend.years().await;
        self.years.loading = false;
        self.complete_years(result)
    }

    /// Choosing a year clears month and case. An empty year leaves both
    /// selectors empty and disabled.
    pub fn select_year(&mut self, year: impl Into<String>) -> Option<MonthsRequest> {
        let year = year.into();
        self.selection.set_year(year.trim());
        self.cases = OptionList::disabled();
        self.cases_generation.invalidate();
        self.reset_note();

        if self.selection.year.is_empty() {
            self.months = OptionList::disabled();
            self.months_generation.invalidate();
            return None;
        }
        self.months = OptionList::loading();
        Some(MonthsRequest {
            token: self.months_generation.next(),
            year: self.selection.year.clone(),
        })
    }

    pub fn complete_months(
        &mut self,
        request: MonthsRequest,
        result: std::result::Result<Vec<String>, ApiError>,
    ) -> Result<Applied> {
        if !self.months_generation.is_current(request.token) || self.selection.year != request.year
        {
            debug!(year = %request.year, "discarding stale months");
            return Ok(Applied::Discarded);
        }
        self.months.loading = false;
        let months = result.inspect_err(|err| warn!(error = %err, "loading months failed"))?;
        self.months = OptionList::loaded(months);
        Ok(Applied::Applied)
    }

    /// Choosing a month clears the case
    pub fn select_month(&mut self, month: impl Into<String>) -> Option<CasesRequest> {
        let month = month.into();
        self.selection.set_month(month.trim());
        self.reset_note();

        if self.selection.year.is_empty() || self.selection.month.is_empty() {
            self.cases = OptionList::disabled();
            self.cases_generation.invalidate();
            return None;
        }
        self.cases = OptionList::loading();
        Some(CasesRequest {
            token: self.cases_generation.next(),
            year: self.selection.year.clone(),
            month: self.selection.month.clone(),
        })
    }

    pub fn complete_cases(
        &mut self,
        request: CasesRequest,
        result: std::result::Result<Vec<String>, ApiError>,
    ) -> Result<Applied> {
        if !self.cases_generation.is_current(request.token)
            || self.selection.year != request.year
            || self.selection.month != request.month
        {
            debug!(year = %request.year, month = %request.month, "discarding stale cases");
            return Ok(Applied::Discarded);
        }
        self.cases.loading = false;
        let cases = result.inspect_err(|err| warn!(error = %err, "loading cases failed"))?;
        self.cases = OptionList::loaded(cases);
        Ok(Applied::Applied)
    }

    /// Choosing a case probes for its note once the triple is complete
    pub fn select_case(&mut self, case_name: impl Into<String>) -> Option<NoteProbe> {
        let case_name = case_name.into();
        self.selection.set_case(case_name.trim());
        self.reset_note();
        self.probe_current()
    }

    fn probe_current(&mut self) -> Option<NoteProbe> {
        if !self.selection.is_complete() {
            return None;
        }
        self.note = NoteButton::Checking;
        Some(NoteProbe {
            token: self.probe_generation.next(),
            case: self.selection.clone(),
        })
    }

    /// A missing note hides the button and keeps the creation template.
    /// A failed probe hides it too.
    pub fn complete_probe(
        &mut self,
        probe: NoteProbe,
        result: std::result::Result<NoteFetch, ApiError>,
    ) -> Result<Applied> {
        if !self.probe_generation.is_current(probe.token) || self.selection != probe.case {
            debug!(case = %probe.case, "discarding stale note probe");
            return Ok(Applied::Discarded);
        }
        self.note = NoteButton::Hidden;
        let fetch = result.inspect_err(|err| warn!(error = %err, "note probe failed"))?;
        if fetch.ok {
            self.note = NoteButton::Update {
                content: fetch.content.unwrap_or_default(),
            };
            self.note_template = None;
        } else {
            self.note_template = fetch.template;
        }
        debug!(case = %probe.case, exists = fetch.ok, "note probe applied");
        Ok(Applied::Applied)
    }

    fn reset_note(&mut self) {
        self.note = NoteButton::Hidden;
        self.note_template = None;
        self.probe_generation.invalidate();
    }

    pub async fn change_year(
        &mut self,
        backend: &dyn Backend,
        year: impl Into<String>,
    ) -> Result<Applied> {
        let Some(request) = self.select_year(year) else {
            return Ok(Applied::Applied);
        };
        let result = backend.months(&request.year).await;
        self.complete_months(request, result)
    }

    pub async fn change_month(
        &mut self,
        backend: &dyn Backend,
        month: impl Into<String>,
    ) -> Result<Applied> {
        let Some(request) = self.select_month(month) else {
            return Ok(Applied::Applied);
        };
        let result = backend.cases(&request.year, &request.month).await;
        self.complete_cases(request, result)
    }

    pub async fn change_case(
        &mut self,
        backend: &dyn Backend,
        case_name: impl Into<String>,
    ) -> Result<Applied> {
        let Some(probe) = self.select_case(case_name) else {
            return Ok(Applied::Applied);
        };
        let result = backend.fetch_note(&probe.case).await;
        self.complete_probe(probe, result)
    }

    /// Start a case name search. A blank query clears the matches and
    /// sends nothing.
    pub fn begin_name_search(&mut self, query: &str) -> Option<NameSearchRequest> {
        let query = query.trim();
        let token = self.search_generation.next();
        if query.is_empty() {
            self.matches.clear();
            return None;
        }
        Some(NameSearchRequest {
            token,
            query: query.to_string(),
        })
    }

    pub fn complete_name_search(
        &mut self,
        request: NameSearchRequest,
        result: std::result::Result<Vec<CaseMatch>, ApiError>,
    ) -> Result<Applied> {
        if !self.search_generation.is_current(request.token) {
            return Ok(Applied::Discarded);
        }
        self.matches = result.inspect_err(|err| warn!(error = %err, "case search failed"))?;
        Ok(Applied::Applied)
    }

    pub async fn search_by_name(&mut self, backend: &dyn Backend, query: &str) -> Result<Applied> {
        let Some(request) = self.begin_name_search(query) else {
            return Ok(Applied::Applied);
        };
        let result = backend.search_cases(&request.query).await;
        self.complete_name_search(request, result)
    }

    /// Back-fill year, month and case from a search hit, waiting for each
    /// cascading load before the next step.
    pub async fn apply_match(&mut self, backend: &dyn Backend, hit: &CaseMatch) -> Result<()> {
        self.change_year(backend, hit.year.as_str()).await?;
        if !self.months.contains(&hit.month) {
            debug!(month = %hit.month, "matched month not among loaded options");
        }
        self.change_month(backend, hit.month.as_str()).await?;
        self.change_case(backend, hit.case_name.as_str()).await?;
        info!(case = %self.selection, "case selected from search");
        Ok(())
    }

    /// Open the existing note for the selected case
    pub fn open_note(&self, editor: &mut NoteEditor) -> Result<()> {
        let NoteButton::Update { content } = &self.note else {
            return Err(Error::validation("No note exists for this case"));
        };
        editor.open(
            content.clone(),
            NoteIntent::Update,
            NoteContext::Case(self.selection.clone()),
        );
        Ok(())
    }

    /// Open the editor to create the note for the selected case
    pub fn open_create_note(&self, editor: &mut NoteEditor) -> Result<()> {
        if !self.selection.is_complete() {
            return Err(Error::validation("Select year, month and case first"));
        }
        match &self.note {
            NoteButton::Update { .. } => {
                return Err(Error::validation("A note already exists for this case"));
            }
            NoteButton::Checking => {
                return Err(Error::validation("Still checking for an existing note"));
            }
            NoteButton::Hidden => {}
        }
        editor.open(
            self.note_template.clone().unwrap_or_default(),
            NoteIntent::Create,
            NoteContext::Case(self.selection.clone()),
        );
        Ok(())
    }

    /// Re-probe once a save for the selected case reached the backend. This
    /// holds even when the editor no longer wanted the answer: the note
    /// exists either way.
    pub fn after_save_landed(&mut self, target: &SaveTarget) -> Option<NoteProbe> {
        self.reprobe_if_selected(target.case())
    }

    fn reprobe_if_selected(&mut self, case: Option<&CaseSelection>) -> Option<NoteProbe> {
        match case {
            Some(case) if *case == self.selection => self.probe_current(),
            _ => None,
        }
    }

    pub async fn refresh_note(
        &mut self,
        backend: &dyn Backend,
        outcome: &SaveOutcome,
    ) -> Result<Applied> {
        let Some(probe) = self.reprobe_if_selected(outcome.saved_case()) else {
            return Ok(Applied::Discarded);
        };
        let result = backend.fetch_note(&probe.case).await;
        self.complete_probe(probe, result)
    }

    /// Case an invoice would be raised against
    pub fn begin_invoice(&self) -> Result<CaseSelection> {
        if !self.invoice_enabled() {
            return Err(Error::validation(
                "Select year, month and case before creating an invoice",
            ));
        }
        Ok(self.selection.clone())
    }

    /// The next number is a best-effort lookup; its failure only costs the
    /// suggestion.
    pub fn complete_invoice(
        case: CaseSelection,
        result: std::result::Result<NextInvoiceNumber, ApiError>,
    ) -> InvoiceDraft {
        let invoice_number = match result {
            Ok(next) => next.invoice_number,
            Err(err) => {
                warn!(error = %err, "could not prefill invoice number");
                None
            }
        };
        InvoiceDraft {
            case,
            invoice_number,
        }
    }

    /// Invoice prefill for the selected case
    pub async fn prepare_invoice(&self, backend: &dyn Backend) -> Result<InvoiceDraft> {
        let case = self.begin_invoice()?;
        let result = backend.next_invoice_number().await;
        Ok(Self::complete_invoice(case, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseorg_testing::{FakeBackend, fixtures};

    async fn seeded() -> FakeBackend {
        let backend = FakeBackend::new();
        fixtures::seed_doe_v_roe(&backend).await;
        backend
    }

    #[tokio::test]
    async fn test_cascade_to_note_button() {
        let backend = seeded().await;
        let mut lookup = CaseLookupController::new();

        lookup.change_year(&backend, "2024").await.unwrap();
        assert!(lookup.months().enabled);
        assert!(lookup.months().contains("Mar"));
        assert!(!lookup.cases().enabled);
        assert!(!lookup.invoice_enabled());

        lookup.change_month(&backend, "Mar").await.unwrap();
        assert!(lookup.cases().contains("Doe v. Roe"));
        assert!(!lookup.note_button().is_visible());

        lookup.change_case(&backend, "Doe v. Roe").await.unwrap();
        assert!(lookup.note_button().is_visible());
        assert_eq!(
            lookup.note_button().label().as_deref(),
            Some("View / Edit Note.json")
        );
        assert!(lookup.invoice_enabled());
        assert_eq!(
            backend.requests().await,
            vec![
                "months 2024",
                "cases 2024/Mar",
                "fetch_note 2024/Mar/Doe v. Roe"
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_note_keeps_template_and_allows_create() {
        let backend = seeded().await;
        let mut lookup = CaseLookupController::new();
        lookup.change_year(&backend, "2024").await.unwrap();
        lookup.change_month(&backend, "Mar").await.unwrap();
        lookup.change_case(&backend, "State v. Kumar").await.unwrap();

        assert!(!lookup.note_button().is_visible());
        assert!(lookup.invoice_enabled());
        assert_eq!(lookup.note_template(), Some(fixtures::NOTE_TEMPLATE));

        let mut editor = NoteEditor::new();
        assert!(lookup.open_note(&mut editor).is_err());
        lookup.open_create_note(&mut editor).unwrap();
        assert_eq!(editor.intent(), NoteIntent::Create);
        assert_eq!(editor.buffer(), fixtures::NOTE_TEMPLATE);
    }

    #[test]
    fn test_upstream_change_resets_downstream() {
        let mut lookup = CaseLookupController::new();
        let months = lookup.select_year("2024").unwrap();
        lookup.complete_months(months, Ok(vec!["Mar".into()])).unwrap();
        let cases = lookup.select_month("Mar").unwrap();
        lookup.complete_cases(cases, Ok(vec!["Doe v. Roe".into()])).unwrap();
        lookup.select_case("Doe v. Roe");

        assert!(lookup.select_year("").is_none());
        assert_eq!(lookup.selection(), &CaseSelection::default());
        assert_eq!(lookup.months(), &OptionList::default());
        assert_eq!(lookup.cases(), &OptionList::default());
        assert_eq!(lookup.note_button(), &NoteButton::Hidden);
    }

    #[test]
    fn test_out_of_order_months_are_discarded() {
        let mut lookup = CaseLookupController::new();
        let first = lookup.select_year("2023");
        let second = lookup.select_year("2024");

        let applied = lookup
            .complete_months(second.unwrap(), Ok(vec!["Mar".into()]))
            .unwrap();
        assert!(applied.was_applied());
        let stale = lookup
            .complete_months(first.unwrap(), Ok(vec!["Jan".into()]))
            .unwrap();

        assert_eq!(stale, Applied::Discarded);
        assert_eq!(lookup.months().options, vec!["Mar".to_string()]);
    }

    #[test]
    fn test_cases_for_previous_year_are_discarded() {
        let mut lookup = CaseLookupController::new();
        let months = lookup.select_year("2024").unwrap();
        lookup.complete_months(months, Ok(vec!["Mar".into()])).unwrap();
        let cases = lookup.select_month("Mar").unwrap();
        lookup.select_year("2025");

        let applied = lookup
            .complete_cases(cases, Ok(vec!["Doe v. Roe".into()]))
            .unwrap();
        assert_eq!(applied, Applied::Discarded);
        assert!(!lookup.cases().enabled);
    }

    #[test]
    fn test_probe_for_replaced_case_is_discarded() {
        let mut lookup = CaseLookupController::new();
        let months = lookup.select_year("2024").unwrap();
        lookup.complete_months(months, Ok(vec!["Mar".into()])).unwrap();
        let cases = lookup.select_month("Mar").unwrap();
        lookup.complete_cases(cases, Ok(vec!["A".into(), "B".into()])).unwrap();
        let probe_a = lookup.select_case("A").unwrap();
        let _probe_b = lookup.select_case("B").unwrap();

        let found = NoteFetch {
            ok: true,
            content: Some("{}".into()),
            ..NoteFetch::default()
        };
        assert_eq!(
            lookup.complete_probe(probe_a, Ok(found)).unwrap(),
            Applied::Discarded
        );
        assert_eq!(lookup.note_button(), &NoteButton::Checking);
    }

    #[tokio::test]
    async fn test_failed_probe_hides_note() {
        let backend = seeded().await;
        let mut lookup = CaseLookupController::new();
        lookup.change_year(&backend, "2024").await.unwrap();
        lookup.change_month(&backend, "Mar").await.unwrap();
        backend.fail_next(ApiError::status(500, None)).await;

        let err = lookup.change_case(&backend, "Doe v. Roe").await.unwrap_err();

        assert_eq!(err.user_message(), "Request failed (HTTP 500)");
        assert!(!lookup.note_button().is_visible());
        assert!(lookup.invoice_enabled());
    }

    #[tokio::test]
    async fn test_apply_match_backfills_triple() {
        let backend = seeded().await;
        let mut lookup = CaseLookupController::new();

        lookup.search_by_name(&backend, "roe").await.unwrap();
        let hit = lookup.matches()[0].clone();
        lookup.apply_match(&backend, &hit).await.unwrap();

        assert_eq!(lookup.selection(), &CaseSelection::new("2024", "Mar", "Doe v. Roe"));
        assert!(lookup.note_button().is_visible());
    }

    #[tokio::test]
    async fn test_blank_name_search_sends_nothing() {
        let backend = seeded().await;
        let mut lookup = CaseLookupController::new();
        lookup.search_by_name(&backend, "   ").await.unwrap();
        assert!(lookup.matches().is_empty());
        assert!(backend.requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_invoice_requires_triple_and_tolerates_number_failure() {
        let backend = seeded().await;
        let mut lookup = CaseLookupController::new();
        assert!(matches!(
            lookup.prepare_invoice(&backend).await,
            Err(Error::Validation(_))
        ));
        assert!(backend.requests().await.is_empty());

        lookup.change_year(&backend, "2024").await.unwrap();
        lookup.change_month(&backend, "Mar").await.unwrap();
        lookup.change_case(&backend, "State v. Kumar").await.unwrap();
        backend.fail_next(ApiError::Transport("timed out".into())).await;

        let draft = lookup.prepare_invoice(&backend).await.unwrap();
        assert_eq!(draft.invoice_number, None);
        assert_eq!(draft.case.case_name, "State v. Kumar");
    }

    #[tokio::test]
    async fn test_note_save_refreshes_button() {
        let backend = seeded().await;
        let mut lookup = CaseLookupController::new();
        lookup.change_year(&backend, "2024").await.unwrap();
        lookup.change_month(&backend, "Mar").await.unwrap();
        lookup.change_case(&backend, "State v. Kumar").await.unwrap();

        let mut editor = NoteEditor::new();
        lookup.open_create_note(&mut editor).unwrap();
        editor.set_buffer("{\"stage\": \"admission\"}");
        let outcome = editor.save(&backend).await.unwrap();
        lookup.refresh_note(&backend, &outcome).await.unwrap();

        assert!(lookup.note_button().is_visible());
    }

    #[tokio::test]
    async fn test_create_landing_after_close_still_refreshes_button() {
        let backend = seeded().await;
        let mut lookup = CaseLookupController::new();
        lookup.change_year(&backend, "2024").await.unwrap();
        lookup.change_month(&backend, "Mar").await.unwrap();
        lookup.change_case(&backend, "State v. Kumar").await.unwrap();

        let mut editor = NoteEditor::new();
        lookup.open_create_note(&mut editor).unwrap();
        editor.set_buffer("{\"stage\": \"admission\"}");
        let request = editor.begin_save().unwrap();
        let target = request.target.clone();
        let result = backend.create_note(target.case().unwrap(), &request.content).await;
        editor.close();

        let outcome = editor.complete_save(request, result).unwrap();
        assert_eq!(outcome, SaveOutcome::Discarded);

        let probe = lookup.after_save_landed(&target).unwrap();
        let fetched = backend.fetch_note(&probe.case).await;
        lookup.complete_probe(probe, fetched).unwrap();
        assert!(lookup.note_button().is_visible());
        assert!(lookup.open_create_note(&mut editor).is_err());
    }

    #[tokio::test]
    async fn test_load_years() {
        let backend = seeded().await;
        let mut lookup = CaseLookupController::new();
        lookup.load_years(&backend).await.unwrap();
        assert_eq!(lookup.years().options, vec!["2023", "2024"]);
    }
}
