//! Case-law library search and per-judgement notes.

use std::sync::mpsc;

use caseorg_client::{ApiError, Backend};
use caseorg_types::{Ack, CaseLawQuery, CaseLawRecord, CaseLawResults, NoteContext, SearchResultRecord};
use tracing::{debug, warn};

use crate::Result;
use crate::generation::{Applied, GenerationCounter, RequestToken};
use crate::note_editor::{NoteEditor, NoteIntent};
use crate::results::{RecordRow, ResultsRenderer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseLawSearchRequest {
    token: RequestToken,
    pub query: CaseLawQuery,
}

/// Keeps the last case-law hits and renders them on the shared surface.
/// Note previews saved through the editor flow back via a channel.
pub struct CaseLawBrowser {
    records: Vec<CaseLawRecord>,
    year_filters: Vec<String>,
    generation: GenerationCounter,
    preview_tx: mpsc::Sender<(i64, String)>,
    preview_rx: mpsc::Receiver<(i64, String)>,
}

impl Default for CaseLawBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl CaseLawBrowser {
    pub fn new() -> Self {
        let (preview_tx, preview_rx) = mpsc::channel();
        Self {
            records: Vec::new(),
            year_filters: Vec::new(),
            generation: GenerationCounter::new(),
            preview_tx,
            preview_rx,
        }
    }

    pub fn records(&self) -> &[CaseLawRecord] {
        &self.records
    }

    /// Decision years offered by the last search
    pub fn year_filters(&self) -> &[String] {
        &self.year_filters
    }

    pub fn record(&self, id: i64) -> Option<&CaseLawRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Case-law record behind a rendered row
    pub fn record_for_row(&self, row: &RecordRow) -> Option<&CaseLawRecord> {
        self.records
            .iter()
            .find(|record| record.to_search_record() == row.record)
    }

    pub fn begin_search(&mut self, query: CaseLawQuery) -> CaseLawSearchRequest {
        CaseLawSearchRequest {
            token: self.generation.next(),
            query,
        }
    }

    pub fn complete_search(
        &mut self,
        renderer: &mut ResultsRenderer,
        request: CaseLawSearchRequest,
        result: std::result::Result<CaseLawResults, ApiError>,
    ) -> Applied {
        if !self.generation.is_current(request.token) {
            debug!("discarding superseded case-law search");
            return Applied::Discarded;
        }
        match result {
            Ok(results) => {
                self.records = results.results;
                self.year_filters = results.filters.years;
                let rows: Vec<SearchResultRecord> = self
                    .records
                    .iter()
                    .map(CaseLawRecord::to_search_record)
                    .collect();
                renderer.render_read_only(&rows);
            }
            Err(err) => {
                warn!(error = %err, "case-law search failed");
                if !renderer.is_held() {
                    renderer.show_error(err.user_message());
                }
            }
        }
        Applied::Applied
    }

    /// Results arriving after this call are ignored
    pub fn abandon(&mut self) {
        self.generation.invalidate();
    }

    pub async fn search(
        &mut self,
        backend: &dyn Backend,
        renderer: &mut ResultsRenderer,
        query: CaseLawQuery,
    ) -> Applied {
        let request = self.begin_search(query);
        let result = backend.search_case_law(&request.query).await;
        self.complete_search(renderer, request, result)
    }

    /// Open a fetched judgement note in the editor. A successful save
    /// reports its preview back to this browser.
    pub fn show_note(
        &self,
        editor: &mut NoteEditor,
        id: i64,
        result: std::result::Result<Ack, ApiError>,
    ) -> Result<()> {
        let ack = result.inspect_err(|err| warn!(id, error = %err, "fetching case-law note failed"))?;
        editor.open(
            ack.content.unwrap_or_default(),
            NoteIntent::Update,
            NoteContext::CaseLaw { id },
        );
        let tx = self.preview_tx.clone();
        editor.set_preview_callback(move |preview| {
            // receiver is dropped with the browser
            let _ = tx.send((id, preview.to_string()));
        });
        Ok(())
    }

    pub async fn open_note(
        &self,
        backend: &dyn Backend,
        editor: &mut NoteEditor,
        id: i64,
    ) -> Result<()> {
        let result = backend.fetch_case_law_note(id).await;
        self.show_note(editor, id, result)
    }

    /// Apply previews reported since the last call
    pub fn sync_previews(&mut self) -> usize {
        let mut applied = 0;
        while let Ok((id, preview)) = self.preview_rx.try_recv() {
            if let Some(record) = self.records.iter_mut().find(|record| record.id == id) {
                record.note_preview = preview;
                applied += 1;
            }
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::confirm::{ConfirmPolicy, NativeConfirm};
    use crate::directory::DirectoryNavigator;
    use crate::results::RendererSettings;
    use caseorg_testing::{FakeBackend, fixtures};

    #[tokio::test]
    async fn test_search_renders_titles() {
        let backend = FakeBackend::new();
        backend.set_case_law(fixtures::case_law_results()).await;
        let mut browser = CaseLawBrowser::new();
        let mut renderer = ResultsRenderer::new(RendererSettings {
            max_name_len: 80,
            ..RendererSettings::default()
        });

        browser
            .search(&backend, &mut renderer, CaseLawQuery::default())
            .await;

        insta::assert_snapshot!(renderer.describe(), @r"
        Kesavananda Bharati v. State of Kerala ((1973) 4 SCC 225)  <http://127.0.0.1:5000/case-law/1/download>
        Maneka Gandhi v. Union of India ((1978) 1 SCC 248)  <http://127.0.0.1:5000/case-law/2/download>
        ");
        assert_eq!(browser.year_filters(), ["1973", "1978"]);
        let first = renderer.record_rows().next().unwrap();
        assert_eq!(browser.record_for_row(first).map(|r| r.id), Some(1));
    }

    #[tokio::test]
    async fn test_saved_note_preview_lands_on_record() {
        let backend = FakeBackend::new();
        backend.set_case_law(fixtures::case_law_results()).await;
        let mut browser = CaseLawBrowser::new();
        let mut renderer = ResultsRenderer::new(RendererSettings::default());
        let mut editor = NoteEditor::new();
        browser
            .search(&backend, &mut renderer, CaseLawQuery::default())
            .await;

        browser.open_note(&backend, &mut editor, 2).await.unwrap();
        editor.begin_edit();
        editor.set_buffer(r#"{"Summary": "Article 21   read broadly"}"#);
        editor.save(&backend).await.unwrap();

        assert_eq!(browser.sync_previews(), 1);
        assert_eq!(
            browser.record(2).map(|r| r.note_preview.as_str()),
            Some("Article 21 read broadly")
        );
    }

    struct NativeYes;

    impl NativeConfirm for NativeYes {
        fn confirm(&self, _message: &str) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_case_law_rows_never_reach_file_delete() {
        let backend = FakeBackend::new();
        backend.set_case_law(fixtures::case_law_results()).await;
        let mut browser = CaseLawBrowser::new();
        let mut renderer = ResultsRenderer::new(RendererSettings {
            elevated: true,
            ..RendererSettings::default()
        });
        browser
            .search(&backend, &mut renderer, CaseLawQuery::default())
            .await;

        let id = renderer.record_rows().next().map(|row| row.id).unwrap();
        assert!(renderer.record_rows().all(|row| !row.deletable));
        let policy = ConfirmPolicy::new(NativeYes);
        let result = renderer.delete_with_confirm(&backend, &policy, id).await;

        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(renderer.record_rows().count(), 2);
        assert!(
            backend
                .requests()
                .await
                .iter()
                .all(|request| !request.starts_with("delete_file"))
        );

        // the read-only flag survives a trip through the directory overlay
        let mut navigator = DirectoryNavigator::new();
        navigator.enter(&mut renderer);
        navigator.exit(&mut renderer);
        assert!(renderer.record_rows().all(|row| !row.deletable));
    }

    #[test]
    fn test_abandoned_search_is_discarded() {
        let mut browser = CaseLawBrowser::new();
        let mut renderer = ResultsRenderer::new(RendererSettings::default());
        renderer.render(Some(&fixtures::search_results()));
        let request = browser.begin_search(CaseLawQuery::default());
        browser.abandon();

        let applied = browser.complete_search(&mut renderer, request, Ok(fixtures::case_law_results()));

        assert_eq!(applied, Applied::Discarded);
        assert_eq!(renderer.rows()[0].label(), "Vakalatnama.pdf");
    }

    #[test]
    fn test_failed_note_fetch_leaves_editor_closed() {
        let browser = CaseLawBrowser::new();
        let mut editor = NoteEditor::new();
        let result = browser.show_note(&mut editor, 7, Err(ApiError::status(404, None)));
        assert!(result.is_err());
        assert!(!editor.is_visible());
    }

    #[test]
    fn test_failed_search_shows_error_row() {
        let mut browser = CaseLawBrowser::new();
        let mut renderer = ResultsRenderer::new(RendererSettings::default());
        let request = browser.begin_search(CaseLawQuery::default());
        browser.complete_search(
            &mut renderer,
            request,
            Err(ApiError::rejected("Case law index unavailable")),
        );
        assert_eq!(renderer.describe(), "Error: Case law index unavailable");
    }
}
