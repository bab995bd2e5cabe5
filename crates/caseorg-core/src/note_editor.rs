//! Note modal state machine.
//!
//! `view` shows the note read-only with escaped line breaks decoded; `edit`
//! exposes the raw text. `intent` (create or update) is orthogonal to the
//! mode and decides what cancel and save do.

use caseorg_client::{ApiError, Backend};
use caseorg_types::{Ack, CaseSelection, NoteContext};
use tracing::{debug, info, warn};

use crate::generation::{GenerationCounter, RequestToken};
use crate::text::{decode_line_escapes, note_summary, short_excerpt};
use crate::{Error, Result};

/// Longest case-law preview handed to the preview callback
pub const PREVIEW_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteMode {
    View,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteIntent {
    Update,
    Create,
}

/// Backend call a save maps to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTarget {
    UpdateCase(CaseSelection),
    CreateCase(CaseSelection),
    CaseLaw(i64),
}

impl SaveTarget {
    pub fn case(&self) -> Option<&CaseSelection> {
        match self {
            SaveTarget::UpdateCase(case) | SaveTarget::CreateCase(case) => Some(case),
            SaveTarget::CaseLaw(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    token: RequestToken,
    pub target: SaveTarget,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved {
        context: NoteContext,
        created: bool,
        /// Short preview for case-law notes
        preview: Option<String>,
    },
    /// The modal was closed or reopened while the save was in flight
    Discarded,
}

impl SaveOutcome {
    /// Case note that now exists on the backend
    pub fn saved_case(&self) -> Option<&CaseSelection> {
        match self {
            SaveOutcome::Saved { context, .. } => context.case(),
            SaveOutcome::Discarded => None,
        }
    }
}

type PreviewCallback = Box<dyn FnMut(&str) + Send>;

pub struct NoteEditor {
    visible: bool,
    mode: NoteMode,
    intent: NoteIntent,
    raw_content: String,
    original_content: String,
    context: Option<NoteContext>,
    /// Cursor position in characters
    cursor: usize,
    on_preview: Option<PreviewCallback>,
    generation: GenerationCounter,
}

impl Default for NoteEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NoteEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteEditor")
            .field("visible", &self.visible)
            .field("mode", &self.mode)
            .field("intent", &self.intent)
            .field("context", &self.context)
            .field("dirty", &self.save_enabled())
            .finish()
    }
}

impl NoteEditor {
    pub fn new() -> Self {
        Self {
            visible: false,
            mode: NoteMode::View,
            intent: NoteIntent::Update,
            raw_content: String::new(),
            original_content: String::new(),
            context: None,
            cursor: 0,
            on_preview: None,
            generation: GenerationCounter::new(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn mode(&self) -> NoteMode {
        self.mode
    }

    pub fn intent(&self) -> NoteIntent {
        self.intent
    }

    pub fn context(&self) -> Option<&NoteContext> {
        self.context.as_ref()
    }

    pub fn buffer(&self) -> &str {
        &self.raw_content
    }

    pub fn original(&self) -> &str {
        &self.original_content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Show the modal. Create intent starts in edit mode.
    pub fn open(&mut self, content: impl Into<String>, intent: NoteIntent, context: NoteContext) {
        let content = content.into();
        self.raw_content = content.clone();
        self.original_content = content;
        self.intent = intent;
        self.mode = match intent {
            NoteIntent::Create => NoteMode::Edit,
            NoteIntent::Update => NoteMode::View,
        };
        self.context = Some(context);
        self.on_preview = None;
        self.visible = true;
        self.cursor_to_end();
        self.generation.invalidate();
        debug!(?intent, "note editor opened");
    }

    /// Called with a short preview after a successful case-law save
    pub fn set_preview_callback(&mut self, callback: impl FnMut(&str) + Send + 'static) {
        self.on_preview = Some(Box::new(callback));
    }

    /// Text for the read-only view
    pub fn display_text(&self) -> String {
        match self.mode {
            NoteMode::View => decode_line_escapes(&self.raw_content),
            NoteMode::Edit => self.raw_content.clone(),
        }
    }

    /// view → edit. The buffer restarts from the saved content.
    pub fn begin_edit(&mut self) -> bool {
        if !self.visible || self.mode != NoteMode::View {
            return false;
        }
        self.raw_content = self.original_content.clone();
        self.mode = NoteMode::Edit;
        self.cursor_to_end();
        true
    }

    pub fn save_enabled(&self) -> bool {
        self.mode == NoteMode::Edit && self.raw_content != self.original_content
    }

    pub fn set_buffer(&mut self, text: impl Into<String>) {
        if self.mode != NoteMode::Edit {
            return;
        }
        self.raw_content = text.into();
        self.cursor_to_end();
    }

    pub fn insert_char(&mut self, c: char) {
        if self.mode != NoteMode::Edit {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.raw_content.insert(at, c);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars() {
            self.insert_char(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.mode != NoteMode::Edit || self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.raw_content.remove(at);
    }

    pub fn delete_forward(&mut self) {
        if self.mode != NoteMode::Edit || self.cursor >= self.char_len() {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.raw_content.remove(at);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_to_end(&mut self) {
        self.cursor = self.char_len();
    }

    fn char_len(&self) -> usize {
        self.raw_content.chars().count()
    }

    fn byte_index(&self, chars: usize) -> usize {
        self.raw_content
            .char_indices()
            .nth(chars)
            .map_or(self.raw_content.len(), |(idx, _)| idx)
    }

    /// Validate and describe a save. Nothing changes until completion.
    pub fn begin_save(&mut self) -> Result<SaveRequest> {
        if !self.visible || self.mode != NoteMode::Edit {
            return Err(Error::validation("Open the note for editing first"));
        }
        if !self.save_enabled() {
            return Err(Error::validation("No changes to save"));
        }
        let target = match (&self.context, self.intent) {
            (None, _) => return Err(Error::validation("No case or record selected for this note")),
            (Some(NoteContext::CaseLaw { id }), _) => SaveTarget::CaseLaw(*id),
            (Some(NoteContext::Case(case)), _) if !case.is_complete() => {
                return Err(Error::validation("Select year, month and case first"));
            }
            (Some(NoteContext::Case(case)), NoteIntent::Update) => SaveTarget::UpdateCase(case.clone()),
            (Some(NoteContext::Case(case)), NoteIntent::Create) => SaveTarget::CreateCase(case.clone()),
        };
        Ok(SaveRequest {
            token: self.generation.next(),
            target,
            content: self.raw_content.clone(),
        })
    }

    /// Success commits the buffer and closes the modal; failure leaves the
    /// editor exactly as it was.
    pub fn complete_save(
        &mut self,
        request: SaveRequest,
        result: std::result::Result<Ack, ApiError>,
    ) -> Result<SaveOutcome> {
        if !self.generation.is_current(request.token) {
            debug!("discarding save for a note that is no longer open");
            return Ok(SaveOutcome::Discarded);
        }
        let ack = result.inspect_err(|err| warn!(error = %err, "note save failed"))?;
        let Some(context) = self.context.clone() else {
            return Ok(SaveOutcome::Discarded);
        };

        let created = self.intent == NoteIntent::Create;
        self.original_content = request.content.clone();
        self.raw_content = request.content;
        self.intent = NoteIntent::Update;
        self.mode = NoteMode::View;

        let preview = match request.target {
            SaveTarget::CaseLaw(_) => {
                let summary = ack
                    .summary
                    .unwrap_or_else(|| note_summary(&self.original_content));
                let preview = short_excerpt(&summary, PREVIEW_LEN);
                if let Some(callback) = self.on_preview.as_mut() {
                    callback(&preview);
                }
                Some(preview)
            }
            SaveTarget::UpdateCase(_) | SaveTarget::CreateCase(_) => None,
        };
        info!(created, "note saved");
        self.close();
        Ok(SaveOutcome::Saved {
            context,
            created,
            preview,
        })
    }

    pub async fn save(&mut self, backend: &dyn Backend) -> Result<SaveOutcome> {
        let request = self.begin_save()?;
        let result = match &request.target {
            SaveTarget::UpdateCase(case) => backend.update_note(case, &request.content).await,
            SaveTarget::CreateCase(case) => backend.create_note(case, &request.content).await,
            SaveTarget::CaseLaw(id) => backend.save_case_law_note(*id, &request.content).await,
        };
        self.complete_save(request, result)
    }

    /// edit → cancel. A note being created is abandoned entirely; an
    /// existing one drops the edits and returns to view. Returns whether the
    /// modal closed.
    pub fn cancel(&mut self) -> bool {
        if self.mode != NoteMode::Edit {
            return false;
        }
        match self.intent {
            NoteIntent::Create => {
                self.close();
                true
            }
            NoteIntent::Update => {
                self.raw_content = self.original_content.clone();
                self.mode = NoteMode::View;
                self.cursor_to_end();
                false
            }
        }
    }

    /// Hide the modal, dropping unsaved text and the backing context
    pub fn close(&mut self) {
        self.raw_content = self.original_content.clone();
        self.mode = NoteMode::View;
        self.visible = false;
        self.context = None;
        self.on_preview = None;
        self.generation.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseorg_testing::FakeBackend;
    use std::sync::{Arc, Mutex};

    fn doe() -> CaseSelection {
        CaseSelection::new("2024", "Mar", "Doe v. Roe")
    }

    #[test]
    fn test_open_sets_initial_mode() {
        let mut editor = NoteEditor::new();
        editor.open("{}", NoteIntent::Update, NoteContext::Case(doe()));
        assert_eq!(editor.mode(), NoteMode::View);
        assert!(editor.is_visible());

        editor.open("{}", NoteIntent::Create, NoteContext::Case(doe()));
        assert_eq!(editor.mode(), NoteMode::Edit);
        assert_eq!(editor.cursor(), 2);
        assert!(!editor.begin_edit());
    }

    #[test]
    fn test_view_decodes_escapes_edit_shows_raw() {
        let mut editor = NoteEditor::new();
        editor.open("line one\\nline two", NoteIntent::Update, NoteContext::Case(doe()));
        assert_eq!(editor.display_text(), "line one\nline two");

        editor.begin_edit();
        assert_eq!(editor.display_text(), "line one\\nline two");
    }

    #[test]
    fn test_dirty_flag_tracks_every_keystroke() {
        let mut editor = NoteEditor::new();
        editor.open("abc", NoteIntent::Update, NoteContext::Case(doe()));
        assert!(!editor.save_enabled());

        editor.begin_edit();
        assert!(!editor.save_enabled());
        editor.insert_char('d');
        assert!(editor.save_enabled());
        editor.backspace();
        assert!(!editor.save_enabled());
        editor.move_left();
        editor.insert_char('X');
        assert_eq!(editor.buffer(), "abXc");
        assert!(editor.save_enabled());
        editor.backspace();
        assert!(!editor.save_enabled());
    }

    #[test]
    fn test_begin_edit_discards_stray_edits() {
        let mut editor = NoteEditor::new();
        editor.open("saved", NoteIntent::Update, NoteContext::Case(doe()));
        editor.begin_edit();
        editor.insert_str(" draft");
        assert!(!editor.cancel());
        assert_eq!(editor.mode(), NoteMode::View);
        assert!(editor.is_visible());

        editor.begin_edit();
        assert_eq!(editor.buffer(), "saved");
        assert_eq!(editor.cursor(), 5);
    }

    #[test]
    fn test_multibyte_editing() {
        let mut editor = NoteEditor::new();
        editor.open("नोट", NoteIntent::Create, NoteContext::Case(doe()));
        editor.backspace();
        editor.insert_char('é');
        editor.move_home();
        editor.delete_forward();
        assert_eq!(editor.buffer(), "ोé");
    }

    #[test]
    fn test_save_requires_context_changes_and_edit_mode() {
        let mut editor = NoteEditor::new();
        assert!(matches!(editor.begin_save(), Err(Error::Validation(_))));

        editor.open("x", NoteIntent::Update, NoteContext::Case(doe()));
        assert!(matches!(editor.begin_save(), Err(Error::Validation(_))));
        editor.begin_edit();
        assert!(matches!(editor.begin_save(), Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_cancel_closes_without_request() {
        let backend = FakeBackend::new();
        let mut editor = NoteEditor::new();
        editor.open("{}", NoteIntent::Create, NoteContext::Case(doe()));
        editor.insert_str("first note");

        assert!(editor.cancel());

        assert!(!editor.is_visible());
        assert!(editor.context().is_none());
        assert!(backend.requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_successful_update_save_commits_and_closes() {
        let backend = FakeBackend::new();
        let mut editor = NoteEditor::new();
        editor.open("old", NoteIntent::Update, NoteContext::Case(doe()));
        editor.begin_edit();
        editor.set_buffer("new");

        let outcome = editor.save(&backend).await.unwrap();

        assert_eq!(outcome.saved_case(), Some(&doe()));
        assert!(!editor.is_visible());
        assert!(!editor.save_enabled());
        assert_eq!(editor.original(), "new");
        assert_eq!(editor.mode(), NoteMode::View);
        assert_eq!(
            backend.requests().await,
            vec!["update_note 2024/Mar/Doe v. Roe new".to_string()]
        );
    }

    #[tokio::test]
    async fn test_create_save_flips_intent() {
        let backend = FakeBackend::new();
        let mut editor = NoteEditor::new();
        editor.open("", NoteIntent::Create, NoteContext::Case(doe()));
        editor.insert_str("{\"client\": \"Doe\"}");

        let outcome = editor.save(&backend).await.unwrap();

        assert!(matches!(outcome, SaveOutcome::Saved { created: true, .. }));
        assert_eq!(editor.intent(), NoteIntent::Update);
        assert_eq!(
            backend.requests().await,
            vec!["create_note 2024/Mar/Doe v. Roe {\"client\": \"Doe\"}".to_string()]
        );
    }

    #[tokio::test]
    async fn test_failed_save_leaves_state_unchanged() {
        let backend = FakeBackend::new();
        backend.fail_next(ApiError::rejected("Disk full")).await;
        let mut editor = NoteEditor::new();
        editor.open("old", NoteIntent::Update, NoteContext::Case(doe()));
        editor.begin_edit();
        editor.set_buffer("new");

        let err = editor.save(&backend).await.unwrap_err();

        assert_eq!(err.user_message(), "Disk full");
        assert!(editor.is_visible());
        assert_eq!(editor.mode(), NoteMode::Edit);
        assert_eq!(editor.buffer(), "new");
        assert!(editor.save_enabled());
    }

    #[tokio::test]
    async fn test_case_law_save_calls_preview_callback() {
        let backend = FakeBackend::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut editor = NoteEditor::new();
        editor.open("", NoteIntent::Update, NoteContext::CaseLaw { id: 7 });
        editor.set_preview_callback(move |preview| sink.lock().unwrap().push(preview.to_string()));
        editor.begin_edit();
        editor.set_buffer("Ratio:\n  basic   structure");

        let outcome = editor.save(&backend).await.unwrap();

        assert_eq!(seen.lock().unwrap().as_slice(), ["Ratio: basic structure"]);
        assert!(matches!(
            outcome,
            SaveOutcome::Saved { preview: Some(ref p), .. } if p == "Ratio: basic structure"
        ));
    }

    #[test]
    fn test_completion_after_close_is_discarded() {
        let mut editor = NoteEditor::new();
        editor.open("a", NoteIntent::Update, NoteContext::Case(doe()));
        editor.begin_edit();
        editor.set_buffer("b");
        let request = editor.begin_save().unwrap();
        editor.close();

        let outcome = editor.complete_save(request, Ok(Ack::ok())).unwrap();
        assert_eq!(outcome, SaveOutcome::Discarded);
        assert_eq!(editor.original(), "a");
    }
}
