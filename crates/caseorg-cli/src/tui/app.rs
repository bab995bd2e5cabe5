use caseorg_client::Backend;
use caseorg_core::case_lookup::{InvoiceDraft, NoteProbe};
use caseorg_core::note_editor::SaveTarget;
use caseorg_core::results::DeleteTicket;
use caseorg_core::{
    Applied, CaseLawBrowser, CaseLookupController, ConfirmAnswer, DirectoryNavigator, ListKey,
    ListOutcome, NoteEditor, NoteMode, OptionList, ResultRow, ResultsRenderer, SearchSession,
    SelectionList, SelectionListConfig,
};
use caseorg_types::{CaseLawQuery, CaseMatch, DirPath, SearchQuery};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use std::future::Future;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use tokio::runtime::Handle;
use tracing::debug;

use super::tui_event::TuiEvent;

const PAGE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Year,
    Month,
    Case,
}

impl Column {
    fn index(self) -> usize {
        match self {
            Column::Year => 0,
            Column::Month => 1,
            Column::Case => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Files,
    CaseName,
    CaseLaw,
}

impl PromptKind {
    pub fn title(self) -> &'static str {
        match self {
            PromptKind::Files => "Search files",
            PromptKind::CaseName => "Find case",
            PromptKind::CaseLaw => "Search case law",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Lookup(Column),
    Matches,
    Results,
    Prompt(PromptKind),
}

/// What last filled the results surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Surface {
    #[default]
    Files,
    CaseLaw,
}

pub struct App {
    backend: Arc<dyn Backend>,
    runtime: Handle,
    tx: Sender<TuiEvent>,
    pub lookup: CaseLookupController,
    pub renderer: ResultsRenderer,
    pub search: SearchSession,
    pub navigator: DirectoryNavigator,
    pub editor: NoteEditor,
    pub case_law: CaseLawBrowser,
    /// Year filter applied to file and case-law searches
    pub year_filter: SelectionList<String>,
    pub focus: Focus,
    pub surface: Surface,
    pub input: String,
    pub lookup_cursor: [usize; 3],
    pub match_cursor: usize,
    pub row_cursor: usize,
    pub pending_delete: Option<DeleteTicket>,
    pending_match: Option<CaseMatch>,
    pub invoice: Option<InvoiceDraft>,
    pub status: String,
    /// Where the open year picker was last drawn
    pub picker_area: Option<Rect>,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        backend: Arc<dyn Backend>,
        runtime: Handle,
        tx: Sender<TuiEvent>,
        renderer: ResultsRenderer,
        picker: SelectionListConfig,
    ) -> Self {
        Self {
            backend,
            runtime,
            tx,
            lookup: CaseLookupController::new(),
            renderer,
            search: SearchSession::new(),
            navigator: DirectoryNavigator::new(),
            editor: NoteEditor::new(),
            case_law: CaseLawBrowser::new(),
            year_filter: SelectionList::year_picker(picker, String::new()),
            focus: Focus::Lookup(Column::Year),
            surface: Surface::Files,
            input: String::new(),
            lookup_cursor: [0; 3],
            match_cursor: 0,
            row_cursor: 0,
            pending_delete: None,
            pending_match: None,
            invoice: None,
            status: String::new(),
            picker_area: None,
            should_quit: false,
        }
    }

    fn spawn<F>(&self, future: F)
    where
        F: Future<Output = TuiEvent> + Send + 'static,
    {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            // receiver is gone once the browser has quit
            let _ = tx.send(future.await);
        });
    }

    pub fn load_years(&mut self) {
        let backend = Arc::clone(&self.backend);
        self.spawn(async move { TuiEvent::Years(backend.years().await) });
    }

    pub fn options(&self, column: Column) -> &OptionList {
        match column {
            Column::Year => self.lookup.years(),
            Column::Month => self.lookup.months(),
            Column::Case => self.lookup.cases(),
        }
    }

    // ---- keyboard -------------------------------------------------------

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.pending_delete.is_some() {
            self.confirm_key(key.code);
            return;
        }
        if self.editor.is_visible() {
            self.editor_key(key);
            return;
        }
        if self.year_filter.is_open() {
            self.picker_key(key.code);
            return;
        }
        if let Focus::Prompt(kind) = self.focus {
            self.prompt_key(kind, key.code);
            return;
        }
        if self.global_key(key.code) {
            return;
        }
        match self.focus {
            Focus::Lookup(column) => self.lookup_key(column, key.code),
            Focus::Matches => self.matches_key(key.code),
            Focus::Results => self.results_key(key.code),
            Focus::Prompt(_) => {}
        }
    }

    fn global_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.cycle_focus(),
            KeyCode::Char('/') => self.start_prompt(PromptKind::Files),
            KeyCode::Char('c') => self.start_prompt(PromptKind::CaseName),
            KeyCode::Char('l') => self.start_prompt(PromptKind::CaseLaw),
            KeyCode::Char('y') => self.year_filter.open(),
            KeyCode::Char('x') => {
                self.year_filter.field_mut().clear();
                self.status = "Year filter cleared".to_string();
            }
            KeyCode::Char('b') => self.toggle_browse(),
            KeyCode::Char('n') => self.open_note(),
            KeyCode::Char('N') => self.create_note(),
            KeyCode::Char('i') => self.prepare_invoice(),
            _ => return false,
        }
        true
    }

    fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Lookup(Column::Year) => Focus::Lookup(Column::Month),
            Focus::Lookup(Column::Month) => Focus::Lookup(Column::Case),
            Focus::Lookup(Column::Case) | Focus::Matches => Focus::Results,
            Focus::Results | Focus::Prompt(_) => Focus::Lookup(Column::Year),
        };
    }

    fn start_prompt(&mut self, kind: PromptKind) {
        self.input.clear();
        self.focus = Focus::Prompt(kind);
    }

    fn prompt_key(&mut self, kind: PromptKind, code: KeyCode) {
        match code {
            KeyCode::Char(c) => self.input.push(c),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Esc => {
                self.input.clear();
                self.focus = Focus::Results;
            }
            KeyCode::Enter => {
                let text = std::mem::take(&mut self.input);
                self.submit_prompt(kind, text);
            }
            _ => {}
        }
    }

    fn submit_prompt(&mut self, kind: PromptKind, text: String) {
        let year = self.year_filter.field().clone();
        match kind {
            PromptKind::Files => {
                self.leave_browse();
                self.case_law.abandon();
                let request = self.search.begin(SearchQuery {
                    q: text,
                    year,
                    ..SearchQuery::default()
                });
                let backend = Arc::clone(&self.backend);
                self.spawn(async move {
                    let result = backend.search(&request.query).await;
                    TuiEvent::Search(request, result)
                });
                self.status = "Searching…".to_string();
                self.focus = Focus::Results;
            }
            PromptKind::CaseName => {
                self.match_cursor = 0;
                self.focus = Focus::Matches;
                let Some(request) = self.lookup.begin_name_search(&text) else {
                    return;
                };
                let backend = Arc::clone(&self.backend);
                self.spawn(async move {
                    let result = backend.search_cases(&request.query).await;
                    TuiEvent::NameSearch(request, result)
                });
            }
            PromptKind::CaseLaw => {
                self.leave_browse();
                self.search.abandon();
                let request = self.case_law.begin_search(CaseLawQuery {
                    text,
                    year,
                    ..CaseLawQuery::default()
                });
                let backend = Arc::clone(&self.backend);
                self.spawn(async move {
                    let result = backend.search_case_law(&request.query).await;
                    TuiEvent::CaseLaw(request, result)
                });
                self.status = "Searching case law…".to_string();
                self.focus = Focus::Results;
            }
        }
    }

    fn lookup_key(&mut self, column: Column, code: KeyCode) {
        let len = self.options(column).options.len();
        let cursor = &mut self.lookup_cursor[column.index()];
        match code {
            KeyCode::Up | KeyCode::Char('k') => *cursor = cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if *cursor + 1 < len {
                    *cursor += 1;
                }
            }
            KeyCode::Left => self.focus = Focus::Lookup(previous_column(column)),
            KeyCode::Right => self.focus = Focus::Lookup(next_column(column)),
            KeyCode::Enter => {
                let index = *cursor;
                if let Some(value) = self.options(column).options.get(index).cloned() {
                    self.pending_match = None;
                    self.choose(column, value);
                }
            }
            _ => {}
        }
    }

    fn choose(&mut self, column: Column, value: String) {
        match column {
            Column::Year => {
                self.lookup_cursor[1] = 0;
                self.lookup_cursor[2] = 0;
                self.invoice = None;
                if let Some(request) = self.lookup.select_year(value) {
                    let backend = Arc::clone(&self.backend);
                    self.spawn(async move {
                        let result = backend.months(&request.year).await;
                        TuiEvent::Months(request, result)
                    });
                }
                self.focus = Focus::Lookup(Column::Month);
            }
            Column::Month => {
                self.lookup_cursor[2] = 0;
                self.invoice = None;
                if let Some(request) = self.lookup.select_month(value) {
                    let backend = Arc::clone(&self.backend);
                    self.spawn(async move {
                        let result = backend.cases(&request.year, &request.month).await;
                        TuiEvent::Cases(request, result)
                    });
                }
                self.focus = Focus::Lookup(Column::Case);
            }
            Column::Case => {
                self.invoice = None;
                if let Some(probe) = self.lookup.select_case(value) {
                    self.spawn_probe(probe);
                }
            }
        }
    }

    fn spawn_probe(&self, probe: NoteProbe) {
        let backend = Arc::clone(&self.backend);
        self.spawn(async move {
            let result = backend.fetch_note(&probe.case).await;
            TuiEvent::NoteProbe(probe, result)
        });
    }

    fn matches_key(&mut self, code: KeyCode) {
        let len = self.lookup.matches().len();
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.match_cursor = self.match_cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.match_cursor + 1 < len {
                    self.match_cursor += 1;
                }
            }
            KeyCode::Esc => self.focus = Focus::Lookup(Column::Year),
            KeyCode::Enter => {
                if let Some(hit) = self.lookup.matches().get(self.match_cursor).cloned() {
                    self.status = format!("Opening {}…", hit.case_name);
                    let year = hit.year.clone();
                    if let Some(index) = self.lookup.years().options.iter().position(|y| *y == year) {
                        self.lookup_cursor[0] = index;
                    }
                    self.pending_match = Some(hit);
                    self.choose(Column::Year, year);
                    self.focus = Focus::Lookup(Column::Case);
                }
            }
            _ => {}
        }
    }

    fn results_key(&mut self, code: KeyCode) {
        let len = self.renderer.rows().len();
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.move_row(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_row(1),
            KeyCode::PageUp => self.move_row(-(PAGE as i64)),
            KeyCode::PageDown => self.move_row(PAGE as i64),
            KeyCode::Home => self.row_cursor = 0,
            KeyCode::End => self.row_cursor = len.saturating_sub(1),
            KeyCode::Esc => self.leave_browse(),
            KeyCode::Char('d') => self.request_delete(),
            KeyCode::Enter => self.activate_row(),
            _ => {}
        }
        self.renderer.set_scroll_offset(self.row_cursor);
    }

    fn move_row(&mut self, delta: i64) {
        let len = self.renderer.rows().len();
        if len == 0 {
            self.row_cursor = 0;
            return;
        }
        let target = (self.row_cursor as i64 + delta).clamp(0, len as i64 - 1);
        self.row_cursor = target as usize;
    }

    fn current_row(&self) -> Option<&ResultRow> {
        self.renderer.rows().get(self.row_cursor)
    }

    fn activate_row(&mut self) {
        let Some(row) = self.current_row() else {
            return;
        };
        if let Some(path) = DirectoryNavigator::target_for(row) {
            self.show_level(path);
            return;
        }
        if let Some(record) = row.as_record() {
            if self.surface == Surface::CaseLaw && !self.navigator.is_active() {
                self.open_case_law_note();
            } else {
                self.status = record.download_href.clone();
            }
        }
    }

    fn toggle_browse(&mut self) {
        if self.navigator.is_active() {
            self.leave_browse();
            return;
        }
        self.renderer.set_scroll_offset(self.row_cursor);
        self.navigator.enter(&mut self.renderer);
        self.focus = Focus::Results;
        self.show_level(DirPath::root());
    }

    fn leave_browse(&mut self) {
        if !self.navigator.is_active() {
            return;
        }
        self.navigator.exit(&mut self.renderer);
        self.row_cursor = self.renderer.scroll_offset();
    }

    fn show_level(&mut self, path: DirPath) {
        let Some(request) = self.navigator.begin_level(path) else {
            return;
        };
        let backend = Arc::clone(&self.backend);
        self.spawn(async move {
            let result = backend.dir_tree(&request.path).await;
            TuiEvent::Level(request, result)
        });
    }

    fn request_delete(&mut self) {
        let Some(id) = self.current_row().and_then(ResultRow::as_record).map(|r| r.id) else {
            return;
        };
        match self.renderer.request_delete(id) {
            Ok(ticket) => self.pending_delete = Some(ticket),
            Err(err) => self.status = err.user_message(),
        }
    }

    fn confirm_key(&mut self, code: KeyCode) {
        let answer = match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => ConfirmAnswer::Yes,
            KeyCode::Char('n') | KeyCode::Char('N') => ConfirmAnswer::No,
            KeyCode::Esc | KeyCode::Char('q') => ConfirmAnswer::Closed,
            _ => return,
        };
        let Some(ticket) = self.pending_delete.take() else {
            return;
        };
        let Some(request) = self.renderer.resolve_confirmation(ticket, answer) else {
            self.status = "Delete cancelled".to_string();
            return;
        };
        let backend = Arc::clone(&self.backend);
        self.spawn(async move {
            let result = backend.delete_file(&request.path).await;
            TuiEvent::Deleted(request, result)
        });
    }

    fn picker_key(&mut self, code: KeyCode) {
        let Some(key) = list_key(code) else {
            return;
        };
        if self.year_filter.handle_key(key) == ListOutcome::Closed {
            self.status = format!("Year filter: {}", self.year_filter.field());
        }
    }

    // ---- notes ----------------------------------------------------------

    fn open_note(&mut self) {
        if self.focus == Focus::Results
            && self.surface == Surface::CaseLaw
            && !self.navigator.is_active()
        {
            self.open_case_law_note();
            return;
        }
        if let Err(err) = self.lookup.open_note(&mut self.editor) {
            self.status = err.user_message();
        }
    }

    fn create_note(&mut self) {
        if let Err(err) = self.lookup.open_create_note(&mut self.editor) {
            self.status = err.user_message();
        }
    }

    fn open_case_law_note(&mut self) {
        let id = self
            .current_row()
            .and_then(ResultRow::as_record)
            .and_then(|row| self.case_law.record_for_row(row))
            .map(|record| record.id);
        let Some(id) = id else {
            return;
        };
        let backend = Arc::clone(&self.backend);
        self.spawn(async move { TuiEvent::CaseLawNote(id, backend.fetch_case_law_note(id).await) });
    }

    fn editor_key(&mut self, key: KeyEvent) {
        if self.editor.mode() == NoteMode::View {
            match key.code {
                KeyCode::Char('e') => {
                    self.editor.begin_edit();
                }
                KeyCode::Esc | KeyCode::Char('q') => self.editor.close(),
                _ => {}
            }
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            self.save_note();
            return;
        }
        match key.code {
            KeyCode::Esc => {
                self.editor.cancel();
            }
            KeyCode::Enter => self.editor.insert_char('\n'),
            KeyCode::Char(c) => self.editor.insert_char(c),
            KeyCode::Backspace => self.editor.backspace(),
            KeyCode::Delete => self.editor.delete_forward(),
            KeyCode::Left => self.editor.move_left(),
            KeyCode::Right => self.editor.move_right(),
            KeyCode::Home => self.editor.move_home(),
            KeyCode::End => self.editor.cursor_to_end(),
            _ => {}
        }
    }

    fn save_note(&mut self) {
        let request = match self.editor.begin_save() {
            Ok(request) => request,
            Err(err) => {
                self.status = err.user_message();
                return;
            }
        };
        let backend = Arc::clone(&self.backend);
        self.spawn(async move {
            let result = match &request.target {
                SaveTarget::UpdateCase(case) => backend.update_note(case, &request.content).await,
                SaveTarget::CreateCase(case) => backend.create_note(case, &request.content).await,
                SaveTarget::CaseLaw(id) => backend.save_case_law_note(*id, &request.content).await,
            };
            TuiEvent::NoteSaved(request, result)
        });
        self.status = "Saving…".to_string();
    }

    fn prepare_invoice(&mut self) {
        match self.lookup.begin_invoice() {
            Ok(case) => {
                let backend = Arc::clone(&self.backend);
                self.spawn(async move {
                    let result = backend.next_invoice_number().await;
                    TuiEvent::Invoice(case, result)
                });
            }
            Err(err) => self.status = err.user_message(),
        }
    }

    // ---- mouse ----------------------------------------------------------

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let item_height = self.year_filter.config().item_height;
        match mouse.kind {
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                let down = mouse.kind == MouseEventKind::ScrollDown;
                if self.year_filter.is_open() {
                    self.year_filter
                        .scroll_by(if down { item_height } else { -item_height });
                } else if self.focus == Focus::Prompt(PromptKind::Files) {
                    // wheel over the closed filter nudges the year
                    self.year_filter.wheel(if down { -1.0 } else { 1.0 });
                } else if self.focus == Focus::Results {
                    self.move_row(if down { 1 } else { -1 });
                }
            }
            MouseEventKind::Down(_) if self.year_filter.is_open() => {
                let position = Position::new(mouse.column, mouse.row);
                let inside = self.picker_area.is_some_and(|area| area.contains(position));
                if inside && let Some(area) = self.picker_area {
                    let offset = mouse.row.saturating_sub(area.y + 1) as usize;
                    let index = self.year_filter.first_visible() + offset;
                    if let Some(value) = self.year_filter.items().get(index).map(|i| i.value) {
                        self.year_filter.select(value);
                        self.year_filter.close();
                        self.status = format!("Year filter: {}", self.year_filter.field());
                    }
                }
                self.year_filter.click(inside);
            }
            _ => {}
        }
    }

    // ---- completions ----------------------------------------------------

    pub fn apply(&mut self, event: TuiEvent) {
        match event {
            TuiEvent::Years(result) => {
                if let Err(err) = self.lookup.complete_years(result) {
                    self.status = err.user_message();
                }
            }
            TuiEvent::Months(request, result) => match self.lookup.complete_months(request, result) {
                Ok(Applied::Applied) => self.continue_match_to_month(),
                Ok(Applied::Discarded) => {}
                Err(err) => self.fail_match(err.user_message()),
            },
            TuiEvent::Cases(request, result) => match self.lookup.complete_cases(request, result) {
                Ok(Applied::Applied) => self.continue_match_to_case(),
                Ok(Applied::Discarded) => {}
                Err(err) => self.fail_match(err.user_message()),
            },
            TuiEvent::NoteProbe(probe, result) => {
                if let Err(err) = self.lookup.complete_probe(probe, result) {
                    self.status = err.user_message();
                }
            }
            TuiEvent::NameSearch(request, result) => {
                match self.lookup.complete_name_search(request, result) {
                    Ok(Applied::Applied) => {
                        self.match_cursor = 0;
                        self.status = format!("{} matching cases", self.lookup.matches().len());
                    }
                    Ok(Applied::Discarded) => {}
                    Err(err) => self.status = err.user_message(),
                }
            }
            TuiEvent::Search(request, result) => {
                if self.search.complete(&mut self.renderer, request, result).was_applied() {
                    self.results_arrived(Surface::Files);
                }
            }
            TuiEvent::Level(request, result) => {
                if self
                    .navigator
                    .complete_level(&mut self.renderer, request, result)
                    .was_applied()
                {
                    self.row_cursor = 0;
                }
            }
            TuiEvent::CaseLaw(request, result) => {
                if self
                    .case_law
                    .complete_search(&mut self.renderer, request, result)
                    .was_applied()
                {
                    self.results_arrived(Surface::CaseLaw);
                }
            }
            TuiEvent::CaseLawNote(id, result) => {
                if let Err(err) = self.case_law.show_note(&mut self.editor, id, result) {
                    self.status = err.user_message();
                }
            }
            TuiEvent::NoteSaved(request, result) => {
                let landed = result.is_ok().then(|| request.target.clone());
                match self.editor.complete_save(request, result) {
                    Ok(_) => {
                        let updated = self.case_law.sync_previews();
                        debug!(updated, "note previews synced");
                        self.status = "Note saved".to_string();
                    }
                    Err(err) => self.status = err.user_message(),
                }
                if let Some(probe) = landed.and_then(|target| self.lookup.after_save_landed(&target)) {
                    self.spawn_probe(probe);
                }
            }
            TuiEvent::Deleted(request, result) => {
                match self.renderer.complete_delete(&request, result) {
                    Ok(()) => {
                        self.status = format!("Deleted {}", request.path);
                        self.move_row(0);
                    }
                    Err(err) => self.status = err.user_message(),
                }
            }
            TuiEvent::Invoice(case, result) => {
                let draft = CaseLookupController::complete_invoice(case, result);
                self.status = match &draft.invoice_number {
                    Some(number) => format!("Invoice {} for {}", number, draft.case),
                    None => format!("Invoice for {} (enter a number)", draft.case),
                };
                self.invoice = Some(draft);
            }
        }
    }

    /// A search answer was applied. Behind the directory overlay it only
    /// replaced the snapshot, so the cursor and status stay put.
    fn results_arrived(&mut self, surface: Surface) {
        self.surface = surface;
        if self.navigator.is_active() {
            return;
        }
        self.row_cursor = 0;
        self.status.clear();
    }

    fn continue_match_to_month(&mut self) {
        self.lookup_cursor[1] = 0;
        let Some(hit) = self.pending_match.clone() else {
            return;
        };
        if let Some(index) = self.lookup.months().options.iter().position(|m| *m == hit.month) {
            self.lookup_cursor[1] = index;
        }
        self.choose(Column::Month, hit.month);
    }

    fn continue_match_to_case(&mut self) {
        self.lookup_cursor[2] = 0;
        let Some(hit) = self.pending_match.take() else {
            return;
        };
        if let Some(index) = self.lookup.cases().options.iter().position(|c| *c == hit.case_name) {
            self.lookup_cursor[2] = index;
        }
        self.choose(Column::Case, hit.case_name);
        self.status.clear();
    }

    fn fail_match(&mut self, message: String) {
        self.pending_match = None;
        self.status = message;
    }
}

fn previous_column(column: Column) -> Column {
    match column {
        Column::Year | Column::Month => Column::Year,
        Column::Case => Column::Month,
    }
}

fn next_column(column: Column) -> Column {
    match column {
        Column::Year => Column::Month,
        Column::Month | Column::Case => Column::Case,
    }
}

fn list_key(code: KeyCode) -> Option<ListKey> {
    Some(match code {
        KeyCode::Up | KeyCode::Char('k') => ListKey::Up,
        KeyCode::Down | KeyCode::Char('j') => ListKey::Down,
        KeyCode::PageUp => ListKey::PageUp,
        KeyCode::PageDown => ListKey::PageDown,
        KeyCode::Home => ListKey::Home,
        KeyCode::End => ListKey::End,
        KeyCode::Enter => ListKey::Enter,
        KeyCode::Esc => ListKey::Escape,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseorg_core::RendererSettings;
    use caseorg_testing::{FakeBackend, fixtures};
    use std::sync::mpsc::{self, Receiver};
    use std::time::Duration;
    use tokio::runtime::Runtime;

    struct Harness {
        app: App,
        rx: Receiver<TuiEvent>,
        backend: Arc<FakeBackend>,
        runtime: Runtime,
    }

    impl Harness {
        fn new() -> Self {
            let runtime = Runtime::new().unwrap();
            let backend = Arc::new(FakeBackend::new());
            runtime.block_on(fixtures::seed_doe_v_roe(&backend));
            let (tx, rx) = mpsc::channel();
            let app = App::new(
                backend.clone(),
                runtime.handle().clone(),
                tx,
                ResultsRenderer::new(RendererSettings::default()),
                SelectionListConfig::default(),
            );
            Self {
                app,
                rx,
                backend,
                runtime,
            }
        }

        fn press(&mut self, code: KeyCode) {
            self.app.handle_key(KeyEvent::from(code));
        }

        fn type_text(&mut self, text: &str) {
            for c in text.chars() {
                self.press(KeyCode::Char(c));
            }
        }

        /// Apply the next `n` completions
        fn settle(&mut self, n: usize) {
            for _ in 0..n {
                let event = self
                    .rx
                    .recv_timeout(Duration::from_secs(5))
                    .expect("completion");
                self.app.apply(event);
            }
        }
    }

    #[test]
    fn test_cascade_from_keyboard() {
        let mut h = Harness::new();
        h.app.load_years();
        h.settle(1);
        assert_eq!(h.app.lookup.years().options, ["2023", "2024"]);

        h.press(KeyCode::Down);
        h.press(KeyCode::Enter);
        h.settle(1);
        assert_eq!(h.app.focus, Focus::Lookup(Column::Month));
        assert_eq!(h.app.lookup.months().options, ["Jan", "Mar"]);

        h.press(KeyCode::Down);
        h.press(KeyCode::Enter);
        h.settle(1);
        h.press(KeyCode::Enter);
        h.settle(1);

        assert_eq!(h.app.lookup.selection().to_string(), "2024/Mar/Doe v. Roe");
        assert!(h.app.lookup.note_button().is_visible());
    }

    #[test]
    fn test_name_search_match_fills_the_cascade() {
        let mut h = Harness::new();
        h.press(KeyCode::Char('c'));
        h.type_text("kumar");
        h.press(KeyCode::Enter);
        h.settle(1);
        assert_eq!(h.app.focus, Focus::Matches);
        assert_eq!(h.app.lookup.matches().len(), 1);

        h.press(KeyCode::Enter);
        h.settle(3);

        assert_eq!(
            h.app.lookup.selection().to_string(),
            "2024/Mar/State v. Kumar"
        );
        assert_eq!(h.app.lookup_cursor, [0, 1, 1]);
        assert!(!h.app.lookup.note_button().is_visible());
    }

    #[test]
    fn test_browse_then_escape_restores_search_results() {
        let mut h = Harness::new();
        h.press(KeyCode::Char('/'));
        h.type_text("doe");
        h.press(KeyCode::Enter);
        h.settle(1);
        assert_eq!(h.app.renderer.rows().len(), 3);

        h.press(KeyCode::Down);
        h.press(KeyCode::Char('b'));
        h.settle(1);
        assert!(h.app.navigator.is_active());

        h.press(KeyCode::Esc);
        assert!(!h.app.navigator.is_active());
        assert_eq!(h.app.renderer.rows().len(), 3);
        assert_eq!(h.app.row_cursor, 1);
    }

    #[test]
    fn test_search_answering_during_browse_waits_for_exit() {
        let mut h = Harness::new();
        h.press(KeyCode::Char('/'));
        h.type_text("doe");
        h.press(KeyCode::Enter);
        h.press(KeyCode::Char('b'));
        h.settle(2);

        assert!(h.app.navigator.is_active());
        assert_eq!(h.app.renderer.rows(), &[ResultRow::Empty]);

        h.press(KeyCode::Esc);
        assert!(!h.app.navigator.is_active());
        assert_eq!(h.app.renderer.rows().len(), 3);
        assert_eq!(h.app.row_cursor, 0);
    }

    #[test]
    fn test_create_save_landing_after_close_shows_note() {
        let mut h = Harness::new();
        h.press(KeyCode::Char('c'));
        h.type_text("kumar");
        h.press(KeyCode::Enter);
        h.settle(1);
        h.press(KeyCode::Enter);
        h.settle(3);
        assert!(!h.app.lookup.note_button().is_visible());

        h.press(KeyCode::Char('N'));
        assert!(h.app.editor.is_visible());
        assert_eq!(h.app.editor.mode(), NoteMode::Edit);
        h.press(KeyCode::Char('x'));
        h.app
            .handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        h.press(KeyCode::Esc);
        assert!(!h.app.editor.is_visible());

        h.settle(2);
        assert!(h.app.lookup.note_button().is_visible());
        let requests = h.runtime.block_on(h.backend.requests());
        assert_eq!(
            requests.last().map(String::as_str),
            Some("fetch_note 2024/Mar/State v. Kumar")
        );
    }

    #[test]
    fn test_delete_needs_explicit_yes() {
        let mut h = Harness::new();
        h.app.renderer = ResultsRenderer::new(RendererSettings {
            elevated: true,
            ..RendererSettings::default()
        });
        h.press(KeyCode::Char('/'));
        h.press(KeyCode::Enter);
        h.settle(1);

        h.press(KeyCode::Char('d'));
        assert!(h.app.pending_delete.is_some());
        h.press(KeyCode::Esc);
        assert!(h.app.pending_delete.is_none());
        assert_eq!(h.app.renderer.rows().len(), 3);

        h.press(KeyCode::Char('d'));
        h.press(KeyCode::Char('y'));
        h.settle(1);
        assert_eq!(h.app.renderer.rows().len(), 2);
        let requests = h.runtime.block_on(h.backend.requests());
        assert_eq!(
            requests.last().map(String::as_str),
            Some("delete_file 2024/Mar/Doe v. Roe/Vakalatnama.pdf")
        );
    }

    #[test]
    fn test_year_filter_picker_feeds_search() {
        let mut h = Harness::new();
        h.press(KeyCode::Char('y'));
        assert!(h.app.year_filter.is_open());
        h.press(KeyCode::Up);
        h.press(KeyCode::Enter);
        assert!(!h.app.year_filter.is_open());
        let year = h.app.year_filter.field().clone();
        assert!(!year.is_empty());

        h.press(KeyCode::Char('/'));
        h.type_text("order");
        h.press(KeyCode::Enter);
        h.settle(1);

        let requests = h.runtime.block_on(h.backend.requests());
        assert_eq!(
            requests.last().cloned(),
            Some(format!("search q=order&year={}", year))
        );
    }
}
