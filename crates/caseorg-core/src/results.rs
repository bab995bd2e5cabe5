//! Shared results surface.
//!
//! Every search mode renders through one [`ResultsRenderer`]. It keeps a deep
//! copy of the last rendered list so the directory overlay can put it back.

use caseorg_client::{ApiError, Backend};
use caseorg_types::{Ack, DirPath, SearchResultRecord};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::confirm::{ConfirmAnswer, ConfirmPolicy};
use crate::text::truncate_middle;
use crate::{Error, Result};

pub const NO_RESULTS: &str = "No results";
pub const EMPTY_DIRECTORY: &str = "(empty)";

/// Stable identity of a record row, valid until the row is replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRow {
    pub id: RowId,
    pub record: SearchResultRecord,
    pub display_name: String,
    pub download_href: String,
    pub deletable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultRow {
    /// Stands in for an empty result list
    Placeholder(String),
    Record(RecordRow),
    /// Subdirectory in the directory overlay; `path` is the target level
    Directory { name: String, path: DirPath },
    /// Parent link in the directory overlay
    Up { parent: DirPath },
    /// Directory without entries
    Empty,
    Error(String),
}

impl ResultRow {
    pub fn label(&self) -> String {
        match self {
            ResultRow::Placeholder(text) => text.clone(),
            ResultRow::Record(row) => row.display_name.clone(),
            ResultRow::Directory { name, .. } => format!("{}/", name),
            ResultRow::Up { .. } => "..".to_string(),
            ResultRow::Empty => EMPTY_DIRECTORY.to_string(),
            ResultRow::Error(message) => format!("Error: {}", message),
        }
    }

    pub fn as_record(&self) -> Option<&RecordRow> {
        match self {
            ResultRow::Record(row) => Some(row),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererSettings {
    /// Server root used for download links, without trailing slash
    pub base_url: String,
    pub max_name_len: usize,
    /// Viewer may delete files
    pub elevated: bool,
}

impl RendererSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.server.base_url.trim_end_matches('/').to_string(),
            max_name_len: config.results.max_name_len,
            elevated: config.viewer.elevated,
        }
    }
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// A delete awaiting the user's confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTicket {
    pub row: RowId,
    pub path: String,
    pub file: String,
}

impl DeleteTicket {
    pub fn prompt(&self) -> String {
        format!("Delete \"{}\"? This cannot be undone.", self.file)
    }
}

/// A confirmed delete, ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub row: RowId,
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Declined,
}

#[derive(Debug)]
pub struct ResultsRenderer {
    settings: RendererSettings,
    rows: Vec<ResultRow>,
    last_rendered: Option<Vec<SearchResultRecord>>,
    /// Snapshot rows may not be deleted from this surface
    read_only: bool,
    /// The directory overlay owns the visible rows
    held: bool,
    /// A render landed in the snapshot while held
    replaced_while_held: bool,
    scroll_offset: usize,
    next_row_id: u64,
}

impl ResultsRenderer {
    pub fn new(settings: RendererSettings) -> Self {
        Self {
            settings,
            rows: Vec::new(),
            last_rendered: None,
            read_only: false,
            held: false,
            replaced_while_held: false,
            scroll_offset: 0,
            next_row_id: 0,
        }
    }

    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn record_rows(&self) -> impl Iterator<Item = &RecordRow> {
        self.rows.iter().filter_map(ResultRow::as_record)
    }

    pub fn record_row(&self, id: RowId) -> Option<&RecordRow> {
        self.record_rows().find(|row| row.id == id)
    }

    /// Records of the last `render` call
    pub fn last_rendered(&self) -> Option<&[SearchResultRecord]> {
        self.last_rendered.as_deref()
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn set_scroll_offset(&mut self, offset: usize) {
        self.scroll_offset = offset.min(self.rows.len().saturating_sub(1));
    }

    /// Replace every row with the given records and retain a copy of them.
    /// `None` and an empty list both render the placeholder.
    ///
    /// While the directory overlay holds the surface only the snapshot is
    /// replaced; the rows appear once the overlay is left.
    pub fn render(&mut self, records: Option<&[SearchResultRecord]>) {
        self.render_records(records.unwrap_or_default(), false);
    }

    /// Like [`render`](Self::render), but no row offers a delete. Used for
    /// entries that are not files under the case tree.
    pub fn render_read_only(&mut self, records: &[SearchResultRecord]) {
        self.render_records(records, true);
    }

    fn render_records(&mut self, records: &[SearchResultRecord], read_only: bool) {
        self.last_rendered = Some(records.to_vec());
        self.read_only = read_only;
        if self.held {
            self.replaced_while_held = true;
            debug!(count = records.len(), "results kept behind directory overlay");
            return;
        }
        self.show_records(records);
        self.scroll_offset = 0;
        debug!(count = records.len(), read_only, "rendered results");
    }

    fn show_records(&mut self, records: &[SearchResultRecord]) {
        let deletable = self.settings.elevated && !self.read_only;
        let rows = if records.is_empty() {
            vec![ResultRow::Placeholder(NO_RESULTS.to_string())]
        } else {
            records
                .iter()
                .map(|record| self.make_record_row(record, deletable))
                .collect()
        };
        self.rows = rows;
    }

    /// Row for one file record. The directory overlay uses this for its files.
    pub fn build_record_row(&mut self, record: &SearchResultRecord) -> ResultRow {
        self.make_record_row(record, self.settings.elevated)
    }

    fn make_record_row(&mut self, record: &SearchResultRecord, deletable: bool) -> ResultRow {
        self.next_row_id += 1;
        ResultRow::Record(RecordRow {
            id: RowId(self.next_row_id),
            display_name: truncate_middle(&record.file, self.settings.max_name_len),
            download_href: self.download_href(record),
            deletable,
            record: record.clone(),
        })
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Hand the visible rows to the directory overlay
    pub fn hold(&mut self) {
        self.held = true;
        self.replaced_while_held = false;
    }

    /// Take the rows back from the overlay. Returns whether the snapshot
    /// was replaced in the meantime.
    pub fn release(&mut self) -> bool {
        self.held = false;
        std::mem::take(&mut self.replaced_while_held)
    }

    /// Show rows built elsewhere without touching the retained snapshot
    pub fn replace_rows(&mut self, rows: Vec<ResultRow>) {
        self.rows = rows;
        self.scroll_offset = 0;
    }

    /// Put the last rendered list back at `scroll_offset`, or the
    /// placeholder if nothing was ever rendered.
    pub fn restore_snapshot(&mut self, scroll_offset: usize) {
        let snapshot = self.last_rendered.take();
        self.show_records(snapshot.as_deref().unwrap_or_default());
        self.last_rendered = snapshot;
        self.set_scroll_offset(scroll_offset);
    }

    /// Single inline error row; the snapshot is kept
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.replace_rows(vec![ResultRow::Error(message.into())]);
    }

    pub fn download_href(&self, record: &SearchResultRecord) -> String {
        match record.download_url.as_deref() {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                url.to_string()
            }
            Some(url) => format!("{}{}", self.settings.base_url, url),
            None => format!(
                "{}/static-serve?path={}&download=1",
                self.settings.base_url,
                urlencoding::encode(&record.path)
            ),
        }
    }

    /// First step of a delete: the row must exist and the viewer must be
    /// allowed to delete. Nothing is sent yet.
    pub fn request_delete(&self, id: RowId) -> Result<DeleteTicket> {
        if !self.settings.elevated {
            return Err(Error::validation("Only administrators can delete files"));
        }
        let row = self
            .record_row(id)
            .ok_or_else(|| Error::validation("That row is no longer shown"))?;
        if !row.deletable {
            return Err(Error::validation("This entry cannot be deleted from here"));
        }
        Ok(DeleteTicket {
            row: row.id,
            path: row.record.path.clone(),
            file: row.record.file.clone(),
        })
    }

    /// Only an explicit Yes produces a request
    pub fn resolve_confirmation(
        &self,
        ticket: DeleteTicket,
        answer: ConfirmAnswer,
    ) -> Option<DeleteRequest> {
        if !answer.is_yes() {
            debug!(path = %ticket.path, ?answer, "delete declined");
            return None;
        }
        Some(DeleteRequest {
            row: ticket.row,
            path: ticket.path,
        })
    }

    /// Remove the row in place on success; on failure every row stays.
    pub fn complete_delete(
        &mut self,
        request: &DeleteRequest,
        result: std::result::Result<Ack, ApiError>,
    ) -> Result<()> {
        if let Err(err) = result {
            warn!(path = %request.path, error = %err, "delete failed");
            return Err(err.into());
        }
        self.rows
            .retain(|row| row.as_record().is_none_or(|r| r.id != request.row));
        if let Some(snapshot) = self.last_rendered.as_mut() {
            snapshot.retain(|record| record.path != request.path);
        }
        self.set_scroll_offset(self.scroll_offset);
        info!(path = %request.path, "file deleted");
        Ok(())
    }

    /// Confirm, send and apply a delete
    pub async fn delete_with_confirm(
        &mut self,
        backend: &dyn Backend,
        policy: &ConfirmPolicy,
        id: RowId,
    ) -> Result<DeleteOutcome> {
        let ticket = self.request_delete(id)?;
        let answer = policy.confirm("Delete file", &ticket.prompt()).await;
        let Some(request) = self.resolve_confirmation(ticket, answer) else {
            return Ok(DeleteOutcome::Declined);
        };
        let result = backend.delete_file(&request.path).await;
        self.complete_delete(&request, result)?;
        Ok(DeleteOutcome::Deleted)
    }

    /// Plain-text view of the rows, one per line
    pub fn describe(&self) -> String {
        self.rows
            .iter()
            .map(|row| match row {
                ResultRow::Record(record) => {
                    let delete = if record.deletable { " [delete]" } else { "" };
                    format!("{}  <{}>{}", record.display_name, record.download_href, delete)
                }
                other => other.label(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
