//! Directory overlay on the results surface.
//!
//! While active, the results surface shows one folder level at a time and
//! searches finishing in the meantime only replace the retained snapshot. A
//! listing is only applied if the navigator is still active when it arrives
//! and no newer level was requested since.

use caseorg_client::{ApiError, Backend};
use caseorg_types::{DirListing, DirPath, SearchResultRecord};
use tracing::{debug, warn};

use crate::Result;
use crate::generation::{Applied, GenerationCounter, RequestToken};
use crate::results::{ResultRow, ResultsRenderer};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryState {
    pub active: bool,
    /// Results scroll offset captured on entry
    pub previous_scroll: usize,
    pub current_path: DirPath,
}

/// An outstanding listing fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRequest {
    token: RequestToken,
    pub path: DirPath,
}

#[derive(Debug, Default)]
pub struct DirectoryNavigator {
    state: DirectoryState,
    generation: GenerationCounter,
}

impl DirectoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DirectoryState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn current_path(&self) -> &DirPath {
        &self.state.current_path
    }

    /// Switch the results surface into overlay mode at the root
    pub fn enter(&mut self, renderer: &mut ResultsRenderer) {
        if self.state.active {
            return;
        }
        renderer.hold();
        self.state = DirectoryState {
            active: true,
            previous_scroll: renderer.scroll_offset(),
            current_path: DirPath::root(),
        };
        debug!(scroll = self.state.previous_scroll, "directory overlay entered");
    }

    /// Leave overlay mode and put the last results back where they were,
    /// or at the top if a newer search replaced them. Outstanding fetches
    /// become stale.
    pub fn exit(&mut self, renderer: &mut ResultsRenderer) {
        if !self.state.active {
            return;
        }
        self.state.active = false;
        self.generation.invalidate();
        let scroll = if renderer.release() {
            0
        } else {
            self.state.previous_scroll
        };
        renderer.restore_snapshot(scroll);
        debug!("directory overlay exited");
    }

    /// Start fetching a level. `None` when the overlay is not active.
    pub fn begin_level(&mut self, path: DirPath) -> Option<LevelRequest> {
        if !self.state.active {
            return None;
        }
        Some(LevelRequest {
            token: self.generation.next(),
            path,
        })
    }

    /// Apply a listing. Checked against the state at arrival time: a
    /// response for an exited overlay or a superseded level is dropped.
    pub fn complete_level(
        &mut self,
        renderer: &mut ResultsRenderer,
        request: LevelRequest,
        result: std::result::Result<DirListing, ApiError>,
    ) -> Applied {
        if !self.state.active || !self.generation.is_current(request.token) {
            debug!(path = %request.path, "discarding stale directory listing");
            return Applied::Discarded;
        }
        match result {
            Ok(listing) => {
                let rows = Self::level_rows(renderer, &request.path, &listing);
                renderer.replace_rows(rows);
                self.state.current_path = request.path;
            }
            Err(err) => {
                warn!(path = %request.path, error = %err, "directory listing failed");
                renderer.show_error(err.user_message());
            }
        }
        Applied::Applied
    }

    /// Rows for one level: up link (except at the root), folders, files
    pub fn level_rows(
        renderer: &mut ResultsRenderer,
        path: &DirPath,
        listing: &DirListing,
    ) -> Vec<ResultRow> {
        let mut rows = Vec::with_capacity(listing.dirs.len() + listing.files.len() + 1);
        if !path.is_root() {
            rows.push(ResultRow::Up {
                parent: path.parent(),
            });
        }
        if listing.is_empty() {
            rows.push(ResultRow::Empty);
            return rows;
        }
        for dir in &listing.dirs {
            rows.push(ResultRow::Directory {
                name: dir.clone(),
                path: path.join(dir),
            });
        }
        for file in &listing.files {
            let mut record = SearchResultRecord::new(&file.name, &file.path);
            if !path.is_root() {
                record.rel = Some(path.as_str().to_string());
            }
            rows.push(renderer.build_record_row(&record));
        }
        rows
    }

    /// Level a row navigates to, if it is a folder or the up link
    pub fn target_for(row: &ResultRow) -> Option<DirPath> {
        match row {
            ResultRow::Directory { path, .. } => Some(path.clone()),
            ResultRow::Up { parent } => Some(parent.clone()),
            _ => None,
        }
    }

    /// Fetch and show a level
    pub async fn show_level(
        &mut self,
        backend: &dyn Backend,
        renderer: &mut ResultsRenderer,
        path: DirPath,
    ) -> Result<Applied> {
        let Some(request) = self.begin_level(path) else {
            return Ok(Applied::Discarded);
        };
        let result = backend.dir_tree(&request.path).await;
        Ok(self.complete_level(renderer, request, result))
    }
}
