//! Case browser runtime
//!
//! Headless state for the case browser: every component owns its view state
//! and exposes `begin_*`/`complete_*` pairs around backend calls, so hosts can
//! run requests concurrently and feed the answers back in any order.

pub mod case_law;
pub mod case_lookup;
pub mod config;
pub mod confirm;
pub mod directory;
pub mod error;
pub mod generation;
pub mod note_editor;
pub mod results;
pub mod search;
pub mod selection_list;
pub mod text;

pub use case_law::CaseLawBrowser;
pub use case_lookup::{CaseLookupController, NoteButton, OptionList};
pub use config::{Config, resolve_data_dir};
pub use confirm::{ConfirmAnswer, ConfirmDialog, ConfirmPolicy, NativeConfirm};
pub use directory::DirectoryNavigator;
pub use error::{Error, Result};
pub use generation::{Applied, GenerationCounter, RequestToken};
pub use note_editor::{NoteEditor, NoteIntent, NoteMode, SaveOutcome};
pub use results::{RecordRow, RendererSettings, ResultRow, ResultsRenderer, RowId};
pub use search::SearchSession;
pub use selection_list::{
    BoundField, ListKey, ListOutcome, SelectionList, SelectionListConfig, YearWindow,
};
