use serde::{Deserialize, Serialize};

use super::CaseSelection;

/// Entity backing an open note; required for save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoteContext {
    /// `Note.json` inside a case folder
    Case(CaseSelection),
    /// Note attached to a case-law record
    CaseLaw { id: i64 },
}

impl NoteContext {
    pub fn case(&self) -> Option<&CaseSelection> {
        match self {
            NoteContext::Case(selection) => Some(selection),
            NoteContext::CaseLaw { .. } => None,
        }
    }
}

/// File name of the per-case note
pub const NOTE_FILE_NAME: &str = "Note.json";
