//! JSON bodies exchanged with the case-organizer backend.
//!
//! Every endpoint answers JSON. Bodies carrying an `ok` flag implement
//! [`Acknowledged`] so the client can treat `ok: false` exactly like a
//! non-2xx status.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{CaseLawRecord, CaseMatch, SearchResultRecord};

/// Body that reports success through an `ok` flag
pub trait Acknowledged {
    fn is_ok(&self) -> bool;
    fn message(&self) -> Option<&str>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResultRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirFile {
    pub name: String,
    pub path: String,
}

/// One level of the folder tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirListing {
    #[serde(default)]
    pub dirs: Vec<String>,
    #[serde(default)]
    pub files: Vec<DirFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DirListing {
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty() && self.files.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearsResponse {
    #[serde(default, deserialize_with = "string_list")]
    pub years: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthsResponse {
    #[serde(default)]
    pub months: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CasesResponse {
    #[serde(default)]
    pub cases: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseSearchResponse {
    #[serde(default)]
    pub cases: Vec<CaseMatch>,
}

/// Combined existence probe and fetch for a case note.
///
/// A missing note is `ok: false` with a `template` to seed creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteFetch {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
}

/// Generic `{ ok, msg? }` answer, with the optional extras some endpoints add
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Ack {
    pub fn ok() -> Self {
        Self {
            ok: true,
            ..Self::default()
        }
    }

    pub fn rejected(msg: impl Into<String>) -> Self {
        Self {
            ok: false,
            msg: Some(msg.into()),
            ..Self::default()
        }
    }
}

impl Acknowledged for Ack {
    fn is_ok(&self) -> bool {
        self.ok
    }

    fn message(&self) -> Option<&str> {
        self.msg.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseLawFilters {
    #[serde(default, deserialize_with = "string_list")]
    pub years: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseLawResults {
    #[serde(default)]
    pub results: Vec<CaseLawRecord>,
    #[serde(default)]
    pub filters: CaseLawFilters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextInvoiceNumber {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
}

impl Acknowledged for NextInvoiceNumber {
    fn is_ok(&self) -> bool {
        self.ok
    }

    fn message(&self) -> Option<&str> {
        self.msg.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteBody {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNoteBody {
    pub year: String,
    pub month: String,
    pub case: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteFileBody {
    pub path: String,
}

/// Accepts `["2024", 2023]` and yields strings
fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .filter_map(|value| match value {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_listing_defaults() {
        let listing: DirListing = serde_json::from_str("{}").unwrap();
        assert!(listing.is_empty());
    }

    #[test]
    fn test_years_accept_numbers() {
        let filters: CaseLawFilters = serde_json::from_str(r#"{"years":[2024,"2023"]}"#).unwrap();
        assert_eq!(filters.years, vec!["2024", "2023"]);
    }

    #[test]
    fn test_missing_note_carries_template() {
        let fetch: NoteFetch =
            serde_json::from_str(r#"{"ok":false,"msg":"Note.json not found","template":"{}"}"#)
                .unwrap();
        assert!(!fetch.ok);
        assert_eq!(fetch.template.as_deref(), Some("{}"));
        assert!(fetch.content.is_none());
    }
}
