use serde::{Deserialize, Serialize};

/// A file entry produced by any search surface.
///
/// `path` is the opaque backend identifier (used for download and delete),
/// `file` the display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultRecord {
    pub file: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    /// Server-relative download URL overriding the path-based link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl SearchResultRecord {
    pub fn new(file: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            path: path.into(),
            rel: None,
            download_url: None,
        }
    }

    pub fn with_rel(mut self, rel: impl Into<String>) -> Self {
        self.rel = Some(rel.into());
        self
    }
}

/// A stored judgement in the case-law library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseLawRecord {
    pub id: i64,
    #[serde(default)]
    pub petitioner: String,
    #[serde(default)]
    pub respondent: String,
    #[serde(default)]
    pub citation: String,
    #[serde(default)]
    pub decision_year: Option<i64>,
    #[serde(default)]
    pub decision_month: Option<String>,
    #[serde(default)]
    pub primary_type: Option<String>,
    #[serde(default)]
    pub case_type: Option<String>,
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub note_preview: String,
    #[serde(default)]
    pub text_preview: String,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl CaseLawRecord {
    /// "Petitioner v. Respondent", falling back to whichever side is known
    pub fn title(&self) -> String {
        match (self.petitioner.trim(), self.respondent.trim()) {
            ("", "") => format!("Case law #{}", self.id),
            (p, "") => p.to_string(),
            ("", r) => r.to_string(),
            (p, r) => format!("{} v. {}", p, r),
        }
    }

    /// Row projection used by the shared results surface
    pub fn to_search_record(&self) -> SearchResultRecord {
        let title = self.title();
        let file = if self.citation.trim().is_empty() {
            title
        } else {
            format!("{} ({})", title, self.citation.trim())
        };
        let path = match (&self.folder, &self.file_name) {
            (Some(folder), Some(name)) => format!("{}/{}", folder.trim_end_matches('/'), name),
            (None, Some(name)) => name.clone(),
            _ => format!("case-law/{}", self.id),
        };
        SearchResultRecord {
            file,
            path,
            rel: self.folder.clone(),
            download_url: Some(
                self.download_url
                    .clone()
                    .unwrap_or_else(|| format!("/case-law/{}/download", self.id)),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_rel_is_optional() {
        let record: SearchResultRecord =
            serde_json::from_str(r#"{"file":"a.pdf","path":"/srv/a.pdf"}"#).unwrap();
        assert_eq!(record, SearchResultRecord::new("a.pdf", "/srv/a.pdf"));
    }

    #[test]
    fn test_case_law_projection() {
        let record: CaseLawRecord = serde_json::from_str(
            r#"{"id":7,"petitioner":"State","respondent":"Doe","citation":"2019 SCC 1",
                "folder":"Case Law/Criminal","file_name":"state-doe.pdf"}"#,
        )
        .unwrap();
        let row = record.to_search_record();
        assert_eq!(row.file, "State v. Doe (2019 SCC 1)");
        assert_eq!(row.path, "Case Law/Criminal/state-doe.pdf");
        assert_eq!(row.download_url.as_deref(), Some("/case-law/7/download"));
    }
}
