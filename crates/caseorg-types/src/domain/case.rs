use serde::{Deserialize, Serialize};
use std::fmt;

/// The `(year, month, case)` key identifying a case folder.
///
/// Each part may be empty while the user is still choosing. Setting an
/// upstream field clears everything downstream of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseSelection {
    pub year: String,
    pub month: String,
    #[serde(rename = "case")]
    pub case_name: String,
}

impl CaseSelection {
    pub fn new(
        year: impl Into<String>,
        month: impl Into<String>,
        case_name: impl Into<String>,
    ) -> Self {
        Self {
            year: year.into(),
            month: month.into(),
            case_name: case_name.into(),
        }
    }

    /// All three parts are non-empty
    pub fn is_complete(&self) -> bool {
        !self.year.is_empty() && !self.month.is_empty() && !self.case_name.is_empty()
    }

    pub fn set_year(&mut self, year: impl Into<String>) {
        self.year = year.into();
        self.month.clear();
        self.case_name.clear();
    }

    pub fn set_month(&mut self, month: impl Into<String>) {
        self.month = month.into();
        self.case_name.clear();
    }

    pub fn set_case(&mut self, case_name: impl Into<String>) {
        self.case_name = case_name.into();
    }
}

impl fmt::Display for CaseSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.year, self.month, self.case_name)
    }
}

/// One hit of the case name search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseMatch {
    #[serde(rename = "case")]
    pub case_name: String,
    pub year: String,
    pub month: String,
}

impl CaseMatch {
    pub fn selection(&self) -> CaseSelection {
        CaseSelection::new(&self.year, &self.month, &self.case_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_change_resets_downstream() {
        let mut selection = CaseSelection::new("2024", "Mar", "Doe v. Roe");
        assert!(selection.is_complete());

        selection.set_month("Apr");
        assert_eq!(selection, CaseSelection::new("2024", "Apr", ""));

        selection.set_case("A v. B");
        selection.set_year("2023");
        assert_eq!(selection, CaseSelection::new("2023", "", ""));
        assert!(!selection.is_complete());
    }

    #[test]
    fn test_case_match_wire_names() {
        let json = r#"{"case":"Doe v. Roe","year":"2024","month":"Mar"}"#;
        let hit: CaseMatch = serde_json::from_str(json).unwrap();
        assert_eq!(hit.selection(), CaseSelection::new("2024", "Mar", "Doe v. Roe"));
    }
}
