use serde::{Deserialize, Serialize};

/// Parameters of `GET /search`. Empty fields are omitted from the query
/// string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub party: String,
    pub year: String,
    pub month: String,
    pub domain: String,
    pub subcategory: String,
    #[serde(rename = "type")]
    pub file_type: String,
}

impl SearchQuery {
    /// Plain free-text search
    pub fn text(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            ..Self::default()
        }
    }

    pub fn is_blank(&self) -> bool {
        self.pairs().is_empty()
    }

    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("q", &self.q),
            ("party", &self.party),
            ("year", &self.year),
            ("month", &self.month),
            ("domain", &self.domain),
            ("subcategory", &self.subcategory),
            ("type", &self.file_type),
        ]
        .into_iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(key, value)| (key, value.trim().to_string()))
        .collect()
    }
}

/// Which side of a case-law record a party filter applies to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyMode {
    #[default]
    Either,
    Petitioner,
    Respondent,
}

impl PartyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartyMode::Either => "either",
            PartyMode::Petitioner => "petitioner",
            PartyMode::Respondent => "respondent",
        }
    }
}

/// Parameters of `GET /case-law/search`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseLawQuery {
    pub text: String,
    pub party: String,
    pub party_mode: PartyMode,
    pub citation: String,
    pub year: String,
    pub primary_type: String,
    pub case_type: String,
    pub limit: Option<u32>,
}

impl CaseLawQuery {
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs: Vec<(&'static str, String)> = [
            ("text", &self.text),
            ("party", &self.party),
            ("citation", &self.citation),
            ("year", &self.year),
            ("primary_type", &self.primary_type),
            ("case_type", &self.case_type),
        ]
        .into_iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(key, value)| (key, value.trim().to_string()))
        .collect();

        if !self.party.trim().is_empty() {
            pairs.push(("party_mode", self.party_mode.as_str().to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_pairs_skip_blank_fields() {
        let query = SearchQuery {
            q: " order ".to_string(),
            year: "2024".to_string(),
            file_type: "  ".to_string(),
            ..SearchQuery::default()
        };
        assert_eq!(
            query.pairs(),
            vec![("q", "order".to_string()), ("year", "2024".to_string())]
        );
        assert!(SearchQuery::default().is_blank());
    }

    #[test]
    fn test_party_mode_only_with_party() {
        let mut query = CaseLawQuery::default();
        assert!(query.pairs().is_empty());

        query.party = "Doe".to_string();
        query.party_mode = PartyMode::Respondent;
        assert_eq!(
            query.pairs(),
            vec![
                ("party", "Doe".to_string()),
                ("party_mode", "respondent".to_string())
            ]
        );
    }
}
