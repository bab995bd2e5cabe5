use serde::{Deserialize, Serialize};
use std::fmt;

/// Relative folder path under the storage root.
///
/// Always slash-joined with no leading or trailing slash; the root is the
/// empty path. Empty segments are dropped on construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct DirPath(String);

impl DirPath {
    /// The storage root
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Normalize any slash-separated string (leading slashes, doubled
    /// separators and backslashes are all tolerated).
    pub fn parse(raw: &str) -> Self {
        let joined = raw
            .split(['/', '\\'])
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        Self(joined)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|segment| !segment.is_empty())
    }

    /// Descend into `segment`
    pub fn join(&self, segment: &str) -> Self {
        if self.is_root() {
            Self::parse(segment)
        } else {
            Self::parse(&format!("{}/{}", self.0, segment))
        }
    }

    /// Pop the last segment; the root is its own parent
    pub fn parent(&self) -> Self {
        match self.0.rsplit_once('/') {
            Some((head, _)) => Self(head.to_string()),
            None => Self::root(),
        }
    }

    /// Last segment, if any
    pub fn name(&self) -> Option<&str> {
        self.segments().last()
    }
}

impl fmt::Display for DirPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "/")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<String> for DirPath {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<&str> for DirPath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<DirPath> for String {
    fn from(path: DirPath) -> Self {
        path.0
    }
}

impl AsRef<str> for DirPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_slashes() {
        assert_eq!(DirPath::parse("/2024//Mar/").as_str(), "2024/Mar");
        assert_eq!(DirPath::parse("\\2024\\Mar").as_str(), "2024/Mar");
        assert!(DirPath::parse("///").is_root());
    }

    #[test]
    fn test_join_and_parent() {
        let path = DirPath::root().join("2024").join("Mar").join("Doe v. Roe");
        assert_eq!(path.as_str(), "2024/Mar/Doe v. Roe");
        assert_eq!(path.name(), Some("Doe v. Roe"));
        assert_eq!(path.parent().as_str(), "2024/Mar");
        assert_eq!(path.parent().parent().parent(), DirPath::root());
        assert_eq!(DirPath::root().parent(), DirPath::root());
    }

    #[test]
    fn test_serde_normalizes() {
        let path: DirPath = serde_json::from_str("\"/2024/Jan\"").unwrap();
        assert_eq!(path.as_str(), "2024/Jan");
        assert_eq!(serde_json::to_string(&path).unwrap(), "\"2024/Jan\"");
    }
}
