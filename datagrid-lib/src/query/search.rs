//! Free-text search across a set of columns.

use serde::{Deserialize, Serialize};

/// Search text plus the columns it applies to.
///
/// An empty column list means "every searchable column".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    pub columns: Vec<String>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            columns: Vec::new(),
        }
    }

    /// Restricts the search to the given columns.
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// `true` when the text has nothing to match on.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Whether the search covers `column_id`.
    pub fn covers(&self, column_id: &str) -> bool {
        self.columns.is_empty() || self.columns.iter().any(|c| c == column_id)
    }

    /// Case-insensitive substring match of the search text in `haystack`.
    pub fn matches(&self, haystack: &str) -> bool {
        let needle = self.text.trim();
        needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covers_all_when_no_columns() {
        let query = SearchQuery::new("ann");
        assert!(query.covers("name"));
        assert!(query.covers("email"));

        let query = query.with_columns(["email"]);
        assert!(!query.covers("name"));
        assert!(query.covers("email"));
    }

    #[test]
    fn test_matches_case_insensitive() {
        let query = SearchQuery::new("  ANN ");
        assert!(query.matches("Joanna"));
        assert!(!query.matches("Bob"));
        assert!(SearchQuery::new("").matches("anything"));
        assert!(SearchQuery::new("   ").is_blank());
    }
}
