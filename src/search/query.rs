//! Query classification.
//!
//! Rules, first match wins:
//! 1. `"phrase"`  → exact phrase over names and code
//! 2. `prefix*`   → code prefix
//! 3. `0101 21`   → digits-only, substring of the raw code
//! 4. anything else → word matching over the names

use serde::{Deserialize, Serialize};

use super::normalize::{normalize, strip_whitespace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    Exact,
    Wildcard,
    Numeric,
    Fuzzy,
}

/// A classified query with its normalized search terms
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Blank input: no filtering at all
    All,
    Exact { phrase: String },
    Wildcard { prefix: String },
    Numeric { digits: String },
    Fuzzy { words: Vec<String> },
}

impl Query {
    /// Classify raw input.
    ///
    /// Exact phrases keep any whitespace inside the quotes, so `" din "`
    /// matches the word "din" but not "Dinamometre". A wildcard drops every
    /// trailing `*`, so `01**` is the same query as `01*`.
    pub fn parse(raw: &str) -> Query {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Query::All;
        }

        if trimmed.len() > 1 && trimmed.starts_with('"') && trimmed.ends_with('"') {
            let inner = &trimmed[1..trimmed.len() - 1];
            // Padding inside the quotes is part of the phrase
            let phrase = if inner.trim().is_empty() {
                String::new()
            } else {
                normalize(inner)
            };
            return Query::Exact { phrase };
        }

        if let Some(stripped) = trimmed.strip_suffix('*') {
            let stripped = stripped.trim_end_matches('*');
            return Query::Wildcard {
                prefix: strip_whitespace(&normalize(stripped)),
            };
        }

        let compact = strip_whitespace(trimmed);
        if !compact.is_empty() && compact.bytes().all(|b| b.is_ascii_digit()) {
            return Query::Numeric { digits: compact };
        }

        let mut words: Vec<String> = Vec::new();
        for word in trimmed.split_whitespace().map(normalize) {
            if !word.is_empty() && !words.contains(&word) {
                words.push(word);
            }
        }
        Query::Fuzzy { words }
    }

    pub fn mode(&self) -> Option<QueryMode> {
        match self {
            Query::All => None,
            Query::Exact { .. } => Some(QueryMode::Exact),
            Query::Wildcard { .. } => Some(QueryMode::Wildcard),
            Query::Numeric { .. } => Some(QueryMode::Numeric),
            Query::Fuzzy { .. } => Some(QueryMode::Fuzzy),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Query::All)
    }

    /// True when stripping quotes or `*` left nothing to search for
    pub fn is_vacuous(&self) -> bool {
        match self {
            Query::All => false,
            Query::Exact { phrase } => phrase.is_empty(),
            Query::Wildcard { prefix } => prefix.is_empty(),
            Query::Numeric { digits } => digits.is_empty(),
            Query::Fuzzy { words } => words.is_empty(),
        }
    }

    /// Normalized terms to highlight in display cells
    pub fn highlight_terms(&self) -> Vec<String> {
        match self {
            Query::All => Vec::new(),
            Query::Exact { phrase } => vec![phrase.clone()],
            Query::Wildcard { prefix } => vec![prefix.clone()],
            Query::Numeric { digits } => vec![digits.clone()],
            Query::Fuzzy { words } => words.clone(),
        }
    }

    /// Code-only modes never highlight names
    pub fn highlights_names(&self) -> bool {
        matches!(self, Query::Exact { .. } | Query::Fuzzy { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_all() {
        assert_eq!(Query::parse(""), Query::All);
        assert_eq!(Query::parse("   \t "), Query::All);
        assert_eq!(Query::parse("  ").mode(), None);
    }

    #[test]
    fn test_exact_phrase() {
        assert_eq!(
            Query::parse("  \"Cai, Măgari\" "),
            Query::Exact { phrase: "cai, magari".to_string() }
        );
        // A lone quote is not a phrase
        assert_eq!(Query::parse("\"").mode(), Some(QueryMode::Fuzzy));
        assert_eq!(
            Query::parse("\" Din \""),
            Query::Exact { phrase: " din ".to_string() }
        );
    }

    #[test]
    fn test_exact_wins_over_wildcard() {
        assert_eq!(
            Query::parse("\"01*\""),
            Query::Exact { phrase: "01*".to_string() }
        );
    }

    #[test]
    fn test_wildcard() {
        assert_eq!(
            Query::parse("0101 21*"),
            Query::Wildcard { prefix: "010121".to_string() }
        );
        assert_eq!(
            Query::parse("01**"),
            Query::Wildcard { prefix: "01".to_string() }
        );
    }

    #[test]
    fn test_numeric() {
        assert_eq!(
            Query::parse("0101 21"),
            Query::Numeric { digits: "010121".to_string() }
        );
        assert_eq!(Query::parse("01a").mode(), Some(QueryMode::Fuzzy));
    }

    #[test]
    fn test_fuzzy_words() {
        assert_eq!(
            Query::parse("Wood  BED wood"),
            Query::Fuzzy { words: vec!["wood".to_string(), "bed".to_string()] }
        );
    }

    #[test]
    fn test_vacuous_after_stripping() {
        assert!(Query::parse("\"\"").is_vacuous());
        assert!(Query::parse("\"  \"").is_vacuous());
        assert!(Query::parse("*").is_vacuous());
        assert!(Query::parse(" ** ").is_vacuous());
        assert!(!Query::parse("").is_vacuous());
        assert!(!Query::parse("cai").is_vacuous());
    }

    #[test]
    fn test_highlight_terms() {
        assert_eq!(Query::parse("wood bed").highlight_terms(), vec!["wood", "bed"]);
        assert!(Query::parse("").highlight_terms().is_empty());
        assert!(!Query::parse("0101*").highlights_names());
        assert!(Query::parse("\"cai\"").highlights_names());
    }
}
