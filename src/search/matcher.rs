//! Per-mode record matchers.
//!
//! All matchers run against `IndexedFields`, the normalized form of a record
//! computed once at load time, so a keystroke never re-folds stored text.

use aho_corasick::AhoCorasick;

use super::config::FuzzyParams;
use super::normalize::{normalize, strip_whitespace};
use crate::catalog::FlatRecord;

// =============================================================================
// Indexed fields
// =============================================================================

/// Normalized searchable text of one record
#[derive(Debug, Clone, Default)]
pub struct IndexedFields {
    /// Folded name variants, in `Lang` order
    pub names: [String; 3],
    /// Alphanumeric words of all name variants, for edit-distance matching
    pub name_words: Vec<String>,
    /// Code exactly as delivered
    pub raw_code: String,
    /// Folded code
    pub code: String,
    /// Folded code without whitespace
    pub compact_code: String,
}

impl IndexedFields {
    pub fn from_record(record: &FlatRecord) -> Self {
        let names = [
            normalize(&record.names[0]),
            normalize(&record.names[1]),
            normalize(&record.names[2]),
        ];
        let mut name_words: Vec<String> = Vec::new();
        for name in &names {
            for word in split_words(name) {
                if !name_words.iter().any(|w| w == word) {
                    name_words.push(word.to_string());
                }
            }
        }
        let code = normalize(&record.code);
        let compact_code = strip_whitespace(&code);

        Self {
            names,
            name_words,
            raw_code: record.code.clone(),
            code,
            compact_code,
        }
    }
}

fn split_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
}

// =============================================================================
// Exact / Wildcard / Numeric
// =============================================================================

/// Normalized phrase is a substring of any name variant or of the code
pub fn matches_exact(fields: &IndexedFields, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    fields.names.iter().any(|name| name.contains(phrase)) || fields.code.contains(phrase)
}

/// Whitespace-free code starts with the prefix. Names are never consulted.
pub fn matches_wildcard(fields: &IndexedFields, prefix: &str) -> bool {
    !prefix.is_empty() && fields.compact_code.starts_with(prefix)
}

/// Raw code contains the digit string
pub fn matches_numeric(fields: &IndexedFields, digits: &str) -> bool {
    !digits.is_empty() && fields.raw_code.contains(digits)
}

// =============================================================================
// Word-AND matcher
// =============================================================================

/// Every word must occur in at least one name variant. Code is not consulted.
///
/// One Aho-Corasick pass per name finds all words at once instead of one
/// substring scan per word.
pub struct WordMatcher {
    words: Vec<String>,
    automaton: Option<AhoCorasick>,
}

impl WordMatcher {
    pub fn new(words: &[String]) -> Self {
        let words: Vec<String> = words.iter().filter(|w| !w.is_empty()).cloned().collect();
        let automaton = if words.is_empty() {
            None
        } else {
            match AhoCorasick::new(&words) {
                Ok(ac) => Some(ac),
                Err(e) => {
                    tracing::warn!(error = %e, "word automaton unavailable, scanning per word");
                    None
                }
            }
        };
        Self { words, automaton }
    }

    /// `seen` is scratch space reused across records
    pub fn matches(&self, fields: &IndexedFields, seen: &mut Vec<bool>) -> bool {
        if self.words.is_empty() {
            return false;
        }

        let automaton = match &self.automaton {
            Some(ac) => ac,
            None => {
                return self
                    .words
                    .iter()
                    .all(|w| fields.names.iter().any(|name| name.contains(w.as_str())));
            }
        };

        seen.clear();
        seen.resize(self.words.len(), false);
        let mut remaining = self.words.len();

        for name in &fields.names {
            for mat in automaton.find_overlapping_iter(name.as_str()) {
                let slot = &mut seen[mat.pattern().as_usize()];
                if !*slot {
                    *slot = true;
                    remaining -= 1;
                    if remaining == 0 {
                        return true;
                    }
                }
            }
        }
        false
    }
}

// =============================================================================
// Weighted matcher
// =============================================================================

/// Edit-distance matching over names and code.
///
/// A token passes when its unweighted similarity to some field reaches the
/// threshold; the record score is the mean of each token's best weighted
/// similarity.
pub struct WeightedMatcher<'p> {
    tokens: Vec<String>,
    params: &'p FuzzyParams,
}

impl<'p> WeightedMatcher<'p> {
    pub fn new(words: &[String], params: &'p FuzzyParams) -> Self {
        let tokens = words
            .iter()
            .filter(|w| w.chars().count() >= params.min_token_len.max(1))
            .cloned()
            .collect();
        Self { tokens, params }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn score(&self, fields: &IndexedFields) -> Option<f64> {
        if self.tokens.is_empty() {
            return None;
        }

        let mut total = 0.0;
        for token in &self.tokens {
            let name_sim = name_similarity(token, fields, self.params.threshold);
            let code_sim = code_similarity(token, fields, self.params.threshold);
            if name_sim.max(code_sim) < self.params.threshold {
                return None;
            }
            total += (name_sim * self.params.name_weight).max(code_sim * self.params.code_weight);
        }
        Some(total / self.tokens.len() as f64)
    }
}

fn name_similarity(token: &str, fields: &IndexedFields, threshold: f64) -> f64 {
    if fields.names.iter().any(|name| name.contains(token)) {
        return 1.0;
    }
    fields
        .name_words
        .iter()
        .map(|word| bounded_similarity(token, word, threshold))
        .fold(0.0, f64::max)
}

fn code_similarity(token: &str, fields: &IndexedFields, threshold: f64) -> f64 {
    if fields.compact_code.is_empty() {
        return 0.0;
    }
    if fields.compact_code.contains(token) {
        return 1.0;
    }
    bounded_similarity(token, &fields.compact_code, threshold)
}

/// Normalized Levenshtein similarity, skipped when the length gap alone rules
/// out reaching `threshold`
fn bounded_similarity(a: &str, b: &str, threshold: f64) -> f64 {
    let (la, lb) = (a.chars().count(), b.chars().count());
    let longest = la.max(lb);
    if longest == 0 {
        return 1.0;
    }
    let gap = la.abs_diff(lb) as f64 / longest as f64;
    if 1.0 - gap < threshold {
        return 0.0;
    }
    strsim::normalized_levenshtein(a, b)
}

// =============================================================================
// Tests
// =============================================================================
