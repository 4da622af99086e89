//! Search Engine: Query → Directly Matched Records
//!
//! `SearchIndex` folds every record's searchable text once; each search then
//! dispatches on the query mode and scans the folded fields. The result holds
//! record indices in tree order. Context expansion happens afterwards.

use serde::{Deserialize, Serialize};

use super::config::{MatchPolicy, SearchConfig};
use super::matcher::{
    matches_exact, matches_numeric, matches_wildcard, IndexedFields, WeightedMatcher, WordMatcher,
};
use super::query::{Query, QueryMode};
use crate::catalog::FlatRecord;

// =============================================================================
// Types
// =============================================================================

/// Records matched directly by a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MatchResult {
    /// `None` for a blank query, which filters nothing
    pub mode: Option<QueryMode>,
    /// Matched record indices, ascending (tree order), no duplicates
    pub indices: Vec<usize>,
}

impl MatchResult {
    /// Blank-query result: every record, untouched
    pub fn identity(len: usize) -> Self {
        Self {
            mode: None,
            indices: (0..len).collect(),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.mode.is_none()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn records<'r>(&'r self, records: &'r [FlatRecord]) -> impl Iterator<Item = &'r FlatRecord> {
        self.indices.iter().filter_map(move |&i| records.get(i))
    }
}

// =============================================================================
// SearchIndex
// =============================================================================

/// Folded searchable fields for every record, built once per catalog
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    fields: Vec<IndexedFields>,
}

impl SearchIndex {
    pub fn build(records: &[FlatRecord]) -> Self {
        let start = instant::Instant::now();
        let fields: Vec<IndexedFields> = records.iter().map(IndexedFields::from_record).collect();
        tracing::debug!(
            records = fields.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "search index built"
        );
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parse and run a raw query string
    pub fn search_raw(&self, raw: &str, config: &SearchConfig) -> MatchResult {
        self.search(&Query::parse(raw), config)
    }

    pub fn search(&self, query: &Query, config: &SearchConfig) -> MatchResult {
        let start = instant::Instant::now();

        let indices = match query {
            Query::All => return MatchResult::identity(self.fields.len()),
            Query::Exact { phrase } => self.filter(|f| matches_exact(f, phrase)),
            Query::Wildcard { prefix } => self.filter(|f| matches_wildcard(f, prefix)),
            Query::Numeric { digits } => self.filter(|f| matches_numeric(f, digits)),
            Query::Fuzzy { words } => match config.policy {
                MatchPolicy::WordAnd => {
                    let matcher = WordMatcher::new(words);
                    let mut seen = Vec::with_capacity(words.len());
                    self.filter(|f| matcher.matches(f, &mut seen))
                }
                MatchPolicy::Weighted => self.ranked(&WeightedMatcher::new(words, &config.fuzzy), config),
            },
        };

        tracing::debug!(
            mode = ?query.mode(),
            matched = indices.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "search complete"
        );

        MatchResult {
            mode: query.mode(),
            indices,
        }
    }

    fn filter<F>(&self, mut predicate: F) -> Vec<usize>
    where
        F: FnMut(&IndexedFields) -> bool,
    {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| predicate(f))
            .map(|(i, _)| i)
            .collect()
    }

    /// Score, optionally keep the top N, then restore tree order
    fn ranked(&self, matcher: &WeightedMatcher<'_>, config: &SearchConfig) -> Vec<usize> {
        if matcher.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f64)> = self
            .fields
            .iter()
            .enumerate()
            .filter_map(|(i, f)| matcher.score(f).map(|s| (i, s)))
            .collect();

        if let Some(limit) = config.fuzzy.max_results {
            if scored.len() > limit {
                scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
                scored.truncate(limit);
            }
        }

        let mut indices: Vec<usize> = scored.into_iter().map(|(i, _)| i).collect();
        indices.sort_unstable();
        indices
    }
}

/// One-shot search over plain records with the default configuration.
///
/// Builds a throwaway index; interactive callers keep a `SearchIndex` instead.
pub fn search(records: &[FlatRecord], raw_query: &str) -> MatchResult {
    search_with(records, raw_query, &SearchConfig::default())
}

pub fn search_with(records: &[FlatRecord], raw_query: &str, config: &SearchConfig) -> MatchResult {
    SearchIndex::build(records).search_raw(raw_query, config)
}
