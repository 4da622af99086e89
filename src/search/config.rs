//! Configuration types and defaults for the search pipeline

use serde::{Deserialize, Serialize};

/// How the fallback (non-quoted, non-code) query mode matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Every query word must be a substring of some name variant
    #[default]
    WordAnd,
    /// Weighted edit-distance similarity over names and code
    Weighted,
}

// =============================================================================
// Fuzzy Parameters
// =============================================================================

/// Parameters for `MatchPolicy::Weighted`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyParams {
    /// Query tokens shorter than this (in chars) are ignored. Default: 2
    pub min_token_len: usize,
    /// Minimum per-token similarity in [0, 1]. Default: 0.75
    pub threshold: f64,
    /// Weight applied to name-field similarity. Default: 1.0
    pub name_weight: f64,
    /// Weight applied to code similarity. Default: 0.6
    pub code_weight: f64,
    /// Keep only the N best-scoring matches before expansion. Default: None
    pub max_results: Option<usize>,
}

impl Default for FuzzyParams {
    fn default() -> Self {
        Self {
            min_token_len: 2,
            threshold: 0.75,
            name_weight: 1.0,
            code_weight: 0.6,
            max_results: None,
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period before typed input drives a search. Default: 150ms
    pub debounce_ms: f64,
    /// Reveal the full subtree of each match, not just its ancestors. Default: true
    pub include_descendants: bool,
    pub policy: MatchPolicy,
    pub fuzzy: FuzzyParams,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 150.0,
            include_descendants: true,
            policy: MatchPolicy::WordAnd,
            fuzzy: FuzzyParams::default(),
        }
    }
}

impl SearchConfig {
    /// Substring word matching (the default)
    pub fn strict() -> Self {
        Self::default()
    }

    /// Edit-distance matching that forgives typos, capped to the best 200 hits
    pub fn typo_tolerant() -> Self {
        Self {
            policy: MatchPolicy::Weighted,
            fuzzy: FuzzyParams {
                max_results: Some(200),
                ..FuzzyParams::default()
            },
            ..Self::default()
        }
    }

    pub fn with_descendants(mut self, include: bool) -> Self {
        self.include_descendants = include;
        self
    }
}
