//! Browser: Debounced Query → Immutable View Snapshot → Row Windows
//!
//! Ties the pipeline together for a presentation layer:
//!
//! ```text
//! set_input ──► Debouncer ──tick──► Query::parse ──► SearchIndex ──► expand ──► ViewSnapshot
//!                                                                                  │
//!                                              rows(start, count) ◄── highlight ◄──┘
//! ```
//!
//! Typing updates `input` at once; the snapshot only changes when the
//! debounced value fires (or on `apply_query`). Each recompute builds a fresh
//! snapshot; rows are rendered lazily for the requested window only, so
//! highlighting cost follows what is on screen rather than the match count.

use serde::{Deserialize, Serialize};

use super::debounce::{Debouncer, TimerHandle};
use crate::catalog::{Catalog, DatasetStats, FlatRecord, Lang, NodeId, TaxInfo};
use crate::error::CatalogError;
use crate::search::{
    expand, highlight, highlight_code_prefix, Highlighted, OwnedSpan, Query, QueryMode, SearchConfig,
    SearchIndex,
};

// =============================================================================
// Types
// =============================================================================

/// Timing of one recompute, in microseconds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct QueryTimings {
    pub search_us: u64,
    pub expand_us: u64,
    pub total_us: u64,
}

/// Result of one query: what is shown and why
#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    /// Raw query text that produced this snapshot
    pub query: String,
    pub parsed: Query,
    /// Directly matched record indices, ascending
    pub matched: Vec<usize>,
    /// Matches plus context, ascending
    pub visible: Vec<usize>,
    pub matched_count: usize,
    pub timings: QueryTimings,
}

impl ViewSnapshot {
    fn identity(len: usize) -> Self {
        let all: Vec<usize> = (0..len).collect();
        Self {
            query: String::new(),
            parsed: Query::All,
            matched: all.clone(),
            visible: all,
            matched_count: len,
            timings: QueryTimings::default(),
        }
    }

    pub fn mode(&self) -> Option<QueryMode> {
        self.parsed.mode()
    }

    /// Whether `index` matched directly (as opposed to being shown as context)
    pub fn is_match(&self, index: usize) -> bool {
        self.matched.binary_search(&index).is_ok()
    }
}

/// A display cell: the original text plus highlight spans when it matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub text: String,
    /// `None` when no query is active or nothing in the cell matched
    pub spans: Option<Vec<OwnedSpan>>,
}

/// Tax columns of a row, texts in the row's language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSummary {
    pub vat: String,
    pub excise: String,
    pub customs: String,
    pub vat_exemption: String,
    pub excise_exempted: String,
    pub export: String,
    pub rate_count: usize,
    pub valid_from: String,
    pub valid_to: String,
}

impl TaxSummary {
    pub fn new(tax: &TaxInfo, lang: Lang) -> Self {
        Self {
            vat: tax.vat.clone(),
            excise: tax.excise.clone(),
            customs: tax.tax_customs(lang).to_string(),
            vat_exemption: tax.vat_exemption(lang).to_string(),
            excise_exempted: tax.excise_exempted(lang).to_string(),
            export: tax.export(lang).to_string(),
            rate_count: tax.tax_values.len(),
            valid_from: tax.valid_from.clone(),
            valid_to: tax.valid_to.clone(),
        }
    }
}

/// One visible row, ready to render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRow {
    pub id: NodeId,
    pub original_index: usize,
    pub depth: usize,
    pub code: Cell,
    pub name: Cell,
    pub is_match: bool,
    pub children_count: usize,
    pub act_count: usize,
    pub tax: Option<TaxSummary>,
}

// =============================================================================
// Browser
// =============================================================================

pub struct Browser {
    catalog: Catalog,
    index: SearchIndex,
    stats: DatasetStats,
    config: SearchConfig,
    debouncer: Debouncer<String>,
    input: String,
    snapshot: ViewSnapshot,
}

impl Browser {
    pub fn new(catalog: Catalog, config: SearchConfig) -> Self {
        let index = SearchIndex::build(catalog.records());
        let stats = DatasetStats::collect(&catalog);
        let snapshot = ViewSnapshot::identity(catalog.len());
        Self {
            debouncer: Debouncer::new(config.debounce_ms),
            catalog,
            index,
            stats,
            config,
            input: String::new(),
            snapshot,
        }
    }

    pub fn from_json(json: &str, config: SearchConfig) -> Result<Self, CatalogError> {
        Ok(Self::new(Catalog::from_json(json)?, config))
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Record raw input now; schedule it to drive the search after the delay
    pub fn set_input(&mut self, raw: &str, now_ms: f64) -> TimerHandle {
        self.input = raw.to_string();
        self.debouncer.schedule(self.input.clone(), now_ms)
    }

    /// Fire the debounced input if due. Returns true when the visible rows changed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        match self.debouncer.poll(now_ms) {
            Some(raw) if raw != self.snapshot.query => self.recompute(raw),
            _ => false,
        }
    }

    /// Run `raw` immediately, dropping any pending input
    pub fn apply_query(&mut self, raw: &str) -> bool {
        self.debouncer.flush();
        self.input = raw.to_string();
        self.recompute(raw.to_string())
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn has_pending(&self) -> bool {
        self.debouncer.has_pending()
    }

    pub fn next_deadline(&self) -> Option<f64> {
        self.debouncer.next_deadline()
    }

    // -------------------------------------------------------------------------
    // State
    // -------------------------------------------------------------------------

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn snapshot(&self) -> &ViewSnapshot {
        &self.snapshot
    }

    pub fn stats(&self) -> &DatasetStats {
        &self.stats
    }

    pub fn breadcrumb(&self, id: NodeId, lang: Lang) -> Option<String> {
        self.catalog.breadcrumb(id, lang)
    }

    /// Window of visible rows; out-of-range windows are clipped
    pub fn rows(&self, start: usize, count: usize, lang: Lang) -> Vec<ViewRow> {
        let visible = &self.snapshot.visible;
        let start = start.min(visible.len());
        let end = start.saturating_add(count).min(visible.len());

        let terms = self.snapshot.parsed.highlight_terms();
        let highlight_names = self.snapshot.parsed.highlights_names();

        visible[start..end]
            .iter()
            .filter_map(|&index| self.catalog.get(index).map(|r| (index, r)))
            .map(|(index, record)| ViewRow {
                id: record.id,
                original_index: record.original_index,
                depth: record.depth,
                code: match &self.snapshot.parsed {
                    Query::Wildcard { prefix } => cell(highlight_code_prefix(&record.code, prefix)),
                    _ => cell(highlight(&record.code, &terms)),
                },
                name: if highlight_names {
                    cell(highlight(record.name(lang), &terms))
                } else {
                    plain(record.name(lang))
                },
                is_match: !self.snapshot.parsed.is_all() && self.snapshot.is_match(index),
                children_count: record.children_count,
                act_count: record.acts.total(),
                tax: record.tax_info.as_ref().map(|tax| TaxSummary::new(tax, lang)),
            })
            .collect()
    }

    fn recompute(&mut self, raw: String) -> bool {
        let total_start = instant::Instant::now();
        let parsed = Query::parse(&raw);

        let search_start = instant::Instant::now();
        let result = self.index.search(&parsed, &self.config);
        let search_us = search_start.elapsed().as_micros() as u64;

        let expand_start = instant::Instant::now();
        let visible = if result.is_identity() {
            result.indices.clone()
        } else {
            expand(&self.catalog, &result.indices, self.config.include_descendants)
        };
        let expand_us = expand_start.elapsed().as_micros() as u64;

        let changed = visible != self.snapshot.visible;
        let snapshot = ViewSnapshot {
            query: raw,
            parsed,
            matched_count: result.len(),
            matched: result.indices,
            visible,
            timings: QueryTimings {
                search_us,
                expand_us,
                total_us: total_start.elapsed().as_micros() as u64,
            },
        };

        tracing::debug!(
            mode = ?snapshot.mode(),
            matched = snapshot.matched_count,
            visible = snapshot.visible.len(),
            total_us = snapshot.timings.total_us,
            "view recomputed"
        );

        self.snapshot = snapshot;
        changed
    }
}

fn plain(text: &str) -> Cell {
    Cell {
        text: text.to_string(),
        spans: None,
    }
}

fn cell(highlighted: Highlighted<'_>) -> Cell {
    Cell {
        text: highlighted.text().to_string(),
        spans: highlighted.has_matches().then(|| highlighted.to_owned_spans()),
    }
}

impl std::fmt::Debug for Browser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Browser")
            .field("records", &self.catalog.len())
            .field("input", &self.input)
            .field("query", &self.snapshot.query)
            .field("visible", &self.snapshot.visible.len())
            .finish()
    }
}

/// Record behind a visible row, for callers that render their own cells
pub fn visible_records<'c>(catalog: &'c Catalog, snapshot: &'c ViewSnapshot) -> impl Iterator<Item = &'c FlatRecord> {
    snapshot.visible.iter().filter_map(move |&i| catalog.get(i))
}

// =============================================================================
// Tests
// =============================================================================
