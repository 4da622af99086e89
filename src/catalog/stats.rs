//! Dataset overview: shape of the hierarchy and coverage of enrichments.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::flatten::Catalog;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub total: usize,
    /// Records with at least one child
    pub categories: usize,
    pub leaves: usize,
    pub roots: usize,
    pub max_depth: usize,
    /// depth → record count
    pub depth_distribution: BTreeMap<usize, usize>,
    /// code length → record count (records without a code are not counted)
    pub code_lengths: BTreeMap<usize, usize>,
    pub with_import_acts: usize,
    pub with_export_acts: usize,
    pub with_transit_acts: usize,
    pub with_tax_info: usize,
}

impl DatasetStats {
    pub fn collect(catalog: &Catalog) -> Self {
        let mut stats = DatasetStats {
            total: catalog.len(),
            ..Default::default()
        };

        for record in catalog.records() {
            if record.children_count > 0 {
                stats.categories += 1;
            } else {
                stats.leaves += 1;
            }
            if record.depth == 0 {
                stats.roots += 1;
            }
            stats.max_depth = stats.max_depth.max(record.depth);
            *stats.depth_distribution.entry(record.depth).or_insert(0) += 1;

            let code = record.code.trim();
            if !code.is_empty() {
                *stats.code_lengths.entry(code.chars().count()).or_insert(0) += 1;
            }
            stats.with_import_acts += usize::from(record.acts.import > 0);
            stats.with_export_acts += usize::from(record.acts.export > 0);
            stats.with_transit_acts += usize::from(record.acts.transit > 0);
            if record.has_tax_info() {
                stats.with_tax_info += 1;
            }
        }

        stats
    }
}
