//! Tree Flattener: Nested Nodes → Ordered Flat Records
//!
//! Pre-order depth-first traversal of the category tree. Each record carries
//! its depth, its root-to-parent ancestor chain and its position in the
//! traversal, which is the canonical display order.
//!
//! The `Catalog` keeps the records together with index-based adjacency
//! (parent, children, subtree extent) so later stages never chase object
//! references. Everything is built once and never mutated.

use std::collections::HashMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::node::{parse_document, CategoryNode, NodeId, TaxInfo};
use crate::error::CatalogError;

// =============================================================================
// Types
// =============================================================================

/// Name language variants, in record order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Ro,
    Ru,
    En,
}

impl Lang {
    pub const ALL: [Lang; 3] = [Lang::Ro, Lang::Ru, Lang::En];

    pub fn index(self) -> usize {
        match self {
            Lang::Ro => 0,
            Lang::Ru => 1,
            Lang::En => 2,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Lang::Ro => "ro",
            Lang::Ru => "ru",
            Lang::En => "en",
        }
    }

    /// Parse a language tag; unknown tags yield `None`
    pub fn parse(tag: &str) -> Option<Lang> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "ro" => Some(Lang::Ro),
            "ru" => Some(Lang::Ru),
            "en" => Some(Lang::En),
            _ => None,
        }
    }
}

/// Regulatory act counts carried over from the node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActCounts {
    pub import: usize,
    pub export: usize,
    pub transit: usize,
    /// Acts delivered without an import/export/transit split
    pub other: usize,
}

impl ActCounts {
    pub fn total(&self) -> usize {
        self.import + self.export + self.transit + self.other
    }
}

/// One row of the flattened tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRecord {
    pub id: NodeId,
    pub code: String,
    /// Names indexed by `Lang::index()`
    pub names: [String; 3],
    /// Free-text notes indexed by `Lang::index()`
    pub infos: [String; 3],
    /// Root = 0
    pub depth: usize,
    /// Root-to-parent, excluding self
    pub ancestor_ids: Vec<NodeId>,
    /// Position in the pre-order traversal
    pub original_index: usize,
    pub parent_id: Option<NodeId>,
    pub children_count: usize,
    pub acts: ActCounts,
    pub tax_info: Option<TaxInfo>,
}

impl FlatRecord {
    pub fn name(&self, lang: Lang) -> &str {
        &self.names[lang.index()]
    }

    pub fn info(&self, lang: Lang) -> &str {
        &self.infos[lang.index()]
    }

    pub fn has_tax_info(&self) -> bool {
        self.tax_info.is_some()
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Flattened records plus their lookup structures
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<FlatRecord>,
    index_by_id: HashMap<NodeId, usize>,
    parent: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    /// Exclusive end of each record's subtree in traversal order
    subtree_end: Vec<usize>,
}

impl Catalog {
    /// Decode a JSON document and flatten it
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let roots = parse_document(json)?;
        let catalog = flatten(&roots);
        tracing::info!(
            roots = roots.len(),
            records = catalog.len(),
            "nomenclature catalog loaded"
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in traversal order
    pub fn records(&self) -> &[FlatRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&FlatRecord> {
        self.records.get(index)
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index_by_id.get(&id).copied()
    }

    pub fn by_id(&self, id: NodeId) -> Option<&FlatRecord> {
        self.index_of(id).map(|i| &self.records[i])
    }

    pub fn parent_of(&self, index: usize) -> Option<usize> {
        self.parent.get(index).copied().flatten()
    }

    /// Direct children of a record, in traversal order
    pub fn children_of(&self, index: usize) -> &[usize] {
        self.children.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Direct child ids of the node with `id`
    pub fn child_ids(&self, id: NodeId) -> Vec<NodeId> {
        self.index_of(id)
            .map(|i| {
                self.children_of(i)
                    .iter()
                    .map(|&c| self.records[c].id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Indices of a record's descendants. Pre-order keeps a subtree contiguous.
    pub fn descendants_of(&self, index: usize) -> Range<usize> {
        match self.subtree_end.get(index) {
            Some(&end) => index + 1..end,
            None => 0..0,
        }
    }

    /// True when `ancestor` is a proper ancestor of `id`
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.by_id(id)
            .map(|r| r.ancestor_ids.contains(&ancestor))
            .unwrap_or(false)
    }

    /// Human-readable path like `Chapter 1 > Live horses > Pure-bred`.
    ///
    /// Empty names along the chain are skipped.
    pub fn breadcrumb(&self, id: NodeId, lang: Lang) -> Option<String> {
        let record = self.by_id(id)?;
        let path: Vec<&str> = record
            .ancestor_ids
            .iter()
            .filter_map(|a| self.by_id(*a))
            .chain(std::iter::once(record))
            .map(|r| r.name(lang).trim())
            .filter(|name| !name.is_empty())
            .collect();
        Some(path.join(" > "))
    }
}

// =============================================================================
// Flattening
// =============================================================================

/// Flatten a forest of category nodes in pre-order.
///
/// Deterministic and free of I/O; the same tree always yields the same catalog.
pub fn flatten(roots: &[CategoryNode]) -> Catalog {
    let mut flattener = Flattener::default();
    for root in roots {
        flattener.visit(root, None);
    }
    flattener.catalog
}

#[derive(Default)]
struct Flattener {
    catalog: Catalog,
    chain: Vec<NodeId>,
}

impl Flattener {
    fn visit(&mut self, node: &CategoryNode, parent: Option<usize>) {
        let catalog = &mut self.catalog;
        let index = catalog.records.len();

        catalog.records.push(FlatRecord {
            id: node.id,
            code: node.nc.clone(),
            names: [node.name_ro.clone(), node.name_ru.clone(), node.name_en.clone()],
            infos: [node.info_ro.clone(), node.info_ru.clone(), node.info_en.clone()],
            depth: self.chain.len(),
            ancestor_ids: self.chain.clone(),
            original_index: index,
            parent_id: self.chain.last().copied(),
            children_count: node.children.len(),
            acts: ActCounts {
                import: node.import_acts,
                export: node.export_acts,
                transit: node.transit_acts,
                other: node.regulatory_acts,
            },
            tax_info: node.tax_info.clone(),
        });
        catalog.parent.push(parent);
        catalog.children.push(Vec::with_capacity(node.children.len()));
        catalog.subtree_end.push(index + 1);

        if catalog.index_by_id.contains_key(&node.id) {
            tracing::warn!(id = node.id, index, "duplicate node id; lookups keep the first");
        } else {
            catalog.index_by_id.insert(node.id, index);
        }
        if let Some(p) = parent {
            catalog.children[p].push(index);
        }

        self.chain.push(node.id);
        for child in &node.children {
            self.visit(child, Some(index));
        }
        self.chain.pop();

        self.catalog.subtree_end[index] = self.catalog.records.len();
    }
}

// =============================================================================
// Tests
// =============================================================================
