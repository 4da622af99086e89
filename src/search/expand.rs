//! Context Expander: Matches → Readable Sub-Tree
//!
//! Adds every match's ancestors (breadcrumb context) and, optionally, its
//! whole subtree, then returns the union in tree order.
//!
//! Marks live in a bitmap over record indices, so the union is deduplicated
//! and already sorted when read back. Two invariants keep the walk bounded:
//! a marked record always has all of its ancestors marked, and a record
//! expanded as a match has its whole subtree marked. Ancestor walks therefore
//! stop at the first marked record and subtree marks skip already-covered
//! matches.

use crate::catalog::Catalog;

/// Expand matched record indices with ancestors and optionally descendants.
///
/// Returns record indices in ascending `original_index` order.
pub fn expand(catalog: &Catalog, matched: &[usize], include_descendants: bool) -> Vec<usize> {
    let len = catalog.len();
    let mut marked = vec![false; len];
    let mut expanded_subtree = vec![false; len];
    let mut count = 0usize;

    for &index in matched {
        if index >= len {
            continue;
        }

        // Ancestors, nearest first, until an already-marked one
        let mut cursor = catalog.parent_of(index);
        while let Some(ancestor) = cursor {
            if marked[ancestor] {
                break;
            }
            marked[ancestor] = true;
            count += 1;
            cursor = catalog.parent_of(ancestor);
        }

        if !marked[index] {
            marked[index] = true;
            count += 1;
        }

        if include_descendants && !expanded_subtree[index] {
            expanded_subtree[index] = true;
            for descendant in catalog.descendants_of(index) {
                expanded_subtree[descendant] = true;
                if !marked[descendant] {
                    marked[descendant] = true;
                    count += 1;
                }
            }
        }
    }

    let mut ordered = Vec::with_capacity(count);
    ordered.extend(
        marked
            .iter()
            .enumerate()
            .filter(|(_, m)| **m)
            .map(|(i, _)| i),
    );
    ordered
}
