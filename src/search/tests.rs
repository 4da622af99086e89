//! End-to-end search scenarios: query string → matches → expanded rows

use crate::catalog::{flatten, Catalog, CategoryNode, NodeId};
use crate::search::{expand, highlight, search, search_with, MatchPolicy, QueryMode, SearchConfig};

fn leaf(id: NodeId, code: &str, name_ro: &str, name_en: &str) -> CategoryNode {
    CategoryNode {
        id,
        nc: code.to_string(),
        name_ro: name_ro.to_string(),
        name_en: name_en.to_string(),
        ..Default::default()
    }
}

fn branch(id: NodeId, code: &str, name_ro: &str, children: Vec<CategoryNode>) -> CategoryNode {
    CategoryNode {
        children,
        ..leaf(id, code, name_ro, "")
    }
}

fn flat_leaves(nodes: Vec<CategoryNode>) -> Catalog {
    flatten(&nodes)
}

fn matched_ids(catalog: &Catalog, raw: &str) -> Vec<NodeId> {
    search(catalog.records(), raw)
        .records(catalog.records())
        .map(|r| r.id)
        .collect()
}

// 1 "01" Animale vii
// ├── 2 "0101" Cai, măgari
// │   ├── 3 "010121000" Reproducători de rasă pură
// │   └── 4 "010129" Altele
// └── 5 "0102" Bovine
// 6 "94" Mobilier
// └── 7 "9403" Mobilier din lemn (Wooden children's bed)
fn nomenclature() -> Catalog {
    flatten(&[
        branch(1, "01", "Animale vii", vec![
            branch(2, "0101", "Cai, măgari", vec![
                leaf(3, "010121000", "Reproducători de rasă pură", "Pure-bred breeding animals"),
                leaf(4, "010129", "Altele", "Other"),
            ]),
            leaf(5, "0102", "Bovine", "Live bovine animals"),
        ]),
        branch(6, "94", "Mobilier", vec![
            leaf(7, "9403", "Mobilier din lemn", "Wooden children's bed"),
        ]),
    ])
}

// -----------------------------------------------------------------------------
// Exact phrase mode
// -----------------------------------------------------------------------------

#[test]
fn test_exact_phrase_matches_only_phrase() {
    let catalog = flat_leaves(vec![
        leaf(1, "", "Cai, măgari", ""),
        leaf(2, "", "Altele", ""),
    ]);
    assert_eq!(matched_ids(&catalog, "\"cai\""), vec![1]);
    assert_eq!(search(catalog.records(), "\"cai\"").mode, Some(QueryMode::Exact));
}

#[test]
fn test_exact_phrase_is_not_fuzzy() {
    let catalog = nomenclature();
    // Word order matters inside quotes
    assert!(matched_ids(&catalog, "\"magari cai\"").is_empty());
    assert_eq!(matched_ids(&catalog, "\"cai, magari\""), vec![2]);
    // Code is searched in exact mode
    assert_eq!(matched_ids(&catalog, "\"9403\""), vec![7]);
}

#[test]
fn test_exact_phrase_padding_marks_word_boundaries() {
    let catalog = flat_leaves(vec![
        leaf(1, "", "Mobilier din lemn", ""),
        leaf(2, "", "Dinamometre", ""),
    ]);
    assert_eq!(matched_ids(&catalog, "\" din \""), vec![1]);
    assert_eq!(matched_ids(&catalog, "\"din\""), vec![1, 2]);
}

// -----------------------------------------------------------------------------
// Wildcard mode
// -----------------------------------------------------------------------------

#[test]
fn test_wildcard_code_prefix() {
    let catalog = flat_leaves(vec![
        leaf(1, "0101", "", ""),
        leaf(2, "010121000", "", ""),
        leaf(3, "0102", "", ""),
    ]);
    assert_eq!(matched_ids(&catalog, "0101*"), vec![1, 2]);
}

#[test]
fn test_wildcard_ignores_names() {
    let catalog = flat_leaves(vec![leaf(1, "9403", "0101 lookalike", "")]);
    assert!(matched_ids(&catalog, "0101*").is_empty());
}

// -----------------------------------------------------------------------------
// Numeric mode
// -----------------------------------------------------------------------------

#[test]
fn test_numeric_spaces_stripped() {
    let catalog = flat_leaves(vec![leaf(1, "010121000", "", "")]);
    assert_eq!(matched_ids(&catalog, "0101 21"), vec![1]);
    assert!(matched_ids(&catalog, "9999").is_empty());
    assert_eq!(search(catalog.records(), "0101 21").mode, Some(QueryMode::Numeric));
}

// -----------------------------------------------------------------------------
// Multi-word fallback
// -----------------------------------------------------------------------------

#[test]
fn test_multi_word_and() {
    let catalog = nomenclature();
    assert_eq!(matched_ids(&catalog, "wood bed"), vec![7]);
    assert!(matched_ids(&catalog, "bed metal").is_empty());
}

#[test]
fn test_words_match_across_languages_and_diacritics() {
    let catalog = nomenclature();
    assert_eq!(matched_ids(&catalog, "MAGARI"), vec![2]);
    assert_eq!(matched_ids(&catalog, "rasa pura"), vec![3]);
    // One word in Romanian, one in English
    assert_eq!(matched_ids(&catalog, "lemn children"), vec![7]);
}

#[test]
fn test_policies_diverge_on_typos() {
    let catalog = nomenclature();
    let strict = search_with(catalog.records(), "woden bed", &SearchConfig::strict());
    let tolerant = search_with(catalog.records(), "woden bed", &SearchConfig::typo_tolerant());
    assert!(strict.is_empty());
    assert_eq!(
        tolerant.records(catalog.records()).map(|r| r.id).collect::<Vec<_>>(),
        vec![7]
    );
}

#[test]
fn test_weighted_keeps_tree_order_with_cap() {
    let catalog = flat_leaves(vec![
        leaf(1, "", "Bovine vii", ""),
        leaf(2, "", "Bovina", ""),
        leaf(3, "", "Bovine", ""),
    ]);
    let mut config = SearchConfig::typo_tolerant();
    config.fuzzy.max_results = Some(2);
    let result = search_with(catalog.records(), "bovine", &config);
    // "Bovina" scores lower than the two exact hits and is cut
    assert_eq!(result.indices, vec![0, 2]);
    assert_eq!(config.policy, MatchPolicy::Weighted);
}

// -----------------------------------------------------------------------------
// Identity vs. empty result
// -----------------------------------------------------------------------------

#[test]
fn test_blank_query_is_identity() {
    let catalog = nomenclature();
    let result = search(catalog.records(), "   ");
    assert!(result.is_identity());
    assert_eq!(result.indices, (0..catalog.len()).collect::<Vec<_>>());
}

#[test]
fn test_no_match_is_empty_not_identity() {
    let catalog = nomenclature();
    let result = search(catalog.records(), "zebra");
    assert!(!result.is_identity());
    assert!(result.is_empty());
}

#[test]
fn test_stripped_to_nothing_matches_nothing() {
    let catalog = nomenclature();
    assert!(matched_ids(&catalog, "\"\"").is_empty());
    assert!(matched_ids(&catalog, "*").is_empty());
}

// -----------------------------------------------------------------------------
// Search + expansion
// -----------------------------------------------------------------------------

#[test]
fn test_matches_expand_in_tree_order() {
    let catalog = nomenclature();
    let result = search(catalog.records(), "Altele");
    let rows = expand(&catalog, &result.indices, true);
    let ids: Vec<NodeId> = rows.iter().map(|&i| catalog.records()[i].id).collect();
    assert_eq!(ids, vec![1, 2, 4]);

    let result = search(catalog.records(), "0101*");
    let rows = expand(&catalog, &result.indices, false);
    let ids: Vec<NodeId> = rows.iter().map(|&i| catalog.records()[i].id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[test]
fn test_expansion_with_descendants() {
    // Match with ancestor_ids [1, 2] and two descendants 5, 6
    let catalog = flatten(&[branch(1, "", "", vec![
        branch(2, "", "", vec![
            branch(9, "", "target", vec![leaf(5, "", "", ""), leaf(6, "", "", "")]),
            leaf(10, "", "", ""),
        ]),
    ])]);
    let result = search(catalog.records(), "target");
    assert_eq!(catalog.records()[result.indices[0]].ancestor_ids, vec![1, 2]);

    let rows = expand(&catalog, &result.indices, true);
    let ids: Vec<NodeId> = rows.iter().map(|&i| catalog.records()[i].id).collect();
    assert_eq!(ids, vec![1, 2, 9, 5, 6]);
}

#[test]
fn test_highlight_matches_search_terms() {
    let catalog = nomenclature();
    let record = catalog.by_id(2).unwrap();
    let spans: Vec<(&str, bool)> = highlight(&record.names[0], &["cai"])
        .spans()
        .map(|s| (s.text, s.is_match))
        .collect();
    assert_eq!(spans, vec![("Cai", true), (", măgari", false)]);
}
