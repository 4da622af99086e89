//! Highlighter: Display Text → Plain/Matched Spans
//!
//! Occurrences are found in folded text (case and diacritic insensitive) and
//! mapped back onto the original string, so "Cai, mă" highlighted for "cai"
//! keeps its original capitalisation and accents.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use unicode_segmentation::UnicodeSegmentation;

use super::normalize::{normalize, strip_whitespace, NormalizedText};

// =============================================================================
// Types
// =============================================================================

/// A borrowed slice of the display text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HighlightSpan<'a> {
    pub text: &'a str,
    pub is_match: bool,
}

/// Owned span, for crossing the WASM boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedSpan {
    pub text: String,
    pub is_match: bool,
}

impl From<HighlightSpan<'_>> for OwnedSpan {
    fn from(span: HighlightSpan<'_>) -> Self {
        Self {
            text: span.text.to_string(),
            is_match: span.is_match,
        }
    }
}

/// Display text with its merged match ranges.
///
/// Iterating (via `spans()` or `&Highlighted`) can be repeated any number of
/// times; each pass yields the same spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted<'a> {
    text: &'a str,
    ranges: Vec<Range<usize>>,
}

impl<'a> Highlighted<'a> {
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Merged, sorted byte ranges of `text` that matched
    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    pub fn has_matches(&self) -> bool {
        !self.ranges.is_empty()
    }

    pub fn spans(&self) -> Spans<'_, 'a> {
        Spans {
            text: self.text,
            ranges: &self.ranges,
            pos: 0,
            next_range: 0,
            emitted: false,
        }
    }

    pub fn to_owned_spans(&self) -> Vec<OwnedSpan> {
        self.spans().map(OwnedSpan::from).collect()
    }
}

impl<'h, 'a> IntoIterator for &'h Highlighted<'a> {
    type Item = HighlightSpan<'a>;
    type IntoIter = Spans<'h, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.spans()
    }
}

/// Lazy span iterator over a `Highlighted`.
///
/// Spans borrow from the display text, not from the `Highlighted` value.
#[derive(Debug, Clone)]
pub struct Spans<'h, 'a> {
    text: &'a str,
    ranges: &'h [Range<usize>],
    pos: usize,
    next_range: usize,
    emitted: bool,
}

impl<'h, 'a> Iterator for Spans<'h, 'a> {
    type Item = HighlightSpan<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let span = if let Some(range) = self.ranges.get(self.next_range) {
            if self.pos < range.start {
                let span = HighlightSpan {
                    text: &self.text[self.pos..range.start],
                    is_match: false,
                };
                self.pos = range.start;
                span
            } else {
                self.next_range += 1;
                self.pos = range.end;
                HighlightSpan {
                    text: &self.text[range.clone()],
                    is_match: true,
                }
            }
        } else if self.pos < self.text.len() || !self.emitted {
            // Trailing plain text, or the whole (possibly empty) input
            let span = HighlightSpan {
                text: &self.text[self.pos..],
                is_match: false,
            };
            self.pos = self.text.len();
            span
        } else {
            return None;
        };

        self.emitted = true;
        Some(span)
    }
}

// =============================================================================
// Highlighting
// =============================================================================

/// Find every occurrence of every search word in `text`.
///
/// Ranges from all words are sorted and merged when they overlap or touch.
pub fn highlight<'a, S: AsRef<str>>(text: &'a str, search_words: &[S]) -> Highlighted<'a> {
    let words: Vec<String> = search_words
        .iter()
        .map(|w| normalize(w.as_ref()))
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() || text.is_empty() {
        return Highlighted {
            text,
            ranges: Vec::new(),
        };
    }

    let normalized = NormalizedText::new(text);
    let mut found: Vec<Range<usize>> = words.iter().flat_map(|w| normalized.find_all(w)).collect();
    found.sort_by_key(|r| (r.start, r.end));

    let mut ranges: Vec<Range<usize>> = Vec::with_capacity(found.len());
    for range in found {
        match ranges.last_mut() {
            Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
            _ => ranges.push(range),
        }
    }

    Highlighted { text, ranges }
}

/// Highlight the leading part of a code whose folded, whitespace-free form
/// equals `prefix`, so `0101*` marks "0101" in "01 01 21".
pub fn highlight_code_prefix<'a>(code: &'a str, prefix: &str) -> Highlighted<'a> {
    let prefix = strip_whitespace(&normalize(prefix));
    let mut ranges = Vec::new();
    if prefix.is_empty() {
        return Highlighted { text: code, ranges };
    }

    let mut compact = String::with_capacity(prefix.len());
    let mut start = None;
    for (at, grapheme) in code.grapheme_indices(true) {
        let folded = strip_whitespace(&normalize(grapheme));
        if folded.is_empty() {
            continue;
        }
        let begin = *start.get_or_insert(at);
        compact.push_str(&folded);

        if compact.len() >= prefix.len() {
            if compact.starts_with(prefix.as_str()) {
                ranges.push(begin..at + grapheme.len());
            }
            break;
        }
        if !prefix.starts_with(compact.as_str()) {
            break;
        }
    }

    Highlighted { text: code, ranges }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(text: &str, words: &[&str]) -> Vec<(String, bool)> {
        highlight(text, words)
            .spans()
            .map(|s| (s.text.to_string(), s.is_match))
            .collect()
    }

    fn span(text: &str, is_match: bool) -> (String, bool) {
        (text.to_string(), is_match)
    }

    // -------------------------------------------------------------------------
    // Requirement 1: Case/diacritic-insensitive, original text preserved
    // -------------------------------------------------------------------------
    #[test]
    fn test_highlight_maps_onto_original() {
        assert_eq!(
            spans("Cai, mă", &["cai"]),
            vec![span("Cai", true), span(", mă", false)]
        );
        assert_eq!(
            spans("Cai, măgari", &["MAG"]),
            vec![span("Cai, ", false), span("măg", true), span("ari", false)]
        );
    }

    // -------------------------------------------------------------------------
    // Requirement 2: No words or no matches → one plain span
    // -------------------------------------------------------------------------
    #[test]
    fn test_no_match_single_plain_span() {
        assert_eq!(spans("Altele", &["cai"]), vec![span("Altele", false)]);
        assert_eq!(spans("Altele", &[]), vec![span("Altele", false)]);
        assert_eq!(spans("Altele", &[""]), vec![span("Altele", false)]);
        assert_eq!(spans("", &["cai"]), vec![span("", false)]);
    }

    // -------------------------------------------------------------------------
    // Requirement 3: Overlapping and touching ranges merge
    // -------------------------------------------------------------------------
    #[test]
    fn test_ranges_merge() {
        // "wood" [0,4) and "oden" [2,6) overlap
        assert_eq!(
            spans("wooden bed", &["wood", "oden"]),
            vec![span("wooden", true), span(" bed", false)]
        );
        // "wood" [0,4) and "en" [4,6) touch
        assert_eq!(highlight("wooden", &["wood", "en"]).ranges().to_vec(), vec![0..6]);
    }

    #[test]
    fn test_multiple_occurrences_and_words() {
        assert_eq!(
            spans("bed, Bed and BED frame", &["bed", "frame"]),
            vec![
                span("bed", true),
                span(", ", false),
                span("Bed", true),
                span(" and ", false),
                span("BED", true),
                span(" ", false),
                span("frame", true),
            ]
        );
    }

    // -------------------------------------------------------------------------
    // Requirement 4: Spans concatenate back to the input and can be replayed
    // -------------------------------------------------------------------------
    #[test]
    fn test_spans_reconstruct_and_restart() {
        let text = "Mobilier din lemn pentru dormitoare, din lemn";
        let highlighted = highlight(text, &["lemn", "din"]);

        let first: String = highlighted.spans().map(|s| s.text).collect();
        let second: String = (&highlighted).into_iter().map(|s| s.text).collect();
        assert_eq!(first, text);
        assert_eq!(second, text);
        assert_eq!(highlighted.spans().filter(|s| s.is_match).count(), 4);
    }

    #[test]
    fn test_spans_outlive_highlighted() {
        let text = String::from("Cai, măgari");
        let spans: Vec<HighlightSpan<'_>> = highlight(&text, &["cai"]).spans().collect();
        assert_eq!(spans[0], HighlightSpan { text: "Cai", is_match: true });
        assert_eq!(spans.len(), 2);
    }

    // -------------------------------------------------------------------------
    // Requirement 5: Code prefixes highlight across stored whitespace
    // -------------------------------------------------------------------------
    #[test]
    fn test_code_prefix_skips_whitespace() {
        let spans: Vec<(String, bool)> = highlight_code_prefix("0101 21 000", "010121")
            .spans()
            .map(|s| (s.text.to_string(), s.is_match))
            .collect();
        assert_eq!(spans, vec![span("0101 21", true), span(" 000", false)]);

        assert_eq!(highlight_code_prefix("0101 21 000", "0101").ranges().to_vec(), vec![0..4]);
        assert_eq!(highlight_code_prefix(" 0101", "01").ranges().to_vec(), vec![1..3]);
    }

    #[test]
    fn test_code_prefix_mismatch() {
        assert!(!highlight_code_prefix("0102", "0101").has_matches());
        assert!(!highlight_code_prefix("01", "0101").has_matches());
        assert!(!highlight_code_prefix("0101", "").has_matches());
    }

    #[test]
    fn test_owned_spans() {
        let owned = highlight("Cai", &["cai"]).to_owned_spans();
        assert_eq!(owned, vec![OwnedSpan { text: "Cai".to_string(), is_match: true }]);
    }
}
