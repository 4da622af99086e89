//! Text Normalizer: Case and Diacritic Folding
//!
//! Lowercases, decomposes each character canonically and drops the combining
//! marks, so "Cătălina" and "catalina" compare equal.
//!
//! Folding is strictly per character (no context-sensitive casing), which
//! makes the folded text of a string the concatenation of the folded text of
//! its grapheme clusters. `NormalizedText` relies on that to map match offsets
//! found in folded text back onto the original string.

use std::ops::Range;

use unicode_normalization::char::{decompose_canonical, is_combining_mark};
use unicode_segmentation::UnicodeSegmentation;

/// Fold `text` for case- and diacritic-insensitive comparison. Idempotent.
pub fn normalize(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.chars() {
        fold_char(c, &mut folded);
    }
    folded
}

/// Remove all whitespace, used for code comparisons ("0101 21" == "010121")
pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

#[inline]
fn fold_char(c: char, out: &mut String) {
    if c.is_ascii() {
        out.push(c.to_ascii_lowercase());
        return;
    }
    for lower in c.to_lowercase() {
        decompose_canonical(lower, |d| {
            if !is_combining_mark(d) {
                out.push(d);
            }
        });
    }
}

// =============================================================================
// NormalizedText
// =============================================================================

/// One grapheme of the original and the slice of folded text it produced
#[derive(Debug, Clone)]
struct Segment {
    folded_start: usize,
    original: Range<usize>,
}

/// Folded text with a grapheme-level map back to the original string
#[derive(Debug, Clone)]
pub struct NormalizedText<'a> {
    original: &'a str,
    folded: String,
    /// Graphemes that folded to at least one byte, in order
    segments: Vec<Segment>,
}

impl<'a> NormalizedText<'a> {
    pub fn new(original: &'a str) -> Self {
        let mut folded = String::with_capacity(original.len());
        let mut segments = Vec::new();

        for (start, grapheme) in original.grapheme_indices(true) {
            let folded_start = folded.len();
            for c in grapheme.chars() {
                fold_char(c, &mut folded);
            }
            if folded.len() > folded_start {
                segments.push(Segment {
                    folded_start,
                    original: start..start + grapheme.len(),
                });
            }
        }

        Self {
            original,
            folded,
            segments,
        }
    }

    pub fn original(&self) -> &'a str {
        self.original
    }

    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Map a byte range of the folded text onto the original string.
    ///
    /// Ranges that start or end inside a grapheme's folded output widen to the
    /// whole grapheme, so a highlight never splits a base letter from its marks.
    pub fn to_original(&self, folded: Range<usize>) -> Option<Range<usize>> {
        if folded.start >= folded.end || folded.end > self.folded.len() {
            return None;
        }
        let first = self.segment_at(folded.start)?;
        let last = self.segment_at(folded.end - 1)?;
        Some(first.original.start..last.original.end)
    }

    /// All non-overlapping occurrences of an already-folded needle, as ranges
    /// of the original string
    pub fn find_all(&self, needle: &str) -> Vec<Range<usize>> {
        if needle.is_empty() {
            return Vec::new();
        }
        self.folded
            .match_indices(needle)
            .filter_map(|(at, m)| self.to_original(at..at + m.len()))
            .collect()
    }

    fn segment_at(&self, folded_offset: usize) -> Option<&Segment> {
        let after = self
            .segments
            .partition_point(|seg| seg.folded_start <= folded_offset);
        after.checked_sub(1).map(|i| &self.segments[i])
    }
}

// =============================================================================
// Tests
// =============================================================================
