//! Per-document code counting.

use crate::codes::CodeTable;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Marker that starts the answer key appended to annotated essays.
pub const DEFAULT_KEY_TEXT: &str = "Key for Error Types:";

/// Characters that never belong to a word; they are deleted, not treated as separators.
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z\s0-9'-]").expect("static regex"));

/// What happened with the cutoff marker for one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CutoffStatus {
    /// The marker was found; text after it was ignored.
    Applied,
    /// The marker was not in the text; everything was counted.
    Missing,
    /// No marker was configured.
    Disabled,
}

/// Counting result for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counts {
    pub frequencies: HashMap<String, u64>,
    pub word_count: u64,
    pub cutoff: CutoffStatus,
}

/// Return the part of `text` before the first occurrence of `marker`.
pub fn apply_cutoff<'a>(text: &'a str, marker: Option<&str>) -> (&'a str, CutoffStatus) {
    match marker {
        None | Some("") => (text, CutoffStatus::Disabled),
        Some(marker) => match text.find(marker) {
            Some(pos) => (&text[..pos], CutoffStatus::Applied),
            None => (text, CutoffStatus::Missing),
        },
    }
}

/// Count non-overlapping occurrences of every code in `text`.
///
/// Every code in the table gets an entry, including those with zero hits.
pub fn count_codes(text: &str, codes: &CodeTable) -> HashMap<String, u64> {
    codes
        .codes()
        .map(|code| (code.to_string(), text.matches(code).count() as u64))
        .collect()
}

/// Count words: strip everything but ASCII letters, digits, whitespace,
/// `-` and `'`, then count whitespace-separated tokens.
pub fn word_count(text: &str) -> u64 {
    NON_WORD.replace_all(text, "").split_whitespace().count() as u64
}

/// Apply the cutoff, then count codes and words in what is left.
pub fn count(text: &str, codes: &CodeTable, cutoff_marker: Option<&str>) -> Counts {
    let (considered, cutoff) = apply_cutoff(text, cutoff_marker);
    Counts {
        frequencies: count_codes(considered, codes),
        word_count: word_count(considered),
        cutoff,
    }
}
