//! Per-document tally records.

use crate::counter::{Counts, CutoffStatus};
use crate::filename::FileKey;
use serde::Serialize;
use std::collections::HashMap;

/// The tally of one input document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRecord {
    /// Treatment identifier as it appears in the filename
    pub treatment: String,
    /// Case (subject) identifier
    pub case: String,
    /// Occurrences per code
    pub frequencies: HashMap<String, u64>,
    /// Words in the counted part of the text
    pub word_count: u64,
    /// Name of the source file, for diagnostics
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source: String,
    /// Whether the cutoff marker was found
    pub cutoff: CutoffStatus,
}

impl DocumentRecord {
    /// Build a record from explicit values.
    pub fn new(
        treatment: impl Into<String>,
        case: impl Into<String>,
        frequencies: HashMap<String, u64>,
        word_count: u64,
    ) -> Self {
        Self {
            treatment: treatment.into(),
            case: case.into(),
            frequencies,
            word_count,
            source: String::new(),
            cutoff: CutoffStatus::Disabled,
        }
    }

    /// Build a record from a parsed filename key and its counts.
    pub fn from_counts(key: FileKey, counts: Counts, source: impl Into<String>) -> Self {
        Self {
            treatment: key.treatment,
            case: key.case,
            frequencies: counts.frequencies,
            word_count: counts.word_count,
            source: source.into(),
            cutoff: counts.cutoff,
        }
    }

    /// Count for `code`, zero when the code was never counted.
    pub fn count(&self, code: &str) -> u64 {
        self.frequencies.get(code).copied().unwrap_or(0)
    }

    /// The treatment as a number, if it is one.
    pub fn treatment_number(&self) -> Option<i64> {
        self.treatment.trim().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_defaults_to_zero() {
        let record = DocumentRecord::new("1", "Jimmy", HashMap::from([("[AE]".to_string(), 3)]), 50);
        assert_eq!(record.count("[AE]"), 3);
        assert_eq!(record.count("[RO]"), 0);
    }

    #[test]
    fn test_treatment_number() {
        let record = DocumentRecord::new("02", "Jimmy", HashMap::new(), 0);
        assert_eq!(record.treatment_number(), Some(2));
        let record = DocumentRecord::new("pre", "Jimmy", HashMap::new(), 0);
        assert_eq!(record.treatment_number(), None);
    }
}
