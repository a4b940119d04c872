//! Pivot building: document records to a cases × treatments table.

use crate::codes::CodeTable;
use crate::error::{Error, Result};
use crate::model::{DocumentRecord, Group, Row, Table};
use std::collections::{BTreeMap, BTreeSet};

/// Build the pivot table for `records`.
///
/// Treatments are sorted numerically and cases lexically. Every code in
/// `codes` gets a column under every treatment. A (case, treatment) pair
/// without a document becomes an empty slot; a pair with more than one
/// document is an error.
pub fn aggregate(records: &[DocumentRecord], codes: &CodeTable) -> Result<Table> {
    if records.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut by_key: BTreeMap<(String, i64), &DocumentRecord> = BTreeMap::new();
    let mut treatments = BTreeSet::new();

    for record in records {
        let treatment = record
            .treatment_number()
            .ok_or_else(|| Error::InvalidTreatment {
                value: record.treatment.clone(),
                case: record.case.clone(),
            })?;
        treatments.insert(treatment);

        if by_key
            .insert((record.case.clone(), treatment), record)
            .is_some()
        {
            return Err(Error::DuplicateKey {
                treatment,
                case: record.case.clone(),
            });
        }
    }

    let treatments: Vec<i64> = treatments.into_iter().collect();
    let cases: BTreeSet<&str> = by_key.keys().map(|(case, _)| case.as_str()).collect();

    let rows = cases
        .into_iter()
        .map(|case| Row {
            case: case.to_string(),
            groups: treatments
                .iter()
                .map(|&treatment| {
                    by_key
                        .get(&(case.to_string(), treatment))
                        .map(|record| Group {
                            counts: codes.codes().map(|code| record.count(code)).collect(),
                            word_count: record.word_count,
                        })
                })
                .collect(),
        })
        .collect();

    Ok(Table {
        labels: codes.iter().map(|e| e.label.clone()).collect(),
        treatments,
        rows,
    })
}
