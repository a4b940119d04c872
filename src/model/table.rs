//! Pivot table and rendered grid structures.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Label of the first header column.
pub const CASE_HEADER: &str = "subjects";

/// Counts of one document inside the pivot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    /// One count per code, in code-table order
    pub counts: Vec<u64>,
    pub word_count: u64,
}

/// One case (subject) and its slot per treatment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub case: String,
    /// One entry per treatment, `None` where no document exists
    pub groups: Vec<Option<Group>>,
}

/// Cases × (treatment, code) pivot of document tallies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    /// Code labels in column order
    pub labels: Vec<String>,
    /// Treatments in ascending order
    pub treatments: Vec<i64>,
    /// Rows in case order
    pub rows: Vec<Row>,
}

impl Table {
    /// Number of columns each treatment occupies.
    pub fn group_width(&self) -> usize {
        self.labels.len() + 1
    }

    /// Header row: `subjects`, then `<label>_<treatment>` for every code and
    /// `word_count_<treatment>`, per treatment.
    pub fn header(&self) -> Vec<String> {
        let mut header = Vec::with_capacity(1 + self.treatments.len() * self.group_width());
        header.push(CASE_HEADER.to_string());
        for treatment in &self.treatments {
            for label in &self.labels {
                header.push(format!("{}_{}", label, treatment));
            }
            header.push(format!("word_count_{}", treatment));
        }
        header
    }

    /// Lay the table out as cells.
    ///
    /// Without a rate (or with a rate of zero) code cells hold raw counts.
    /// With a rate they hold `round(count / word_count * rate, 2)`, which
    /// fails for a document with no words.
    pub fn grid(&self, rate: Option<f64>) -> Result<Grid> {
        let rate = rate.filter(|r| *r != 0.0);
        let mut rows = Vec::with_capacity(self.rows.len());

        for row in &self.rows {
            let mut cells = Vec::with_capacity(1 + self.treatments.len() * self.group_width());
            cells.push(Cell::Text(row.case.clone()));

            for (treatment, group) in self.treatments.iter().zip(&row.groups) {
                let Some(group) = group else {
                    cells.extend(std::iter::repeat_n(Cell::Blank, self.group_width()));
                    continue;
                };
                for &count in &group.counts {
                    let cell = match rate {
                        None => Cell::Count(count),
                        Some(rate) => Cell::Rate(
                            normalize(count, group.word_count, rate).ok_or_else(|| {
                                Error::ZeroWordCount {
                                    treatment: *treatment,
                                    case: row.case.clone(),
                                }
                            })?,
                        ),
                    };
                    cells.push(cell);
                }
                cells.push(Cell::Count(group.word_count));
            }
            rows.push(cells);
        }

        Ok(Grid {
            header: self.header(),
            rows,
        })
    }
}

/// `round(count / word_count * rate, 2)`, or `None` when `word_count` is zero.
pub fn normalize(count: u64, word_count: u64, rate: f64) -> Option<f64> {
    if word_count == 0 {
        return None;
    }
    let value = count as f64 / word_count as f64 * rate;
    // Ties go to the even digit, as Python's round() does
    Some((value * 100.0).round_ties_even() / 100.0)
}

/// A single output cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    /// No document for this (case, treatment)
    Blank,
    Text(String),
    Count(u64),
    Rate(f64),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Blank => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Count(n) => write!(f, "{}", n),
            // Whole rates keep one decimal: 6.0, not 6
            Cell::Rate(r) if r.is_finite() && r.fract() == 0.0 => write!(f, "{:.1}", r),
            Cell::Rate(r) => write!(f, "{}", r),
        }
    }
}

/// A header plus rows of typed cells, ready for serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}
