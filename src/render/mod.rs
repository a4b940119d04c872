//! Output rendering for tally tables.
//!
//! A [`Table`] is first laid out as a [`Grid`](crate::model::Grid) for a
//! given rate, then serialized by one of the renderers here: the
//! comma-separated table format, JSON, or an aligned preview for terminals.
//!
//! # Example
//!
//! ```no_run
//! use codetally::{pivot, render, CodeTable, DocumentRecord};
//!
//! # let records: Vec<DocumentRecord> = Vec::new();
//! let table = pivot::aggregate(&records, &CodeTable::builtin())?;
//!
//! // Raw counts
//! let raw = render::render(&table, None)?;
//!
//! // Occurrences per 100 words
//! let normalized = render::render(&table, Some(100.0))?;
//! # Ok::<(), codetally::Error>(())
//! ```

mod csv;
mod json;
mod preview;

pub use csv::{to_csv, FIELD_DELIMITER};
pub use json::{to_json, JsonFormat};
pub use preview::to_preview;

use crate::error::Result;
use crate::model::Table;

/// Render `table` in the comma-separated table format.
pub fn render(table: &Table, rate: Option<f64>) -> Result<String> {
    Ok(to_csv(&table.grid(rate)?))
}
