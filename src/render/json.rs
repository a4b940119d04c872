//! JSON renderer implementation.

use crate::error::Result;
use crate::model::Grid;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Convert a grid to JSON. Blank cells become `null`.
pub fn to_json(grid: &Grid, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(grid)?,
        JsonFormat::Pretty => serde_json::to_string_pretty(grid)?,
    };
    Ok(json)
}
