//! Column-aligned preview for terminals.

use crate::model::Grid;
use unicode_width::UnicodeWidthStr;

/// Render a grid with padded columns separated by two spaces.
///
/// Widths are measured in terminal columns, so names in wide scripts
/// still line up.
pub fn to_preview(grid: &Grid) -> String {
    let rows: Vec<Vec<String>> = std::iter::once(grid.header.clone())
        .chain(
            grid.rows
                .iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect()),
        )
        .collect();

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.width());
        }
    }

    let mut output = String::new();
    for row in &rows {
        let mut line = String::new();
        for (idx, cell) in row.iter().enumerate() {
            if idx > 0 {
                line.push_str("  ");
            }
            line.push_str(cell);
            line.push_str(&" ".repeat(widths[idx] - cell.width()));
        }
        output.push_str(line.trim_end());
        output.push('\n');
    }
    output
}
