//! Comma-separated table renderer.
//!
//! Fields are joined with `", "` and never quoted; labels and case names
//! are expected to be free of that delimiter.

use crate::model::Grid;

/// Separator between fields of a row.
pub const FIELD_DELIMITER: &str = ", ";

/// Serialize a grid, one line per row including the header.
pub fn to_csv(grid: &Grid) -> String {
    let mut output = grid.header.join(FIELD_DELIMITER);
    output.push('\n');

    for row in &grid.rows {
        let line = row
            .iter()
            .map(|cell| cell.to_string())
            .collect::<Vec<_>>()
            .join(FIELD_DELIMITER);
        output.push_str(&line);
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::CodeTable;
    use crate::model::DocumentRecord;
    use crate::pivot::aggregate;
    use crate::render::render;
    use std::collections::HashMap;

    fn record(treatment: &str, case: &str, ae: u64, words: u64) -> DocumentRecord {
        DocumentRecord::new(
            treatment,
            case,
            HashMap::from([("[AE]".to_string(), ae)]),
            words,
        )
    }

    fn codes() -> CodeTable {
        CodeTable::parse("[AE], article_error").unwrap()
    }

    #[test]
    fn test_normalized_two_treatments() {
        let records = vec![record("1", "Jimmy", 3, 50), record("2", "Jimmy", 0, 60)];
        let table = aggregate(&records, &codes()).unwrap();
        let text = render(&table, Some(100.0)).unwrap();
        assert_eq!(
            text,
            "subjects, article_error_1, word_count_1, article_error_2, word_count_2\n\
             Jimmy, 6.0, 50, 0.0, 60\n"
        );
    }

    #[test]
    fn test_raw_missing_treatment() {
        let records = vec![record("1", "Jimmy", 3, 50), record("2", "Sally", 1, 10)];
        let table = aggregate(&records, &codes()).unwrap();
        let text = render(&table, None).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "Jimmy, 3, 50, , ");
        assert_eq!(lines[2], "Sally, , , 1, 10");
    }

    #[test]
    fn test_raw_round_trip() {
        let records = vec![
            record("1", "Jimmy", 3, 50),
            record("2", "Jimmy", 0, 60),
            record("2", "Sally", 7, 80),
        ];
        let table = aggregate(&records, &codes()).unwrap();
        let text = render(&table, None).unwrap();

        let mut lines = text.lines();
        let header: Vec<&str> = lines.next().unwrap().split(FIELD_DELIMITER).collect();
        let mut parsed = Vec::new();
        for line in lines {
            let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
            for (idx, treatment) in table.treatments.iter().enumerate() {
                let start = 1 + idx * table.group_width();
                assert_eq!(header[start], format!("article_error_{}", treatment));
                if fields[start].is_empty() {
                    continue;
                }
                parsed.push(record(
                    &treatment.to_string(),
                    fields[0],
                    fields[start].parse().unwrap(),
                    fields[start + 1].parse().unwrap(),
                ));
            }
        }

        let mut expected = records.clone();
        expected.sort_by(|a, b| (&a.case, &a.treatment).cmp(&(&b.case, &b.treatment)));
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_render_is_idempotent() {
        let records = vec![record("1", "Jimmy", 3, 50)];
        let first = render(&aggregate(&records, &codes()).unwrap(), Some(100.0)).unwrap();
        let second = render(&aggregate(&records, &codes()).unwrap(), Some(100.0)).unwrap();
        assert_eq!(first, second);
    }
}
