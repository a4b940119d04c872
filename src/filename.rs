//! Treatment and case keys parsed from document filenames.
//!
//! Input files are named after the experimental design, e.g.
//! `1.Jimmy.docx` for subject `Jimmy` under treatment `1`.

use crate::error::{Error, Result};
use serde::Serialize;
use std::path::Path;

/// Default field delimiter.
pub const DEFAULT_DELIMITER: &str = ".";

/// Extensions removed from a filename before it is split.
const DOCUMENT_EXTENSIONS: &[&str] = &["docx", "docm"];

/// The (treatment, case) pair a document belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FileKey {
    pub treatment: String,
    pub case: String,
}

/// Splits filenames into keys using configured field positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyParser {
    delimiter: String,
    treatment_index: usize,
    case_index: usize,
}

impl KeyParser {
    /// Create a parser. The delimiter must not be empty.
    pub fn new(delimiter: impl Into<String>, treatment_index: usize, case_index: usize) -> Result<Self> {
        let delimiter = delimiter.into();
        if delimiter.is_empty() {
            return Err(Error::InvalidOption(
                "filename delimiter must not be empty".to_string(),
            ));
        }
        Ok(Self {
            delimiter,
            treatment_index,
            case_index,
        })
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Parse the key from a filename or path.
    ///
    /// Directory components and a Word document extension are ignored
    /// before the name is split. Any other suffix is a regular field.
    pub fn parse(&self, filename: impl AsRef<Path>) -> Result<FileKey> {
        let name = filename
            .as_ref()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let fields: Vec<&str> = strip_document_extension(&name)
            .split(self.delimiter.as_str())
            .collect();
        let required = self.treatment_index.max(self.case_index) + 1;
        if fields.len() < required {
            let found = fields.len();
            return Err(Error::MalformedFilename {
                filename: name,
                delimiter: self.delimiter.clone(),
                required,
                found,
            });
        }

        Ok(FileKey {
            treatment: fields[self.treatment_index].to_string(),
            case: fields[self.case_index].to_string(),
        })
    }
}

impl Default for KeyParser {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            treatment_index: 0,
            case_index: 1,
        }
    }
}

fn strip_document_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && DOCUMENT_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known)) =>
        {
            stem
        }
        _ => name,
    }
}

/// Parse a `(treatment, case)` key in one call.
pub fn parse(
    filename: impl AsRef<Path>,
    delimiter: &str,
    treatment_index: usize,
    case_index: usize,
) -> Result<FileKey> {
    KeyParser::new(delimiter, treatment_index, case_index)?.parse(filename)
}
