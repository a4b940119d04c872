//! Error-code tables.
//!
//! A code table maps the bracketed markers annotators put into essays
//! (`[AE]`, `[RO]`, ...) to the labels used in output column names. Tables
//! are read from a small `code, label` text file, or fall back to a built-in
//! set of six codes.

use crate::container::{decode_utf16_be, decode_utf16_le};
use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Codes used when no code file is configured.
const BUILTIN_CODES: [(&str, &str); 6] = [
    ("[AE]", "article_error"),
    ("[RO]", "run_on_sentence"),
    ("[WF]", "word_form_error"),
    ("[VT]", "verb_tense_error"),
    ("[PL]", "plural_error"),
    ("[SVA]", "3rd_person_error"),
];

/// Default code file name, resolved against the working directory.
pub const DEFAULT_CODE_FILE: &str = "codes.csv";

/// Text encoding of a code file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8; a leading BOM is dropped
    #[default]
    Utf8,
    /// UTF-16 with byte order taken from the BOM (little endian without one)
    Utf16,
    /// UTF-16 little endian
    Utf16Le,
    /// UTF-16 big endian
    Utf16Be,
    /// ISO-8859-1
    Latin1,
    /// 7-bit ASCII; any byte above 0x7F is an error
    Ascii,
}

impl TextEncoding {
    /// Canonical encoding name.
    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf16 => "utf-16",
            TextEncoding::Utf16Le => "utf-16le",
            TextEncoding::Utf16Be => "utf-16be",
            TextEncoding::Latin1 => "latin-1",
            TextEncoding::Ascii => "ascii",
        }
    }

    /// Decode raw bytes in this encoding.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            TextEncoding::Utf8 => {
                let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
                String::from_utf8(bytes.to_vec()).map_err(|e| Error::Encoding(e.to_string()))
            }
            TextEncoding::Utf16 => {
                if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
                    decode_utf16_be(rest)
                } else {
                    decode_utf16_le(bytes.strip_prefix(&[0xFF, 0xFE]).unwrap_or(bytes))
                }
            }
            TextEncoding::Utf16Le => decode_utf16_le(bytes),
            TextEncoding::Utf16Be => decode_utf16_be(bytes),
            TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            TextEncoding::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
                Some(pos) => Err(Error::Encoding(format!(
                    "byte 0x{:02X} at offset {} is not ASCII",
                    bytes[pos], pos
                ))),
                None => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            },
        }
    }
}

impl FromStr for TextEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase().replace('_', "-");
        match name.as_str() {
            "utf-8" | "utf8" | "utf-8-sig" | "utf8-sig" => Ok(TextEncoding::Utf8),
            "utf-16" | "utf16" => Ok(TextEncoding::Utf16),
            "utf-16le" | "utf-16-le" | "utf16le" => Ok(TextEncoding::Utf16Le),
            "utf-16be" | "utf-16-be" | "utf16be" => Ok(TextEncoding::Utf16Be),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Ok(TextEncoding::Latin1),
            "ascii" | "us-ascii" => Ok(TextEncoding::Ascii),
            _ => Err(Error::Encoding(format!("unknown encoding {:?}", s))),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where the code table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeSource {
    /// The built-in six codes.
    Builtin,
    /// A `code, label` file in the given encoding.
    File {
        path: PathBuf,
        encoding: TextEncoding,
    },
}

impl CodeSource {
    /// A code file read as UTF-8.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        CodeSource::File {
            path: path.into(),
            encoding: TextEncoding::Utf8,
        }
    }
}

impl Default for CodeSource {
    fn default() -> Self {
        CodeSource::file(DEFAULT_CODE_FILE)
    }
}

/// A single code and its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeEntry {
    /// Literal marker searched for in document text
    pub code: String,
    /// Name used in output columns
    pub label: String,
}

/// Ordered mapping from code to label.
///
/// Insertion order is the column order of every output table. Codes are
/// unique; redefining a code replaces its label but keeps its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CodeTable {
    entries: Vec<CodeEntry>,
}

impl CodeTable {
    /// The built-in table.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for (code, label) in BUILTIN_CODES {
            table.insert(code, label);
        }
        table
    }

    fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Load the table described by `source`.
    ///
    /// An explicitly configured file must be readable; there is no fallback
    /// to the built-in codes.
    pub fn load(source: &CodeSource) -> Result<Self> {
        match source {
            CodeSource::Builtin => Ok(Self::builtin()),
            CodeSource::File { path, encoding } => Self::read_file(path, *encoding),
        }
    }

    fn read_file(path: &Path, encoding: TextEncoding) -> Result<Self> {
        let unreadable = |reason: String| Error::UnreadableCodeTable {
            path: path.to_path_buf(),
            reason,
        };
        let bytes = std::fs::read(path).map_err(|e| unreadable(e.to_string()))?;
        let text = encoding
            .decode(&bytes)
            .map_err(|e| unreadable(format!("not valid {}: {}", encoding, e)))?;
        let table = Self::parse(&text)?;
        tracing::debug!(
            path = %path.display(),
            codes = table.len(),
            "loaded code table"
        );
        Ok(table)
    }

    /// Parse `code, label` lines.
    ///
    /// Blank lines are skipped. The code is the trimmed text before the
    /// first comma; any further commas are folded into the label as spaces.
    pub fn parse(text: &str) -> Result<Self> {
        let mut table = Self::empty();

        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let malformed = |reason: &str| Error::MalformedCodeTable {
                line: idx + 1,
                reason: reason.to_string(),
            };

            let mut fields = line.split(',');
            let code = fields.next().unwrap_or_default().trim();
            let rest: Vec<&str> = fields.collect();
            if rest.is_empty() {
                return Err(malformed("expected `code, label`"));
            }
            if code.is_empty() {
                return Err(malformed("empty code"));
            }
            let label = rest.join(" ");
            table.insert(code, label.trim());
        }

        if table.is_empty() {
            return Err(Error::MalformedCodeTable {
                line: 0,
                reason: "no codes defined".to_string(),
            });
        }
        Ok(table)
    }

    fn insert(&mut self, code: &str, label: &str) {
        match self.entries.iter_mut().find(|e| e.code == code) {
            Some(entry) => entry.label = label.to_string(),
            None => self.entries.push(CodeEntry {
                code: code.to_string(),
                label: label.to_string(),
            }),
        }
    }

    /// Label for `code`.
    pub fn label(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.code == code)
            .map(|e| e.label.as_str())
    }

    /// Codes in table order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.code.as_str())
    }

    /// Entries in table order.
    pub fn iter(&self) -> std::slice::Iter<'_, CodeEntry> {
        self.entries.iter()
    }

    /// Number of codes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no codes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a CodeTable {
    type Item = &'a CodeEntry;
    type IntoIter = std::slice::Iter<'a, CodeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
