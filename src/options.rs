//! Tally run configuration.

use crate::codes::{CodeSource, TextEncoding};
use crate::counter::DEFAULT_KEY_TEXT;
use crate::filename::DEFAULT_DELIMITER;
use std::path::PathBuf;

/// Default normalization rate: occurrences per 100 words.
pub const DEFAULT_RATE: f64 = 100.0;

/// File names starting with this prefix are skipped (Word lock files).
pub const DEFAULT_SKIP_PREFIX: &str = "~";

/// Output file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `, `-separated tables in `.csv` files
    #[default]
    Csv,
    /// Pretty JSON grids in `.json` files
    Json,
}

impl OutputFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

/// Options for a tally run.
#[derive(Debug, Clone)]
pub struct TallyOptions {
    /// Folder holding the documents
    pub folder: PathBuf,

    /// Base of the output file names
    pub output_filename: PathBuf,

    /// Text after which codes are no longer counted (answer keys)
    pub key_text: Option<String>,

    /// Separator between filename fields
    pub delimiter: String,

    /// Where the code table comes from
    pub code_source: CodeSource,

    /// Filename field holding the treatment
    pub treatment_index: usize,

    /// Filename field holding the case
    pub case_index: usize,

    /// Multiplier for normalized counts
    pub rate: f64,

    /// Names starting with this are not read
    pub skip_prefix: String,

    /// Output file format
    pub format: OutputFormat,
}

impl TallyOptions {
    /// Create options with defaults for everything but the folders.
    pub fn new(folder: impl Into<PathBuf>, output_filename: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            output_filename: output_filename.into(),
            key_text: Some(DEFAULT_KEY_TEXT.to_string()),
            delimiter: DEFAULT_DELIMITER.to_string(),
            code_source: CodeSource::default(),
            treatment_index: 0,
            case_index: 1,
            rate: DEFAULT_RATE,
            skip_prefix: DEFAULT_SKIP_PREFIX.to_string(),
            format: OutputFormat::default(),
        }
    }

    /// Set the cutoff marker; `None` counts whole documents.
    pub fn with_key_text(mut self, key_text: Option<impl Into<String>>) -> Self {
        self.key_text = key_text.map(Into::into);
        self
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn with_code_source(mut self, source: CodeSource) -> Self {
        self.code_source = source;
        self
    }

    /// Read codes from `path` in `encoding`.
    pub fn with_code_file(mut self, path: impl Into<PathBuf>, encoding: TextEncoding) -> Self {
        self.code_source = CodeSource::File {
            path: path.into(),
            encoding,
        };
        self
    }

    /// Use the built-in codes even if a code file exists.
    pub fn with_builtin_codes(mut self) -> Self {
        self.code_source = CodeSource::Builtin;
        self
    }

    pub fn with_treatment_index(mut self, index: usize) -> Self {
        self.treatment_index = index;
        self
    }

    pub fn with_case_index(mut self, index: usize) -> Self {
        self.case_index = index;
        self
    }

    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_skip_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.skip_prefix = prefix.into();
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}
