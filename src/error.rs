//! Error types for the codetally library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for codetally operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while tallying documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format could not be determined.
    #[error("Unknown file format")]
    UnknownFormat,

    /// The file format is recognized but not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// A required document component is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// Error during text encoding conversion.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The configured code table could not be read or decoded.
    #[error("Cannot read code table {}: {reason}", .path.display())]
    UnreadableCodeTable { path: PathBuf, reason: String },

    /// The code table text is not a valid `code, label` listing.
    #[error("Malformed code table (line {line}): {reason}")]
    MalformedCodeTable { line: usize, reason: String },

    /// A filename has fewer delimiter-separated fields than the configured indices need.
    #[error(
        "Malformed filename {filename:?}: needs at least {required} fields separated by {delimiter:?}, found {found}"
    )]
    MalformedFilename {
        filename: String,
        delimiter: String,
        required: usize,
        found: usize,
    },

    /// A treatment identifier is not an integer.
    #[error("Treatment {value:?} (case {case:?}) is not an integer")]
    InvalidTreatment { value: String, case: String },

    /// There were no documents to tally.
    #[error("No input documents to tally")]
    EmptyInput,

    /// Two documents resolve to the same pivot cell.
    #[error("More than one document for treatment {treatment}, case {case:?}")]
    DuplicateKey { treatment: i64, case: String },

    /// A count was normalized against a document with no words.
    #[error("Cannot normalize treatment {treatment}, case {case:?}: word count is zero")]
    ZeroWordCount { treatment: i64, case: String },

    /// A configuration value is not usable.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Processing a single input document failed.
    #[error("{}: {source}", .path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    /// Error during rendering.
    #[error("Render error: {0}")]
    Render(String),
}

impl Error {
    /// Attach the path of the document being processed.
    pub fn in_document(self, path: impl Into<PathBuf>) -> Self {
        Error::Document {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(format!("JSON serialization error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownFormat;
        assert_eq!(err.to_string(), "Unknown file format");

        let err = Error::UnsupportedFormat("legacy .doc".to_string());
        assert_eq!(err.to_string(), "Unsupported format: legacy .doc");

        let err = Error::DuplicateKey {
            treatment: 2,
            case: "Jimmy".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "More than one document for treatment 2, case \"Jimmy\""
        );
    }

    #[test]
    fn test_malformed_filename_display() {
        let err = Error::MalformedFilename {
            filename: "Jimmy.docx".to_string(),
            delimiter: ".".to_string(),
            required: 2,
            found: 1,
        };
        assert_eq!(
            err.to_string(),
            "Malformed filename \"Jimmy.docx\": needs at least 2 fields separated by \".\", found 1"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_in_document_keeps_source() {
        let err = Error::EmptyInput.in_document("texts/1.Jimmy.docx");
        assert_eq!(
            err.to_string(),
            "texts/1.Jimmy.docx: No input documents to tally"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
