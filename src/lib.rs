//! # codetally
//!
//! Tally annotated error codes in Word documents.
//!
//! Annotators mark errors in student essays with short bracketed codes such
//! as `[AE]` (article error) or `[VT]` (verb tense). Given a folder of such
//! `.docx` files named `<treatment>.<subject>.docx`, this library counts
//! every code per document and pivots the counts into a table with one row
//! per subject and, for every treatment, one column per code plus a word
//! count. The table can be written as raw counts or as counts per
//! `rate` words.
//!
//! ## Quick Start
//!
//! ```no_run
//! use codetally::{TallyOptions, Tallier};
//!
//! // Writes MyCSV_frequencies.csv and MyCSV_normalized.csv
//! let options = TallyOptions::new("example_texts", "MyCSV").with_builtin_codes();
//! let paths = Tallier::new(options)?.process()?;
//! println!("{}", paths.normalized.display());
//! # Ok::<(), codetally::Error>(())
//! ```
//!
//! ## Building Blocks
//!
//! ```no_run
//! use codetally::{counter, filename, pivot, render, CodeTable, DocumentRecord};
//!
//! let codes = CodeTable::builtin();
//! let text = codetally::extract_text("texts/1.Jimmy.docx")?;
//! let counts = counter::count(&text, &codes, Some(counter::DEFAULT_KEY_TEXT));
//! let key = filename::parse("1.Jimmy.docx", ".", 0, 1)?;
//!
//! let records = vec![DocumentRecord::from_counts(key, counts, "1.Jimmy.docx")];
//! let table = pivot::aggregate(&records, &codes)?;
//! print!("{}", render::render(&table, Some(100.0))?);
//! # Ok::<(), codetally::Error>(())
//! ```

pub mod codes;
pub mod container;
pub mod counter;
pub mod detect;
pub mod docx;
pub mod error;
pub mod filename;
pub mod model;
pub mod options;
pub mod pivot;
pub mod render;
pub mod source;
pub mod tally;

// Re-exports
pub use codes::{CodeEntry, CodeSource, CodeTable, TextEncoding};
pub use counter::{Counts, CutoffStatus};
pub use error::{Error, Result};
pub use filename::{FileKey, KeyParser};
pub use model::{Cell, DocumentRecord, Grid, Table};
pub use options::{OutputFormat, TallyOptions};
pub use source::{DocxSource, TextSource};
pub use tally::{OutputPaths, Tallier};

use std::path::Path;

/// Extract the plain text of a Word document.
///
/// # Example
///
/// ```no_run
/// let text = codetally::extract_text("1.Jimmy.docx")?;
/// println!("{}", text);
/// # Ok::<(), codetally::Error>(())
/// ```
pub fn extract_text(path: impl AsRef<Path>) -> Result<String> {
    DocxSource.read_text(path.as_ref())
}

/// Run a whole tally with `options` and write both output files.
pub fn process(options: TallyOptions) -> Result<OutputPaths> {
    Tallier::new(options)?.process()
}
