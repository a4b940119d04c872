//! Document text providers.

use crate::detect::ensure_word_document;
use crate::docx::DocxParser;
use crate::error::Result;
use std::path::Path;

/// Supplies the plain text of an input document.
///
/// Implementations are shared across the worker threads that read documents
/// in parallel, hence the `Send + Sync` bound.
pub trait TextSource: Send + Sync {
    /// Return the full plain text of the document at `path`.
    fn read_text(&self, path: &Path) -> Result<String>;
}

/// Reads `.docx` files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxSource;

impl TextSource for DocxSource {
    fn read_text(&self, path: &Path) -> Result<String> {
        ensure_word_document(path)?;
        DocxParser::open(path)?.extract_text()
    }
}

impl<F> TextSource for F
where
    F: Fn(&Path) -> Result<String> + Send + Sync,
{
    fn read_text(&self, path: &Path) -> Result<String> {
        self(path)
    }
}
