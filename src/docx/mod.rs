//! DOCX (Word) text extraction.
//!
//! This module reads the plain text of Microsoft Word documents in the
//! Office Open XML (.docx) format.

mod parser;

pub use parser::DocxParser;
