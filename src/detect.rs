//! Format detection for input documents.
//!
//! Only Word documents can be tallied. Detection exists so that other files
//! dropped into the input folder fail with a clear message instead of an
//! obscure ZIP or XML error.

use crate::container::decode_xml_bytes;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// OLE2 compound file magic, used by legacy `.doc` files.
const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Content type of the main part of a Word document (and macro-enabled variant).
const DOCX_CONTENT_TYPES: [&str; 2] = [
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
    "application/vnd.ms-word.document.macroEnabled.main+xml",
];

/// Content types that identify other Office packages.
const OTHER_OOXML: [(&str, &str); 2] = [
    (
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml",
        "Excel workbook",
    ),
    (
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml",
        "PowerPoint presentation",
    ),
];

/// Check that the file at `path` is a Word document.
pub fn ensure_word_document(path: impl AsRef<Path>) -> Result<()> {
    let mut reader = BufReader::new(File::open(path.as_ref())?);
    let mut magic = [0u8; 8];
    let read = reader.read(&mut magic)?;
    check_magic(&magic[..read])?;
    reader.rewind()?;
    ensure_word_package(reader)
}

/// Check that `data` holds a Word document.
pub fn ensure_word_bytes(data: &[u8]) -> Result<()> {
    check_magic(data)?;
    ensure_word_package(std::io::Cursor::new(data))
}

fn check_magic(data: &[u8]) -> Result<()> {
    if data.starts_with(&OLE_MAGIC) {
        return Err(Error::UnsupportedFormat("legacy .doc".to_string()));
    }
    if !is_zip_file(data) {
        return Err(Error::UnknownFormat);
    }
    Ok(())
}

fn ensure_word_package<R: Read + Seek>(reader: R) -> Result<()> {
    let mut archive = zip::ZipArchive::new(reader)?;

    let content_types = match archive.by_name("[Content_Types].xml") {
        Ok(mut file) => {
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)?;
            decode_xml_bytes(&bytes)?
        }
        Err(_) => {
            return Err(Error::MissingComponent("[Content_Types].xml".to_string()));
        }
    };

    if DOCX_CONTENT_TYPES.iter().any(|ct| content_types.contains(*ct)) {
        return Ok(());
    }
    if let Some((_, name)) = OTHER_OOXML
        .iter()
        .find(|(ct, _)| content_types.contains(*ct))
    {
        return Err(Error::UnsupportedFormat(name.to_string()));
    }

    // Fallback for packages with sloppy content types
    if archive.file_names().any(|n| n == "word/document.xml") {
        Ok(())
    } else {
        Err(Error::UnknownFormat)
    }
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZIP_MAGIC
}
