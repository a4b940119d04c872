//! DOCX plain-text extraction.

use crate::container::OoxmlContainer;
use crate::error::{Error, Result};

const DOCUMENT_PART: &str = "word/document.xml";

/// Extracts the plain text of a Word document.
///
/// Text is taken from header parts, the main document and footer parts, in
/// that order. Headers and footers follow archive order. Each paragraph starts with a blank line, tabs and breaks are
/// kept, and the result is trimmed.
pub struct DocxParser {
    container: OoxmlContainer,
}

impl DocxParser {
    /// Open a DOCX file for parsing.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let container = OoxmlContainer::open(path)?;
        Self::from_container(container)
    }

    /// Create a parser from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let container = OoxmlContainer::from_bytes(data)?;
        Self::from_container(container)
    }

    fn from_container(container: OoxmlContainer) -> Result<Self> {
        if !container.exists(DOCUMENT_PART) {
            return Err(Error::MissingComponent(DOCUMENT_PART.to_string()));
        }
        Ok(Self { container })
    }

    /// Extract the document text.
    pub fn extract_text(&self) -> Result<String> {
        let mut text = String::new();

        for part in self.container.list_xml_parts("word/header") {
            let xml = self.container.read_xml(&part)?;
            append_part_text(&xml, &mut text)?;
        }

        let xml = self.container.read_xml(DOCUMENT_PART)?;
        append_part_text(&xml, &mut text)?;

        for part in self.container.list_xml_parts("word/footer") {
            let xml = self.container.read_xml(&part)?;
            append_part_text(&xml, &mut text)?;
        }

        Ok(text.trim().to_string())
    }
}

/// Append the text of one WordprocessingML part to `out`.
fn append_part_text(xml: &str, out: &mut String) -> Result<()> {
    let mut reader = quick_xml::Reader::from_str(xml);
    // Whitespace inside w:t is significant
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(ref e)) => match e.name().as_ref() {
                b"w:p" => out.push_str("\n\n"),
                b"w:t" => in_text = true,
                b"w:tab" => out.push('\t'),
                b"w:br" | b"w:cr" => out.push('\n'),
                _ => {}
            },
            Ok(quick_xml::events::Event::Empty(ref e)) => match e.name().as_ref() {
                b"w:p" => out.push_str("\n\n"),
                b"w:tab" => out.push('\t'),
                b"w:br" | b"w:cr" => out.push('\n'),
                _ => {}
            },
            Ok(quick_xml::events::Event::Text(ref e)) => {
                if in_text {
                    let text = e.unescape().map_err(|e| Error::XmlParse(e.to_string()))?;
                    out.push_str(&text);
                }
            }
            Ok(quick_xml::events::Event::CData(ref e)) => {
                if in_text {
                    out.push_str(&String::from_utf8_lossy(e));
                }
            }
            Ok(quick_xml::events::Event::End(ref e)) => {
                if e.name().as_ref() == b"w:t" {
                    in_text = false;
                }
            }
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}
