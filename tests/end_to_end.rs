//! End-to-end tests over real DOCX files.
//!
//! Fixtures are built in memory with `zip::ZipWriter` and written to a
//! temporary folder, so the whole pipeline runs: listing, format detection,
//! text extraction, counting, pivoting and writing.

use codetally::{
    CodeSource, Error, OutputFormat, TallyOptions, Tallier, TextEncoding,
};
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;

const KEY: &str = "Key for Error Types: [AE] article error, [RO] run-on sentence";

/// Creates a minimal DOCX whose body has one paragraph per entry.
fn create_docx(paragraphs: &[&str]) -> Vec<u8> {
    let mut buffer = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#,
        )
        .unwrap();

        zip.start_file("_rels/.rels", options).unwrap();
        zip.write_all(
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#,
        )
        .unwrap();

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>"#,
        );
        for text in paragraphs {
            content.push_str(&format!(
                r#"
    <w:p>
      <w:r>
        <w:t xml:space="preserve">{}</w:t>
      </w:r>
    </w:p>"#,
                text
            ));
        }
        content.push_str(
            r#"
  </w:body>
</w:document>"#,
        );

        zip.start_file("word/document.xml", options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
        zip.finish().unwrap();
    }
    buffer
}

/// `n` filler words.
fn words(n: usize) -> String {
    vec!["word"; n].join(" ")
}

fn write_doc(dir: &Path, name: &str, paragraphs: &[&str]) {
    fs::write(dir.join(name), create_docx(paragraphs)).unwrap();
}

fn ae_codes(dir: &Path) -> CodeSource {
    let path = dir.join("codes.csv");
    fs::write(&path, "[AE], article_error\n").unwrap();
    CodeSource::file(path)
}

#[test]
fn test_two_treatments_normalized() {
    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    // 3 codes + 47 filler words = 50 words
    let first = format!("[AE] [AE] [AE] {}", words(47));
    write_doc(input.path(), "1.Jimmy.docx", &[&first, KEY]);
    let second = words(60);
    write_doc(input.path(), "2.Jimmy.docx", &[&second, KEY]);

    let options = TallyOptions::new(input.path(), out.path().join("MyCSV"))
        .with_code_source(ae_codes(out.path()));
    let paths = Tallier::new(options).unwrap().process().unwrap();

    let normalized = fs::read_to_string(&paths.normalized).unwrap();
    assert_eq!(
        normalized,
        "subjects, article_error_1, word_count_1, article_error_2, word_count_2\n\
         Jimmy, 6.0, 50, 0.0, 60\n"
    );

    let raw = fs::read_to_string(&paths.frequencies).unwrap();
    assert_eq!(
        raw,
        "subjects, article_error_1, word_count_1, article_error_2, word_count_2\n\
         Jimmy, 3, 50, 0, 60\n"
    );
    assert_eq!(paths.frequencies, out.path().join("MyCSV_frequencies.csv"));
    assert_eq!(paths.normalized, out.path().join("MyCSV_normalized.csv"));
}

#[test]
fn test_missing_combination_blank() {
    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    let jimmy = format!("[AE] {}", words(9));
    write_doc(input.path(), "1.Jimmy.docx", &[&jimmy]);
    write_doc(input.path(), "2.Sally.docx", &[&words(20)]);

    let options = TallyOptions::new(input.path(), out.path().join("out"))
        .with_code_source(ae_codes(out.path()));
    let text = Tallier::new(options).unwrap().tally(Some(100.0)).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[1], "Jimmy, 10.0, 10, , ");
    assert_eq!(lines[2], "Sally, , , 0.0, 20");
}

#[test]
fn test_answer_key_codes_not_counted() {
    let input = tempfile::tempdir().unwrap();
    let body = format!("He go [VT] to school. {}", words(2));
    write_doc(input.path(), "1.Ann.docx", &[&body, "Key for Error Types: [VT] verb tense"]);

    let options = TallyOptions::new(input.path(), "unused").with_builtin_codes();
    let records = Tallier::new(options).unwrap().records().unwrap();
    assert_eq!(records[0].count("[VT]"), 1);
    // He go VT to school word word
    assert_eq!(records[0].word_count, 7);
}

#[test]
fn test_lock_file_is_ignored() {
    let input = tempfile::tempdir().unwrap();
    write_doc(input.path(), "1.Ann.docx", &[&words(5)]);
    fs::write(input.path().join("~$1.Ann.docx"), b"lock").unwrap();

    let options = TallyOptions::new(input.path(), "unused").with_builtin_codes();
    let tallier = Tallier::new(options).unwrap();
    assert_eq!(tallier.files().len(), 1);
    assert!(tallier.records().is_ok());
}

#[test]
fn test_non_word_file_aborts() {
    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_doc(input.path(), "1.Ann.docx", &[&words(5)]);
    fs::write(input.path().join("2.Ann.docx"), b"plain text, not a package").unwrap();

    let options = TallyOptions::new(input.path(), out.path().join("out")).with_builtin_codes();
    let err = Tallier::new(options).unwrap().process().unwrap_err();
    assert!(matches!(err, Error::Document { .. }));
    assert!(fs::read_dir(out.path()).unwrap().next().is_none());
}

#[test]
fn test_duplicate_pair_aborts() {
    let input = tempfile::tempdir().unwrap();
    write_doc(input.path(), "1.Ann.docx", &[&words(5)]);
    write_doc(input.path(), "01.Ann.docx", &[&words(5)]);

    let options = TallyOptions::new(input.path(), "unused").with_builtin_codes();
    let err = Tallier::new(options).unwrap().table().unwrap_err();
    assert!(matches!(err, Error::DuplicateKey { treatment: 1, .. }));
}

#[test]
fn test_custom_layout_and_latin1_codes() {
    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_doc(input.path(), "Ann_pre_1.docx", &["[ÄE] x y"]);

    let codes = out.path().join("codes.csv");
    fs::write(&codes, b"[\xC4E], umlaut_error\n").unwrap();

    let options = TallyOptions::new(input.path(), out.path().join("res"))
        .with_delimiter("_")
        .with_case_index(0)
        .with_treatment_index(2)
        .with_code_file(&codes, TextEncoding::Latin1)
        .with_key_text(None::<String>)
        .with_format(OutputFormat::Json);
    let paths = Tallier::new(options).unwrap().process().unwrap();
    assert!(paths.normalized.ends_with("res_normalized.json"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&paths.frequencies).unwrap()).unwrap();
    assert_eq!(json["header"][1], "umlaut_error_1");
    assert_eq!(json["rows"][0][0], "Ann");
    assert_eq!(json["rows"][0][1], 1);
    // x y plus "E" left over from the code
    assert_eq!(json["rows"][0][2], 3);
}

#[test]
fn test_extract_text() {
    let dir = tempfile::tempdir().unwrap();
    write_doc(dir.path(), "1.Ann.docx", &["First [AE].", "Second."]);
    let text = codetally::extract_text(dir.path().join("1.Ann.docx")).unwrap();
    assert_eq!(text, "First [AE].\n\nSecond.");
}
