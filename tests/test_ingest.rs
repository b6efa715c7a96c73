//! Integration tests for file-type dispatch.

use pdf_salvage::ingest::{parse_file_path, FileParser};
use pdf_salvage::{parse_file_bytes, ContentKind, Error, ParseOptions, PdfTextSource, Result};
use std::io::Write as _;

struct PagesSource;

impl PdfTextSource for PagesSource {
    fn name(&self) -> &str {
        "pages"
    }

    fn extract_text(&self, _bytes: &[u8]) -> Result<String> {
        Ok(["Page one", "Page two"].join("\n\n"))
    }
}

struct EmptySource;

impl PdfTextSource for EmptySource {
    fn name(&self) -> &str {
        "empty"
    }

    fn extract_text(&self, _bytes: &[u8]) -> Result<String> {
        Ok(String::new())
    }
}

const CV_PDF: &[u8] = b"%PDF-1.4\n4 0 obj\n<< /Length 44 >>\nstream\nBT (C) Tj (V) Tj ( of Jane) Tj ET\nendstream\nendobj\n%%EOF";

#[test]
fn test_parse_pdf_bytes_with_fallback() {
    let options = ParseOptions::default().with_warnings(true);
    let parsed = parse_file_bytes(CV_PDF, None, None, &options).unwrap();

    assert_eq!(parsed.file_type, ContentKind::Pdf);
    assert_eq!(parsed.file_name, "uploaded.pdf");
    assert_eq!(parsed.text, "CV of Jane");
    assert!(!parsed.warnings.is_empty());
}

#[test]
fn test_primary_source_used_first() {
    let parser = FileParser::new(ParseOptions::default()).with_primary_pdf(Box::new(PagesSource));
    let parsed = parser.parse(CV_PDF, Some("cv.pdf"), None).unwrap();
    assert_eq!(parsed.text, "Page one\n\nPage two");
}

#[test]
fn test_empty_primary_result_falls_back() {
    let options = ParseOptions::default().with_warnings(true);
    let parser = FileParser::new(options).with_primary_pdf(Box::new(EmptySource));
    let parsed = parser.parse(CV_PDF, Some("cv.pdf"), None).unwrap();

    assert_eq!(parsed.text, "CV of Jane");
    assert_eq!(parsed.warnings[0], "empty found no text. Using fallback PDF text extractor.");
}

#[test]
fn test_content_type_hint() {
    let options = ParseOptions::default().with_content_type_hint("text/csv; charset=utf-8");
    let parsed = parse_file_bytes(b"skill,years\nRust,5", None, None, &options).unwrap();

    assert_eq!(parsed.file_type, ContentKind::Csv);
    assert_eq!(parsed.tables.len(), 2);
    assert_eq!(parsed.file_name, "uploaded.csv");
}

#[test]
fn test_markdown_by_extension() {
    let parsed = parse_file_bytes(b"# Jane\n\n- Rust", Some("cv.md"), None, &ParseOptions::default()).unwrap();
    assert_eq!(parsed.file_type, ContentKind::Markdown);
    assert_eq!(parsed.text, "# Jane\n\n- Rust");
}

#[test]
fn test_parsed_file_json_shape() {
    let parsed = parse_file_bytes(b"{\"skills\": [\"rust\"]}", Some("p.json"), None, &ParseOptions::default()).unwrap();
    let value = serde_json::to_value(&parsed).unwrap();

    assert_eq!(value["file_type"], "json");
    assert_eq!(value["file_name"], "p.json");
    assert_eq!(value["obj"]["skills"][0], "rust");
    assert_eq!(value["tables"], serde_json::json!([]));
    assert_eq!(value["warnings"], serde_json::json!([]));
}

#[test]
fn test_parse_file_path() {
    let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    file.write_all(CV_PDF).unwrap();
    file.flush().unwrap();

    let parsed = parse_file_path(file.path(), &ParseOptions::default()).unwrap();
    assert_eq!(parsed.file_type, ContentKind::Pdf);
    assert!(parsed.file_name.ends_with(".pdf"));
    assert_eq!(parsed.text, "CV of Jane");
}

#[test]
fn test_parse_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = parse_file_path(dir.path().join("missing.pdf"), &ParseOptions::default());
    assert!(matches!(result, Err(Error::Io(_))));
}

#[cfg(feature = "office")]
mod office {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn container(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_sniff_office_containers() {
        let docx = container(&[("word/document.xml", "<w:document/>")]);
        assert_eq!(ContentKind::sniff(&docx, None), ContentKind::Docx);

        let pptx = container(&[("ppt/presentation.xml", "<p:presentation/>")]);
        assert_eq!(ContentKind::sniff(&pptx, None), ContentKind::Pptx);

        let plain = container(&[("notes.txt", "hello")]);
        assert_eq!(ContentKind::sniff(&plain, None), ContentKind::Zip);
    }

    #[test]
    fn test_broken_workbook_warns() {
        let fake = container(&[("xl/workbook.xml", "not a workbook")]);
        let options = ParseOptions::default().with_warnings(true);
        let parsed = parse_file_bytes(&fake, None, None, &options).unwrap();

        assert_eq!(parsed.file_type, ContentKind::Xlsx);
        assert!(parsed.text.is_empty());
        assert!(parsed.warnings[0].starts_with("Excel parsing failed"));
    }
}
