//! File-type dispatch around the fallback engine.
//!
//! Raw uploads are classified into a closed set of [`ContentKind`]s from their
//! magic bytes, an optional content-type hint and an optional file extension,
//! then parsed into a [`ParsedFile`]. PDFs go to a primary [`PdfTextSource`]
//! when one is configured and to the [`FallbackExtractor`] otherwise.
//!
//! Parsing is lenient: problems are recorded as warning strings on the result
//! and only an oversized PDF is a hard error.

use crate::config::ExtractionConfig;
use crate::error::{Error, Result};
use crate::extractor::FallbackExtractor;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// Default cap on the returned text, in characters.
pub const DEFAULT_MAX_CHARS: usize = 200_000;

/// Rows of a spreadsheet shown in the text preview.
#[cfg(feature = "office")]
const XLSX_PREVIEW_ROWS: usize = 100;

/// Supported content kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Plain text
    #[serde(rename = "txt")]
    Text,
    /// Markdown
    #[serde(rename = "md")]
    Markdown,
    /// Comma-separated values
    Csv,
    /// JSON document
    Json,
    /// PDF document
    Pdf,
    /// Excel workbook
    Xlsx,
    /// Word document
    Docx,
    /// PowerPoint presentation
    Pptx,
    /// Any other ZIP container
    Zip,
}

impl ContentKind {
    /// The canonical extension, also used as the serialized name.
    pub fn extension(&self) -> &'static str {
        match self {
            ContentKind::Text => "txt",
            ContentKind::Markdown => "md",
            ContentKind::Csv => "csv",
            ContentKind::Json => "json",
            ContentKind::Pdf => "pdf",
            ContentKind::Xlsx => "xlsx",
            ContentKind::Docx => "docx",
            ContentKind::Pptx => "pptx",
            ContentKind::Zip => "zip",
        }
    }

    /// Map a file extension (with or without the leading dot) to a kind.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "txt" | "text" => Some(ContentKind::Text),
            "md" | "markdown" => Some(ContentKind::Markdown),
            "csv" => Some(ContentKind::Csv),
            "json" => Some(ContentKind::Json),
            "pdf" => Some(ContentKind::Pdf),
            "xlsx" | "xls" => Some(ContentKind::Xlsx),
            "docx" => Some(ContentKind::Docx),
            "pptx" => Some(ContentKind::Pptx),
            "zip" => Some(ContentKind::Zip),
            _ => None,
        }
    }

    /// Classify raw bytes.
    ///
    /// Magic bytes win, then a leading `{` or `[`, then the content-type
    /// hint. Anything else is plain text.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_salvage::ingest::ContentKind;
    ///
    /// assert_eq!(ContentKind::sniff(b"%PDF-1.7\n", None), ContentKind::Pdf);
    /// assert_eq!(ContentKind::sniff(b"  {\"a\": 1}", None), ContentKind::Json);
    /// assert_eq!(ContentKind::sniff(b"a,b\n1,2", Some("text/csv")), ContentKind::Csv);
    /// ```
    pub fn sniff(bytes: &[u8], content_type_hint: Option<&str>) -> Self {
        if bytes.starts_with(b"%PDF-") {
            return ContentKind::Pdf;
        }
        if bytes.starts_with(b"PK\x03\x04") {
            return sniff_office(bytes).unwrap_or(ContentKind::Zip);
        }
        if let Some(b'{' | b'[') = bytes.iter().copied().find(|b| !b.is_ascii_whitespace()) {
            return ContentKind::Json;
        }

        if let Some(hint) = content_type_hint {
            let ct = hint.to_ascii_lowercase();
            if ct.contains("pdf") {
                return ContentKind::Pdf;
            }
            if ct.contains("spreadsheet") || ct.contains("excel") {
                return ContentKind::Xlsx;
            }
            if ct.contains("json") {
                return ContentKind::Json;
            }
            if ct.contains("csv") {
                return ContentKind::Csv;
            }
            if ct.contains("text") {
                return ContentKind::Text;
            }
        }

        ContentKind::Text
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Look inside a ZIP container for the top-level folder of an Office format.
#[cfg(feature = "office")]
fn sniff_office(bytes: &[u8]) -> Option<ContentKind> {
    let archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).ok()?;
    let names: Vec<&str> = archive.file_names().collect();

    if names.iter().any(|n| n.starts_with("xl/")) {
        Some(ContentKind::Xlsx)
    } else if names.iter().any(|n| n.starts_with("word/")) {
        Some(ContentKind::Docx)
    } else if names.iter().any(|n| n.starts_with("ppt/")) {
        Some(ContentKind::Pptx)
    } else {
        None
    }
}

#[cfg(not(feature = "office"))]
fn sniff_office(_bytes: &[u8]) -> Option<ContentKind> {
    None
}

/// The extension to honour: `ext` if given, else the file name's suffix.
fn requested_extension(file_name: Option<&str>, ext: Option<&str>) -> Option<String> {
    if let Some(ext) = ext.filter(|e| !e.is_empty()) {
        return Some(ext.trim_start_matches('.').to_ascii_lowercase());
    }
    let name = file_name?;
    let (_, suffix) = name.rsplit_once('.')?;
    Some(suffix.to_ascii_lowercase())
}

/// Kind requested through an explicit extension or the file name.
pub fn infer_kind(file_name: Option<&str>, ext: Option<&str>) -> Option<ContentKind> {
    requested_extension(file_name, ext).and_then(|e| ContentKind::from_extension(&e))
}

/// Options for [`parse_file_bytes`].
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Maximum characters of text returned; longer text is truncated
    pub max_chars: usize,
    /// Return warnings on the result (dropped otherwise)
    pub include_warnings: bool,
    /// Content-Type header that came with the bytes, if any
    pub content_type_hint: Option<String>,
    /// Settings for the fallback PDF engine
    pub extraction: ExtractionConfig,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            include_warnings: false,
            content_type_hint: None,
            extraction: ExtractionConfig::default(),
        }
    }
}

impl ParseOptions {
    /// Set the text cap in characters.
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Keep warnings on the result.
    pub fn with_warnings(mut self, include: bool) -> Self {
        self.include_warnings = include;
        self
    }

    /// Provide the Content-Type that accompanied the bytes.
    pub fn with_content_type_hint(mut self, hint: impl Into<String>) -> Self {
        self.content_type_hint = Some(hint.into());
        self
    }

    /// Set the fallback engine configuration.
    pub fn with_extraction(mut self, config: ExtractionConfig) -> Self {
        self.extraction = config;
        self
    }
}

/// A parsed upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedFile {
    /// Kind the bytes were parsed as
    pub file_type: ContentKind,
    /// Given file name, or `uploaded.<ext>`
    pub file_name: String,
    /// Extracted or decoded text, capped at `max_chars` characters
    pub text: String,
    /// Rows of a CSV file
    pub tables: Vec<Vec<String>>,
    /// Structured content: parsed JSON, or `{"sheets": [...]}` for workbooks
    pub obj: Option<Value>,
    /// Diagnostics; empty unless warnings were requested
    pub warnings: Vec<String>,
}

/// A full PDF parser tried before the fallback engine.
pub trait PdfTextSource {
    /// Name used in warnings.
    fn name(&self) -> &str;

    /// Extract the text of the whole document.
    fn extract_text(&self, bytes: &[u8]) -> Result<String>;
}

/// Dispatches bytes to the right parser.
pub struct FileParser {
    options: ParseOptions,
    primary_pdf: Option<Box<dyn PdfTextSource + Send + Sync>>,
}

impl FileParser {
    /// Create a parser that uses only the fallback engine for PDFs.
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            primary_pdf: None,
        }
    }

    /// Try `source` first for PDFs.
    pub fn with_primary_pdf(mut self, source: Box<dyn PdfTextSource + Send + Sync>) -> Self {
        self.primary_pdf = Some(source);
        self
    }

    /// The options in use.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse raw bytes.
    ///
    /// An explicit `ext` wins over the extension of `file_name`, and both win
    /// over the sniffed kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InputTooLarge`] for a PDF above the fallback engine's
    /// input limit. Every other problem is reported as a warning.
    pub fn parse(&self, bytes: &[u8], file_name: Option<&str>, ext: Option<&str>) -> Result<ParsedFile> {
        let mut warnings = Vec::new();
        let sniffed = ContentKind::sniff(bytes, self.options.content_type_hint.as_deref());

        let kind = match requested_extension(file_name, ext) {
            Some(requested) => match ContentKind::from_extension(&requested) {
                Some(kind) if kind != sniffed => {
                    warnings.push(format!(
                        "File looks like '{}' but ext/file_name suggests '{}'.",
                        sniffed, kind
                    ));
                    kind
                },
                Some(kind) => kind,
                None => {
                    warnings.push(format!(
                        "Unsupported file type '{}'. Parsing as '{}'.",
                        requested, sniffed
                    ));
                    sniffed
                },
            },
            None => sniffed,
        };

        log::debug!("Parsing {} bytes as {} (sniffed {})", bytes.len(), kind, sniffed);

        let mut parsed = ParsedFile {
            file_type: kind,
            file_name: file_name
                .map(str::to_string)
                .unwrap_or_else(|| format!("uploaded.{}", kind)),
            text: String::new(),
            tables: Vec::new(),
            obj: None,
            warnings: Vec::new(),
        };

        match kind {
            ContentKind::Text | ContentKind::Markdown => {
                parsed.text = String::from_utf8_lossy(bytes).into_owned();
            },
            ContentKind::Csv => {
                parsed.text = String::from_utf8_lossy(bytes).into_owned();
                parsed.tables = parse_csv_rows(&parsed.text);
            },
            ContentKind::Json => {
                let raw = String::from_utf8_lossy(bytes).into_owned();
                match serde_json::from_str::<Value>(&raw) {
                    Ok(value) => {
                        parsed.text = serde_json::to_string_pretty(&value)?;
                        parsed.obj = Some(value);
                    },
                    Err(e) => {
                        warnings.push(format!("Invalid JSON: {}", e));
                        parsed.text = raw;
                    },
                }
            },
            ContentKind::Pdf => {
                parsed.text = self.parse_pdf(bytes, &mut warnings)?;
            },
            ContentKind::Xlsx => match parse_workbook(bytes) {
                Ok((text, obj)) => {
                    parsed.text = text;
                    parsed.obj = Some(obj);
                },
                Err(e) => warnings.push(format!("Excel parsing failed: {}", e)),
            },
            ContentKind::Docx | ContentKind::Pptx | ContentKind::Zip => {
                warnings.push(format!(
                    "Unsupported file type '{}'. Returning raw text decode.",
                    kind
                ));
                parsed.text = String::from_utf8_lossy(bytes).into_owned();
            },
        }

        if parsed.text.chars().count() > self.options.max_chars {
            warnings.push(format!("Text truncated to {} chars.", self.options.max_chars));
            parsed.text = parsed.text.chars().take(self.options.max_chars).collect();
        }

        for warning in &warnings {
            log::warn!("{}: {}", parsed.file_name, warning);
        }
        if self.options.include_warnings {
            parsed.warnings = warnings;
        }

        Ok(parsed)
    }

    fn parse_pdf(&self, bytes: &[u8], warnings: &mut Vec<String>) -> Result<String> {
        match &self.primary_pdf {
            Some(source) => match source.extract_text(bytes) {
                Ok(text) if !text.trim().is_empty() => return Ok(text),
                Ok(_) => warnings.push(format!(
                    "{} found no text. Using fallback PDF text extractor.",
                    source.name()
                )),
                Err(e) => warnings.push(format!(
                    "{} failed ({}). Using fallback PDF text extractor.",
                    source.name(),
                    e
                )),
            },
            None => warnings.push("No primary PDF parser configured. Using fallback PDF text extractor.".to_string()),
        }

        log::info!("Falling back to stream scanning for {} byte PDF", bytes.len());
        let extraction = FallbackExtractor::new(self.options.extraction).extract(bytes)?;
        warnings.extend(extraction.warnings.iter().map(|w| w.to_string()));

        Ok(extraction.text)
    }
}

/// Parse bytes with default collaborators: no primary PDF parser.
///
/// # Examples
///
/// ```
/// use pdf_salvage::ingest::{parse_file_bytes, ContentKind, ParseOptions};
///
/// let parsed = parse_file_bytes(b"name,role\nJane,Engineer", Some("team.csv"), None, &ParseOptions::default())?;
/// assert_eq!(parsed.file_type, ContentKind::Csv);
/// assert_eq!(parsed.tables[1], vec!["Jane", "Engineer"]);
/// # Ok::<(), pdf_salvage::Error>(())
/// ```
pub fn parse_file_bytes(
    bytes: &[u8],
    file_name: Option<&str>,
    ext: Option<&str>,
    options: &ParseOptions,
) -> Result<ParsedFile> {
    FileParser::new(options.clone()).parse(bytes, file_name, ext)
}

/// Read a file and parse it, using its name for type inference.
pub fn parse_file_path(path: impl AsRef<Path>, options: &ParseOptions) -> Result<ParsedFile> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned());
    parse_file_bytes(&bytes, file_name.as_deref(), None, options)
}

/// Split CSV text into trimmed cells. Quoting is not interpreted.
fn parse_csv_rows(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .map(|line| line.split(',').map(|cell| cell.trim().to_string()).collect())
        .collect()
}

#[cfg(feature = "office")]
fn parse_workbook(bytes: &[u8]) -> Result<(String, Value)> {
    use calamine::{open_workbook_auto_from_rs, Data, Reader};
    use std::io::Cursor;

    fn cell_text(cell: &Data) -> String {
        match cell {
            Data::Empty => String::new(),
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
            Data::Int(i) => i.to_string(),
            Data::Float(f) => f.to_string(),
            Data::Bool(b) => b.to_string(),
            Data::DateTime(dt) => dt.to_string(),
            Data::Error(e) => format!("#ERR:{:?}", e),
        }
    }

    fn cell_value(cell: &Data) -> Value {
        match cell {
            Data::Empty => Value::Null,
            Data::Int(i) => Value::from(*i),
            Data::Float(f) => Value::from(*f),
            Data::Bool(b) => Value::Bool(*b),
            other => Value::String(cell_text(other)),
        }
    }

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| Error::Office(format!("failed to open workbook: {}", e)))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        return Err(Error::Office("no sheets found in workbook".to_string()));
    }

    let mut sheets = Vec::with_capacity(sheet_names.len());
    let mut preview = Vec::new();

    for name in &sheet_names {
        let range = workbook
            .worksheet_range(name)
            .map_err(|e| Error::Office(format!("failed to read sheet '{}': {}", name, e)))?;

        preview.push(format!("## {}", name));
        for row in range.rows().take(XLSX_PREVIEW_ROWS) {
            preview.push(row.iter().map(cell_text).collect::<Vec<_>>().join("\t"));
        }

        let rows: Vec<Value> = range
            .rows()
            .map(|row| Value::Array(row.iter().map(cell_value).collect()))
            .collect();
        sheets.push(serde_json::json!({ "sheet": name, "rows": rows }));
    }

    Ok((preview.join("\n"), serde_json::json!({ "sheets": sheets })))
}

#[cfg(not(feature = "office"))]
fn parse_workbook(_bytes: &[u8]) -> Result<(String, Value)> {
    Err(Error::Office(
        "spreadsheet support not compiled in (enable the `office` feature)".to_string(),
    ))
}
