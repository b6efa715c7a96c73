//! # PDF Salvage
//!
//! Best-effort text recovery for PDFs when a full PDF library is unavailable
//! or gives up.
//!
//! The engine never builds an object graph. It scans the raw bytes for
//! `stream ... endstream` blocks, inflates the FlateDecode ones, pulls the
//! literal strings shown by `Tj` and `TJ` out of the content, and stitches
//! the pieces back into readable text. Good enough for text-based documents
//! such as ATS-friendly CVs; image-only PDFs come back empty.
//!
//! ## Pipeline
//!
//! 1. [`locator`]: find stream blocks and flag the compressed ones
//! 2. [`decoders`]: inflate flagged blocks (zlib, then raw deflate)
//! 3. [`content::scanner`]: collect show-operator literals in document order
//! 4. [`content::literal`]: decode literal escapes
//! 5. [`text::merge`]: join chunks, inferring word boundaries
//! 6. [`text::contacts`]: repair letter-spaced emails, URLs and phone numbers
//!
//! [`ingest`] wraps the engine in file-type detection for uploads of text,
//! CSV, JSON, PDF and spreadsheet files.
//!
//! ## Quick Start
//!
//! ```
//! use pdf_salvage::{ExtractionConfig, FallbackExtractor};
//!
//! # fn main() -> Result<(), pdf_salvage::Error> {
//! let pdf = b"%PDF-1.4\nstream\nBT (J) Tj (ohn) Tj (Doe) Tj ET\nendstream\n%%EOF";
//!
//! let extractor = FallbackExtractor::new(ExtractionConfig::default());
//! let extraction = extractor.extract(pdf)?;
//!
//! assert_eq!(extraction.text, "John Doe");
//! for warning in &extraction.warnings {
//!     eprintln!("warning: {}", warning);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 (<http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license (<http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Stream location and decoding
pub mod decoders;
pub mod locator;

// Content stream scanning
pub mod content;

// Text post-processing
pub mod text;

// Pipeline
pub mod extractor;

// File-type dispatch
pub mod ingest;

// Re-exports
pub use config::ExtractionConfig;
pub use error::{Error, ExtractionWarning, Result};
pub use extractor::{extract_text, Extraction, ExtractionStats, FallbackExtractor};
pub use ingest::{parse_file_bytes, ContentKind, ParseOptions, ParsedFile, PdfTextSource};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
