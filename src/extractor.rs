//! The fallback extraction pipeline.
//!
//! Wires the stages together: locate stream blocks, inflate the compressed
//! ones, scan each block for show operators, merge the chunks and repair
//! contact spans. Every stage is local to one invocation, so extractors can be
//! shared freely between threads.
//!
//! Structural problems never abort an extraction. A block that fails to
//! inflate is dropped and reported as an [`ExtractionWarning`]; the only hard
//! error is an input larger than the configured limit.

use crate::config::ExtractionConfig;
use crate::content::{scan_text_chunks, TextChunk};
use crate::decoders::decode_block;
use crate::error::{Error, ExtractionWarning, Result};
use crate::locator::locate_streams;
use crate::text::{normalize_contacts, ChunkMerger};
use serde::Serialize;

/// Counters collected while extracting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionStats {
    /// Stream blocks located
    pub blocks: usize,
    /// Blocks flagged as FlateDecode
    pub flate_blocks: usize,
    /// Flagged blocks that inflated successfully
    pub inflated_blocks: usize,
    /// Text chunks found by the operator scanner
    pub chunks: usize,
}

/// Result of a fallback extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Merged and normalized text, trimmed; empty when nothing was found
    pub text: String,
    /// Advisory diagnostics, in the order they were raised
    pub warnings: Vec<ExtractionWarning>,
    /// Pipeline counters
    pub stats: ExtractionStats,
}

impl Extraction {
    /// Whether the extraction produced no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Chunks collected from a document before merging.
#[derive(Debug, Clone, Default)]
struct Collected {
    chunks: Vec<TextChunk>,
    warnings: Vec<ExtractionWarning>,
    stats: ExtractionStats,
}

impl Collected {
    fn warn(&mut self, warning: ExtractionWarning) {
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }
}

/// Best-effort PDF text extractor that needs no object model.
///
/// # Examples
///
/// ```
/// use pdf_salvage::{ExtractionConfig, FallbackExtractor};
///
/// let pdf = b"%PDF-1.4\n1 0 obj\n<< /Length 40 >>\nstream\nBT (H) Tj (ello,) Tj ( World) Tj ET\nendstream\nendobj\n%%EOF";
/// let extraction = FallbackExtractor::new(ExtractionConfig::default()).extract(pdf)?;
/// assert_eq!(extraction.text, "Hello, World");
/// # Ok::<(), pdf_salvage::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct FallbackExtractor {
    config: ExtractionConfig,
}

impl FallbackExtractor {
    /// Create an extractor with the given configuration.
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract text from a whole PDF file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InputTooLarge`] when `doc` exceeds the configured
    /// input limit. Nothing else fails: a document without usable streams
    /// yields empty text plus warnings.
    pub fn extract(&self, doc: &[u8]) -> Result<Extraction> {
        let collected = self.collect(doc)?;
        let Collected {
            chunks,
            mut warnings,
            stats,
        } = collected;

        let merger = ChunkMerger::new().with_collapse_short_word_runs(self.config.collapse_short_word_runs);
        let mut text = merger.merge(chunks.iter().map(|c| c.content.as_str()));

        if self.config.normalize_contacts {
            text = normalize_contacts(&text);
        }

        let text = text.trim().to_string();
        if text.is_empty() {
            log::warn!("{}", ExtractionWarning::NoTextFound);
            warnings.push(ExtractionWarning::NoTextFound);
        }

        log::debug!(
            "Fallback extraction: {} blocks ({} flate, {} inflated), {} chunks, {} chars",
            stats.blocks,
            stats.flate_blocks,
            stats.inflated_blocks,
            stats.chunks,
            text.len()
        );

        Ok(Extraction {
            text,
            warnings,
            stats,
        })
    }

    /// Scan a document into ordered text chunks without merging them.
    ///
    /// Chunk `order_index` values are strictly increasing across the whole
    /// document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InputTooLarge`] when `doc` exceeds the input limit.
    pub fn chunks(&self, doc: &[u8]) -> Result<Vec<TextChunk>> {
        Ok(self.collect(doc)?.chunks)
    }

    fn collect(&self, doc: &[u8]) -> Result<Collected> {
        if !self.config.accepts_input(doc.len()) {
            return Err(Error::InputTooLarge {
                size: doc.len(),
                limit: self.config.max_input_size,
            });
        }

        let mut collected = Collected::default();

        for block in locate_streams(doc, self.config.flate_context_window) {
            collected.stats.blocks += 1;
            if block.is_flate {
                collected.stats.flate_blocks += 1;
            }

            let decoded = match decode_block(&block, self.config.max_inflated_size) {
                Ok(decoded) => decoded,
                Err(Error::InflateLimitExceeded(limit)) => {
                    collected.warn(ExtractionWarning::InflateLimitExceeded {
                        block: block.index,
                        limit,
                    });
                    continue;
                },
                Err(e) => {
                    collected.warn(ExtractionWarning::InflateFailed {
                        block: block.index,
                        reason: e.to_string(),
                    });
                    continue;
                },
            };

            if block.is_flate {
                collected.stats.inflated_blocks += 1;
            }
            if decoded.is_empty() {
                continue;
            }

            let chunks = scan_text_chunks(&decoded, collected.chunks.len());
            collected.chunks.extend(chunks);
        }

        collected.stats.chunks = collected.chunks.len();

        if collected.stats.blocks == 0 {
            collected.warn(ExtractionWarning::NoStreamBlocks);
        } else if collected.stats.flate_blocks == 0 {
            collected.warn(ExtractionWarning::NoFlateBlocks);
        }

        Ok(collected)
    }
}

/// Extract text with the default configuration.
///
/// Returns an empty string when nothing could be recovered.
pub fn extract_text(doc: &[u8]) -> Result<String> {
    Ok(FallbackExtractor::default().extract(doc)?.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn zlib(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn flate_object(content: &[u8]) -> Vec<u8> {
        let compressed = zlib(content);
        let mut obj = format!("<< /Length {} /Filter /FlateDecode >>\nstream\n", compressed.len()).into_bytes();
        obj.extend_from_slice(&compressed);
        obj.extend_from_slice(b"\nendstream\n");
        obj
    }

    #[test]
    fn test_uncompressed_stream() {
        let doc = b"<< /Length 30 >>\nstream\nBT (H) Tj (ello,) Tj ( World) Tj ET\nendstream";
        let extraction = FallbackExtractor::default().extract(doc).unwrap();
        assert_eq!(extraction.text, "Hello, World");
        assert_eq!(extraction.stats.blocks, 1);
        assert_eq!(extraction.stats.chunks, 3);
        assert_eq!(extraction.warnings, vec![ExtractionWarning::NoFlateBlocks]);
    }

    #[test]
    fn test_compressed_streams_in_order() {
        let mut doc = b"%PDF-1.5\n".to_vec();
        doc.extend(flate_object(b"BT (Jane) Tj ET"));
        doc.extend(flate_object(b"BT [(D) 20 (oe)] TJ ET"));

        let extraction = FallbackExtractor::default().extract(&doc).unwrap();
        assert_eq!(extraction.text, "Jane Doe");
        assert_eq!(extraction.stats.flate_blocks, 2);
        assert_eq!(extraction.stats.inflated_blocks, 2);
        assert!(extraction.warnings.is_empty());
    }

    #[test]
    fn test_no_streams() {
        let extraction = FallbackExtractor::default().extract(b"%PDF-1.4\n%%EOF").unwrap();
        assert!(extraction.is_empty());
        assert_eq!(
            extraction.warnings,
            vec![ExtractionWarning::NoStreamBlocks, ExtractionWarning::NoTextFound]
        );
    }

    #[test]
    fn test_broken_flate_block_is_skipped() {
        let mut doc = b"<< /Filter /FlateDecode >>\nstream\n\xff\xfe\xfd\xfc\nendstream\n".to_vec();
        doc.extend(flate_object(b"(kept) Tj"));

        let extraction = FallbackExtractor::default().extract(&doc).unwrap();
        assert_eq!(extraction.text, "kept");
        assert_eq!(extraction.stats.inflated_blocks, 1);
        assert!(matches!(
            extraction.warnings.as_slice(),
            [ExtractionWarning::InflateFailed { block: 0, .. }]
        ));
    }

    #[test]
    fn test_inflate_limit() {
        let content = b"(x) Tj ".repeat(200);
        let doc = flate_object(&content);
        let config = ExtractionConfig::default().with_max_inflated_size(64);

        let extraction = FallbackExtractor::new(config).extract(&doc).unwrap();
        assert!(extraction.is_empty());
        assert_eq!(
            extraction.warnings[0],
            ExtractionWarning::InflateLimitExceeded { block: 0, limit: 64 }
        );
    }

    #[test]
    fn test_input_too_large() {
        let config = ExtractionConfig::default().with_max_input_size(8);
        let result = FallbackExtractor::new(config).extract(b"%PDF-1.4 more than eight");
        assert!(matches!(result, Err(Error::InputTooLarge { size: 24, limit: 8 })));
    }

    #[test]
    fn test_contact_normalization_toggle() {
        let doc = flate_object(b"(j o h n @ e x a m p l e . c o m) Tj");

        let normalized = FallbackExtractor::default().extract(&doc).unwrap();
        assert_eq!(normalized.text, "john@example.com");

        let raw = FallbackExtractor::new(ExtractionConfig::raw()).extract(&doc).unwrap();
        assert_eq!(raw.text, "j o h n @ e x a m p l e . c o m");
    }

    #[test]
    fn test_chunk_order_indices_span_blocks() {
        let mut doc = flate_object(b"(a) Tj (bb) Tj");
        doc.extend(flate_object(b"[(cc) (dd)] TJ"));

        let chunks = FallbackExtractor::default().chunks(&doc).unwrap();
        let order: Vec<usize> = chunks.iter().map(|c| c.order_index).collect();
        assert_eq!(order, vec![0, 1, 2, 3]);
        assert_eq!(chunks[2].block, 1);
    }

    #[test]
    fn test_extract_text_convenience() {
        assert_eq!(extract_text(b"").unwrap(), "");
        assert_eq!(extract_text(b"stream\n(ok) Tj\nendstream").unwrap(), "ok");
    }
}
