//! FlateDecode (zlib/deflate) implementation.
//!
//! Content streams in text PDFs are almost always FlateDecode-compressed.
//! Decoding tries a zlib-wrapped inflate first and falls back to raw deflate
//! for producers that omit the zlib header and trailer.

use crate::decoders::StreamDecoder;
use crate::error::{Error, Result};
use flate2::read::{DeflateDecoder, ZlibDecoder};
use std::io::Read;

/// FlateDecode filter implementation.
///
/// Decompresses data using the zlib/deflate algorithm, bounded by an optional
/// output cap.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlateDecoder {
    limit: usize,
}

impl FlateDecoder {
    /// Create a decoder without an output cap.
    pub fn new() -> Self {
        Self { limit: 0 }
    }

    /// Create a decoder that rejects output larger than `limit` bytes (0 = no cap).
    pub fn with_limit(limit: usize) -> Self {
        Self { limit }
    }

    /// Read the decoder to its end, stopping one byte past the cap.
    fn read_bounded<R: Read>(&self, reader: R, output: &mut Vec<u8>) -> std::io::Result<usize> {
        if self.limit == 0 {
            let mut reader = reader;
            reader.read_to_end(output)
        } else {
            reader.take(self.limit as u64 + 1).read_to_end(output)
        }
    }

    fn check_limit(&self, output: Vec<u8>) -> Result<Vec<u8>> {
        if self.limit > 0 && output.len() > self.limit {
            return Err(Error::InflateLimitExceeded(self.limit));
        }
        Ok(output)
    }
}

impl StreamDecoder for FlateDecoder {
    fn decode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();

        // Strategy 1: standard zlib
        let zlib_err = match self.read_bounded(ZlibDecoder::new(input), &mut output) {
            Ok(_) => return self.check_limit(output),
            Err(e) => e,
        };

        // Partial recovery: data decoded before the corruption is still text
        if !output.is_empty() {
            log::warn!(
                "FlateDecode partial recovery: extracted {} bytes before corruption: {}",
                output.len(),
                zlib_err
            );
            return self.check_limit(output);
        }

        // Strategy 2: raw deflate (no zlib wrapper)
        log::info!("Zlib decode failed ({}), trying raw deflate", zlib_err);
        output.clear();
        match self.read_bounded(DeflateDecoder::new(input), &mut output) {
            Ok(_) => {
                log::info!("Raw deflate recovery succeeded: {} bytes", output.len());
                self.check_limit(output)
            },
            Err(deflate_err) => Err(Error::Decode(format!(
                "FlateDecode failed: zlib error: {}, raw deflate error: {}, compressed size: {} bytes",
                zlib_err,
                deflate_err,
                input.len()
            ))),
        }
    }

    fn name(&self) -> &str {
        "FlateDecode"
    }
}
