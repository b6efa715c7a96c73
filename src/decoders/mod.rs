//! Stream decoding for located blocks.
//!
//! Only FlateDecode is recognised by the fallback engine. Blocks that are not
//! flagged as compressed pass through untouched, since some producers write
//! content streams uncompressed.

use crate::error::Result;
use crate::locator::StreamBlock;
use std::borrow::Cow;

mod flate;

pub use flate::FlateDecoder;

/// Trait for PDF stream decoders.
///
/// Each decoder implements a specific PDF filter algorithm and can decode
/// compressed or encoded stream data.
pub trait StreamDecoder {
    /// Decode the input data.
    fn decode(&self, input: &[u8]) -> Result<Vec<u8>>;

    /// Get the name of this decoder (e.g., "FlateDecode").
    fn name(&self) -> &str;
}

/// The content bytes of a block, ready for operator scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBlock<'a> {
    /// Index of the source block in document order
    pub index: usize,
    /// Inflated bytes, or the raw block bytes when the block was not compressed
    pub bytes: Cow<'a, [u8]>,
}

impl<'a> DecodedBlock<'a> {
    /// Whether the block has no content.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Decode a located block.
///
/// Uncompressed blocks borrow their raw bytes. Compressed blocks are inflated
/// with a cap of `max_inflated_size` bytes (0 = no cap).
///
/// # Errors
///
/// Returns an error when every inflate attempt fails or the cap is exceeded.
/// The pipeline turns this into a warning and skips the block.
pub fn decode_block<'a>(block: &StreamBlock<'a>, max_inflated_size: usize) -> Result<DecodedBlock<'a>> {
    if !block.is_flate {
        return Ok(DecodedBlock {
            index: block.index,
            bytes: Cow::Borrowed(block.raw_bytes),
        });
    }

    let decoder = FlateDecoder::with_limit(max_inflated_size);
    let inflated = decoder.decode(block.raw_bytes)?;

    log::debug!(
        "{} block {}: {} -> {} bytes",
        decoder.name(),
        block.index,
        block.raw_bytes.len(),
        inflated.len()
    );

    Ok(DecodedBlock {
        index: block.index,
        bytes: Cow::Owned(inflated),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn block(raw: &[u8], is_flate: bool) -> StreamBlock<'_> {
        StreamBlock {
            index: 7,
            offset: 0,
            raw_bytes: raw,
            is_flate,
            context_window: &[],
        }
    }

    #[test]
    fn test_uncompressed_block_passes_through() {
        let raw = b"BT (Plain) Tj ET";
        let decoded = decode_block(&block(raw, false), 0).unwrap();
        assert_eq!(decoded.index, 7);
        assert!(matches!(decoded.bytes, Cow::Borrowed(_)));
        assert_eq!(&decoded.bytes[..], raw);
    }

    #[test]
    fn test_flate_block_is_inflated() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"(Inflated) Tj").unwrap();
        let compressed = encoder.finish().unwrap();

        let decoded = decode_block(&block(&compressed, true), 0).unwrap();
        assert_eq!(&decoded.bytes[..], b"(Inflated) Tj");
    }

    #[test]
    fn test_flate_block_failure() {
        let result = decode_block(&block(b"\xff\xff\xff\xff", true), 0);
        assert!(matches!(result, Err(Error::Decode(_))));
    }
}
