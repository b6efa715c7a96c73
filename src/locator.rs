//! Stream block location.
//!
//! Scans the raw document bytes for `stream ... endstream` blocks without
//! parsing the object graph. Each block is classified as FlateDecode or not by
//! looking for the filter marker in a fixed-size window that precedes the
//! `stream` keyword.
//!
//! The match is non-greedy, so a block ends at the first `endstream` after its
//! `stream` keyword. A `stream` that is never closed yields no block.

use crate::config::DEFAULT_FLATE_CONTEXT_WINDOW;
use lazy_static::lazy_static;
use regex::bytes::Regex;

lazy_static! {
    /// `stream`, one optional EOL, then everything up to the next `endstream`.
    static ref RE_STREAM_BLOCK: Regex =
        Regex::new(r"(?s-u)stream[ \t]*(?:\r\n|\r|\n)?(.*?)endstream").unwrap();

    /// `/Filter /FlateDecode` or `/Filter [/FlateDecode ...`
    static ref RE_FLATE_FILTER: Regex =
        Regex::new(r"(?-u)/Filter\s*\[?\s*/FlateDecode").unwrap();
}

/// A located `stream ... endstream` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamBlock<'a> {
    /// Zero-based position of this block in document order
    pub index: usize,
    /// Byte offset of the `stream` keyword
    pub offset: usize,
    /// Bytes between the keyword line and `endstream`
    pub raw_bytes: &'a [u8],
    /// Whether the preceding window names the FlateDecode filter
    pub is_flate: bool,
    /// Up to `window` bytes immediately preceding the `stream` keyword
    pub context_window: &'a [u8],
}

/// Lazy iterator over the stream blocks of a document.
///
/// A clone continues from the same position. Call [`locate_streams`] again to
/// start over from the beginning.
#[derive(Debug, Clone)]
pub struct StreamBlocks<'a> {
    doc: &'a [u8],
    window: usize,
    pos: usize,
    next_index: usize,
}

impl<'a> Iterator for StreamBlocks<'a> {
    type Item = StreamBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.doc.len() {
            return None;
        }

        let caps = RE_STREAM_BLOCK.captures_at(self.doc, self.pos)?;
        let whole = caps.get(0)?;
        let body = caps.get(1)?;

        self.pos = whole.end();

        let start = whole.start();
        let context_window = &self.doc[start.saturating_sub(self.window)..start];
        let is_flate = RE_FLATE_FILTER.is_match(context_window);

        let block = StreamBlock {
            index: self.next_index,
            offset: start,
            raw_bytes: body.as_bytes(),
            is_flate,
            context_window,
        };
        self.next_index += 1;

        log::debug!(
            "Located stream block {} at byte {} ({} bytes, flate={})",
            block.index,
            block.offset,
            block.raw_bytes.len(),
            block.is_flate
        );

        Some(block)
    }
}

/// Locate stream blocks using the given filter marker window.
pub fn locate_streams(doc: &[u8], window: usize) -> StreamBlocks<'_> {
    StreamBlocks {
        doc,
        window,
        pos: 0,
        next_index: 0,
    }
}

/// Locate stream blocks using the default 200-byte filter marker window.
pub fn locate_streams_default(doc: &[u8]) -> StreamBlocks<'_> {
    locate_streams(doc, DEFAULT_FLATE_CONTEXT_WINDOW)
}
