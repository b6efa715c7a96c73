//! PDF literal strings.
//!
//! Literal strings are enclosed in `(` and `)` (ISO 32000-1:2008, 7.3.4.2).
//! They can contain balanced nested parentheses and backslash escapes.
//! Scanning and unescaping are kept separate: the scanner returns raw bytes
//! and [`unescape_literal`] turns them into text.

use std::collections::VecDeque;

/// Literals longer than this are treated as unterminated.
pub const MAX_LITERAL_LEN: usize = 32 * 1024;

/// Matching parentheses of a buffer, found in one pass.
///
/// Every `(` that closes within [`MAX_LITERAL_LEN`] bytes is paired with its
/// `)`. Nesting is balanced, and a backslash hides the byte after it, so
/// `(a\)b)` is a single literal. A `(` without an entry is unterminated, as
/// is a `(` that is itself escaped.
///
/// Building the index is linear in the buffer length. Lookups are a binary
/// search, so a scan over the buffer never re-reads bytes looking for a close.
///
/// # Examples
///
/// ```
/// use pdf_salvage::content::LiteralIndex;
///
/// let data = b"(a (b) c) Tj (open";
/// let index = LiteralIndex::new(data);
/// assert_eq!(index.literal_at(data, 0), Some((&b"a (b) c"[..], 9)));
/// assert_eq!(index.close_of(3), Some(5));
/// assert_eq!(index.close_of(13), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LiteralIndex {
    // (open, close), sorted by open
    pairs: Vec<(usize, usize)>,
}

impl LiteralIndex {
    /// Pair up the parentheses of `data`.
    pub fn new(data: &[u8]) -> Self {
        let mut pairs = Vec::new();
        let mut open: VecDeque<usize> = VecDeque::new();
        let mut pos = 0;

        while pos < data.len() {
            match data[pos] {
                b'\\' => {
                    pos += 2;
                    continue;
                },
                b'(' => open.push_back(pos),
                b')' => {
                    if let Some(start) = open.pop_back() {
                        if pos - start - 1 < MAX_LITERAL_LEN {
                            pairs.push((start, pos));
                        }
                    }
                },
                _ => {},
            }

            // Opens this far back can no longer close within the cap
            while let Some(&start) = open.front() {
                if pos - start < MAX_LITERAL_LEN {
                    break;
                }
                open.pop_front();
            }
            pos += 1;
        }

        pairs.sort_unstable();
        Self { pairs }
    }

    /// Position of the `)` closing the `(` at `open`.
    pub fn close_of(&self, open: usize) -> Option<usize> {
        self.pairs
            .binary_search_by_key(&open, |&(start, _)| start)
            .ok()
            .map(|i| self.pairs[i].1)
    }

    /// The raw content of the literal opening at `open`, and the position
    /// just past its closing parenthesis.
    ///
    /// `data` must be the buffer the index was built from.
    pub fn literal_at<'a>(&self, data: &'a [u8], open: usize) -> Option<(&'a [u8], usize)> {
        let close = self.close_of(open)?;
        Some((&data[open + 1..close], close + 1))
    }
}

/// Decode the escape sequences of a raw literal string into bytes.
///
/// Escapes, applied left to right:
/// - `\n` `\r` `\t` `\b` `\f` → the control character
/// - `\(` `\)` `\\` → the character itself
/// - `\ddd` (1-3 octal digits) → the byte with that value (wrapping past 0o377)
/// - any other `\X` → `X` (the backslash is dropped)
///
/// A lone backslash at the end of input is dropped.
///
/// # Examples
///
/// ```
/// use pdf_salvage::content::decode_literal_escapes;
///
/// assert_eq!(decode_literal_escapes(b"Section \\247 2"), b"Section \xa7 2");
/// assert_eq!(decode_literal_escapes(b"\\(a\\)"), b"(a)");
/// ```
pub fn decode_literal_escapes(raw: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        let byte = raw[i];
        if byte != b'\\' {
            result.push(byte);
            i += 1;
            continue;
        }

        let Some(&next) = raw.get(i + 1) else {
            break;
        };

        match next {
            b'n' => result.push(b'\n'),
            b'r' => result.push(b'\r'),
            b't' => result.push(b'\t'),
            b'b' => result.push(0x08),
            b'f' => result.push(0x0C),
            b'0'..=b'7' => {
                let mut value = 0u32;
                let mut len = 0;
                while len < 3 {
                    match raw.get(i + 1 + len) {
                        Some(&digit) if (b'0'..=b'7').contains(&digit) => {
                            value = value * 8 + u32::from(digit - b'0');
                            len += 1;
                        },
                        _ => break,
                    }
                }
                result.push((value & 0xFF) as u8);
                i += 1 + len;
                continue;
            },
            // \( \) \\ and unknown escapes all yield the escaped byte
            other => result.push(other),
        }
        i += 2;
    }

    result
}

/// Unescape a raw literal string and decode it as UTF-8.
///
/// Invalid UTF-8 is replaced with U+FFFD; this never fails.
pub fn unescape_literal(raw: &[u8]) -> String {
    String::from_utf8_lossy(&decode_literal_escapes(raw)).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(data: &[u8]) -> Option<(&[u8], &[u8])> {
        let (raw, end) = LiteralIndex::new(data).literal_at(data, 0)?;
        Some((raw, &data[end..]))
    }

    #[test]
    fn test_index_simple_literal() {
        let (raw, rest) = literal(b"(Hello) Tj").unwrap();
        assert_eq!(raw, b"Hello");
        assert_eq!(rest, b" Tj");
    }

    #[test]
    fn test_index_nested_parentheses() {
        let (raw, rest) = literal(b"(a (b) c)x").unwrap();
        assert_eq!(raw, b"a (b) c");
        assert_eq!(rest, b"x");
    }

    #[test]
    fn test_index_escaped_parentheses() {
        let (raw, rest) = literal(b"(a\\)b\\(c)").unwrap();
        assert_eq!(raw, b"a\\)b\\(c");
        assert!(rest.is_empty());
    }

    #[test]
    fn test_index_escaped_backslash_before_close() {
        let (raw, _) = literal(b"(dir\\\\)rest").unwrap();
        assert_eq!(raw, b"dir\\\\");
    }

    #[test]
    fn test_index_empty_literal() {
        let (raw, rest) = literal(b"()Tj").unwrap();
        assert!(raw.is_empty());
        assert_eq!(rest, b"Tj");
    }

    #[test]
    fn test_index_unterminated() {
        assert!(literal(b"(never closed").is_none());
        assert!(literal(b"no paren").is_none());

        let data = b"(a (b)";
        let index = LiteralIndex::new(data);
        assert_eq!(index.close_of(0), None);
        assert_eq!(index.close_of(3), Some(5));
    }

    #[test]
    fn test_index_escaped_open_is_not_a_literal() {
        let data = b"\\(a) (b)";
        let index = LiteralIndex::new(data);
        assert_eq!(index.close_of(1), None);
        assert_eq!(index.close_of(5), Some(7));
    }

    #[test]
    fn test_index_length_cap() {
        let mut data = vec![b'('];
        data.extend(std::iter::repeat(b'a').take(MAX_LITERAL_LEN + 10));
        data.push(b')');
        assert!(literal(&data).is_none());

        let mut data = vec![b'('];
        data.extend(std::iter::repeat(b'a').take(MAX_LITERAL_LEN - 1));
        data.push(b')');
        assert_eq!(literal(&data).unwrap().0.len(), MAX_LITERAL_LEN - 1);
    }

    #[test]
    fn test_index_long_run_of_opens() {
        let mut data = vec![b'('; 1 << 20];
        data.extend_from_slice(b"x)");

        let index = LiteralIndex::new(&data);
        let last = data.len() - 3;
        assert_eq!(index.close_of(last), Some(data.len() - 1));
        assert_eq!(index.close_of(0), None);
    }

    #[test]
    fn test_unescape_standard_escapes() {
        assert_eq!(unescape_literal(b"\\(\\)\\\\\\n\\101"), "()\\\nA");
        assert_eq!(unescape_literal(b"a\\tb\\rc"), "a\tb\rc");
        assert_eq!(decode_literal_escapes(b"\\b\\f"), vec![0x08, 0x0C]);
    }

    #[test]
    fn test_unescape_octal_lengths() {
        assert_eq!(decode_literal_escapes(b"\\0"), vec![0]);
        assert_eq!(decode_literal_escapes(b"\\53"), vec![b'+']);
        assert_eq!(decode_literal_escapes(b"\\1011"), vec![b'A', b'1']);
        assert_eq!(decode_literal_escapes(b"\\8"), vec![b'8']);
    }

    #[test]
    fn test_unescape_octal_overflow_wraps() {
        // 0o777 = 511 -> low byte 0xFF
        assert_eq!(decode_literal_escapes(b"\\777"), vec![0xFF]);
    }

    #[test]
    fn test_unescape_unknown_escape_drops_backslash() {
        assert_eq!(unescape_literal(b"\\q\\z"), "qz");
        assert_eq!(unescape_literal(b"a\\\nb"), "a\nb");
    }

    #[test]
    fn test_unescape_trailing_backslash() {
        assert_eq!(unescape_literal(b"abc\\"), "abc");
    }

    #[test]
    fn test_unescape_invalid_utf8_is_lossy() {
        assert_eq!(unescape_literal(b"caf\\351"), "caf\u{FFFD}");
        assert_eq!(unescape_literal("café".as_bytes()), "café");
    }

    #[test]
    fn test_unescape_passthrough() {
        assert_eq!(unescape_literal(b"plain text"), "plain text");
        assert_eq!(unescape_literal(b""), "");
    }
}
