//! Text-showing operator scanner.
//!
//! Finds `(string) Tj` and `[(a) -120 (b)] TJ` in decoded content without
//! building a full operator list. The scan is a single left-to-right pass, so
//! literals come out in the exact order they appear in the block, and the
//! bytes of a matched operator are consumed once.
//!
//! Anything that does not form a complete show operator is skipped: a literal
//! not followed by `Tj`, an array not followed by `TJ`, an unterminated string.

use crate::content::literal::{unescape_literal, LiteralIndex};
use crate::decoders::DecodedBlock;
use nom::bytes::complete::{tag, take_while};
use nom::IResult;

/// The text-showing operators recognised by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowOperator {
    /// Show a single string (Tj)
    Tj,
    /// Show an array of strings and kerning adjustments (TJ)
    TJ,
}

impl ShowOperator {
    /// The operator keyword as it appears in content streams.
    pub fn keyword(&self) -> &'static [u8] {
        match self {
            ShowOperator::Tj => b"Tj",
            ShowOperator::TJ => b"TJ",
        }
    }
}

/// A raw literal shown by a text operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShownLiteral<'a> {
    /// Operator that showed the literal
    pub operator: ShowOperator,
    /// Byte offset of the literal content within the scanned data
    pub offset: usize,
    /// Literal content with escapes still in place
    pub raw: &'a [u8],
}

/// One decoded string from a show operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// Unescaped text
    pub content: String,
    /// Position in the document-wide scan order
    pub order_index: usize,
    /// Index of the block the chunk came from
    pub block: usize,
    /// Operator that produced the chunk
    pub operator: ShowOperator,
}

/// PDF whitespace: space, tab, CR, LF, NUL, form feed.
fn is_pdf_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\r' | b'\n' | 0x00 | 0x0C)
}

fn is_delimiter(c: u8) -> bool {
    matches!(c, b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%')
}

/// Match an operator keyword after optional whitespace.
///
/// The keyword must end at whitespace, a delimiter, or the end of input, so
/// `Tjx` is not taken for `Tj`.
fn show_operator(input: &[u8], op: ShowOperator) -> IResult<&[u8], ShowOperator> {
    let (input, _) = take_while(is_pdf_whitespace)(input)?;
    let (rest, _) = tag(op.keyword())(input)?;

    match rest.first() {
        Some(&c) if !is_pdf_whitespace(c) && !is_delimiter(c) => {
            Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Tag)))
        },
        _ => Ok((rest, op)),
    }
}

/// Scan the `[...]` operand opening at `start` and collect its literals.
///
/// Numbers, hex strings and other bytes between the literals are skipped.
/// Returns the position after the closing bracket and the literals with their
/// content offsets. Nested arrays, unterminated literals and a missing `]`
/// make the whole operand fail.
fn text_array<'a>(
    data: &'a [u8],
    start: usize,
    literals: &LiteralIndex,
) -> Option<(usize, Vec<(usize, &'a [u8])>)> {
    let mut pos = start + 1;
    let mut items = Vec::new();

    while let Some(&c) = data.get(pos) {
        match c {
            b']' => return Some((pos + 1, items)),
            b'(' => {
                let (raw, end) = literals.literal_at(data, pos)?;
                items.push((pos + 1, raw));
                pos = end;
            },
            b'[' => return None,
            _ => pos += 1,
        }
    }

    None
}

/// Find every literal shown by `Tj` or `TJ`, in left-to-right order.
///
/// Parentheses are paired once up front with a [`LiteralIndex`], so the scan
/// stays linear even on runs of unbalanced `(`.
///
/// # Examples
///
/// ```
/// use pdf_salvage::content::{scan_show_literals, ShowOperator};
///
/// let found = scan_show_literals(b"BT (Hi) Tj [(a) -120 (b)] TJ ET");
/// let raw: Vec<&[u8]> = found.iter().map(|l| l.raw).collect();
/// assert_eq!(raw, vec![&b"Hi"[..], &b"a"[..], &b"b"[..]]);
/// assert_eq!(found[1].operator, ShowOperator::TJ);
/// ```
pub fn scan_show_literals(data: &[u8]) -> Vec<ShownLiteral<'_>> {
    let literals = LiteralIndex::new(data);
    let mut found = Vec::new();
    let mut pos = 0;

    while pos < data.len() {
        match data[pos] {
            b'(' => match literals.literal_at(data, pos) {
                Some((raw, literal_end)) => match show_operator(&data[literal_end..], ShowOperator::Tj) {
                    Ok((after, operator)) => {
                        found.push(ShownLiteral {
                            operator,
                            offset: pos + 1,
                            raw,
                        });
                        pos = data.len() - after.len();
                    },
                    // An operand of some other operator; its bytes are string content
                    Err(_) => pos = literal_end,
                },
                None => pos += 1,
            },
            b'[' => match text_array(data, pos, &literals) {
                Some((array_end, items)) => match show_operator(&data[array_end..], ShowOperator::TJ) {
                    Ok((after, operator)) => {
                        found.extend(items.into_iter().map(|(offset, raw)| ShownLiteral {
                            operator,
                            offset,
                            raw,
                        }));
                        pos = data.len() - after.len();
                    },
                    Err(_) => pos += 1,
                },
                None => pos += 1,
            },
            // Comment runs to end of line
            b'%' => {
                while pos < data.len() && data[pos] != b'\r' && data[pos] != b'\n' {
                    pos += 1;
                }
            },
            _ => pos += 1,
        }
    }

    found
}

/// Scan a decoded block into text chunks.
///
/// Chunks are numbered from `first_index` upwards in scan order.
pub fn scan_text_chunks(block: &DecodedBlock<'_>, first_index: usize) -> Vec<TextChunk> {
    scan_show_literals(&block.bytes)
        .into_iter()
        .enumerate()
        .map(|(i, literal)| TextChunk {
            content: unescape_literal(literal.raw),
            order_index: first_index + i,
            block: block.index,
            operator: literal.operator,
        })
        .collect()
}
