//! Content stream text recovery.
//!
//! Locates text-showing operators in decoded content and decodes the literal
//! strings they show. No graphics state is tracked: positions, fonts and
//! kerning amounts are ignored.

pub mod literal;
pub mod scanner;

pub use literal::{decode_literal_escapes, unescape_literal, LiteralIndex, MAX_LITERAL_LEN};
pub use scanner::{scan_show_literals, scan_text_chunks, ShowOperator, ShownLiteral, TextChunk};
