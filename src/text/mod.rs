//! Text post-processing.
//!
//! Turns the ordered chunk sequence into readable text:
//! - [`merge`]: chunk joining and whitespace normalization
//! - [`contacts`]: kerning repair inside emails, URLs and phone numbers

pub mod contacts;
pub mod merge;

pub use contacts::normalize_contacts;
pub use merge::{collapse_short_word_runs, merge_chunks, normalize_spacing, ChunkMerger};
