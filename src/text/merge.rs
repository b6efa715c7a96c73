//! Chunk merging.
//!
//! Joins decoded show-operator strings into running text. Content streams
//! often split a word across several operators without a space glyph, and
//! ATS-style CVs frequently render one letter per operator. Without glyph
//! widths the merger relies on one rule: a chunk that is a single character
//! glues onto whatever follows it. Everything else is separated by one space.
//!
//! The rule over-merges genuinely separate one-letter words ("a I" becomes
//! "aI"). That output shape is kept as is.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Two or more horizontal whitespace characters
    static ref RE_HSPACE_RUN: Regex = Regex::new(r"[ \t]{2,}").unwrap();

    /// Three or more consecutive newlines
    static ref RE_MULTI_NEWLINE: Regex = Regex::new(r"\n{3,}").unwrap();

    /// Three or more 1-3 letter words separated by whitespace
    static ref RE_SHORT_WORD_RUN: Regex =
        Regex::new(r"(?:(?:\b[A-Za-z]{1,3}\b\s+){2,}\b[A-Za-z]{1,3}\b)").unwrap();
}

/// Merges ordered text chunks into continuous text.
#[derive(Debug, Clone, Default)]
pub struct ChunkMerger {
    collapse_short_word_runs: bool,
}

impl ChunkMerger {
    /// Create a merger with only the core joining rules.
    pub fn new() -> Self {
        Self {
            collapse_short_word_runs: false,
        }
    }

    /// Also collapse runs of short words after whitespace normalization.
    pub fn with_collapse_short_word_runs(mut self, enable: bool) -> Self {
        self.collapse_short_word_runs = enable;
        self
    }

    /// Merge chunks in the order given.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_salvage::text::ChunkMerger;
    ///
    /// let merger = ChunkMerger::new();
    /// assert_eq!(merger.merge(["J", "ohn", "Doe"]), "John Doe");
    /// ```
    pub fn merge<I, S>(&self, chunks: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        // Last emitted chunk; after a glue this is the whole glued entry
        let mut prev = String::new();

        for chunk in chunks {
            let current = chunk.as_ref().trim();
            if current.is_empty() {
                continue;
            }

            if prev.chars().count() == 1 {
                // A lone glyph continues into the next chunk, whatever its length
                if let Some(last) = out.last_mut() {
                    last.push_str(current);
                    prev = last.clone();
                    continue;
                }
            }

            let needs_space = !prev.is_empty()
                && !prev.ends_with([' ', '\n'])
                && !current.starts_with(['\n', ' ']);

            if needs_space {
                out.push(format!(" {}", current));
            } else {
                out.push(current.to_string());
            }
            prev = current.to_string();
        }

        let text = out.concat();
        let text = normalize_spacing(&text);

        if self.collapse_short_word_runs {
            collapse_short_word_runs(&text)
        } else {
            text
        }
    }
}

/// Merge chunks with the default merger.
pub fn merge_chunks<I, S>(chunks: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ChunkMerger::new().merge(chunks)
}

/// Collapse horizontal whitespace runs to one space and 3+ newlines to a
/// paragraph break.
pub fn normalize_spacing(text: &str) -> String {
    let text = RE_HSPACE_RUN.replace_all(text, " ");
    RE_MULTI_NEWLINE.replace_all(&text, "\n\n").into_owned()
}

/// Concatenate runs of three or more 1-3 letter words.
///
/// Recovers letter-spaced headings such as `S K I L L S`, at the cost of
/// gluing genuine short-word phrases (`I am a dev`).
pub fn collapse_short_word_runs(text: &str) -> String {
    RE_SHORT_WORD_RUN
        .replace_all(text, |caps: &regex::Captures<'_>| caps[0].replace(' ', ""))
        .into_owned()
}
