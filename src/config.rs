//! Configuration for the fallback extraction pipeline.

/// Bytes preceding a `stream` marker that are searched for the filter marker.
pub const DEFAULT_FLATE_CONTEXT_WINDOW: usize = 200;

/// Default input cap: 64 MB.
pub const DEFAULT_MAX_INPUT_SIZE: usize = 64 * 1024 * 1024;

/// Default per-block inflate cap: 100 MB.
pub const DEFAULT_MAX_INFLATED_SIZE: usize = 100 * 1024 * 1024;

/// Extraction options.
///
/// # Example
///
/// ```
/// use pdf_salvage::config::ExtractionConfig;
///
/// let config = ExtractionConfig::default()
///     .with_max_input_size(8 * 1024 * 1024)
///     .with_normalize_contacts(false);
/// assert_eq!(config.flate_context_window, 200);
/// assert!(!config.normalize_contacts);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionConfig {
    /// Maximum accepted input size in bytes.
    ///
    /// Larger documents are rejected with [`crate::Error::InputTooLarge`].
    /// Set to 0 to disable the check.
    pub max_input_size: usize,

    /// Size of the window before each `stream` marker that is searched for
    /// `/Filter /FlateDecode`.
    pub flate_context_window: usize,

    /// Maximum inflated size of a single block in bytes.
    ///
    /// A block that grows past this is dropped. Set to 0 to disable the check.
    pub max_inflated_size: usize,

    /// Repair kerning spaces inside emails, URLs, phone numbers and
    /// letter-spaced capitals after merging.
    pub normalize_contacts: bool,

    /// Collapse runs of three or more short (1-3 letter) words into one token.
    pub collapse_short_word_runs: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionConfig {
    /// Create a configuration with default limits.
    pub fn new() -> Self {
        Self {
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
            flate_context_window: DEFAULT_FLATE_CONTEXT_WINDOW,
            max_inflated_size: DEFAULT_MAX_INFLATED_SIZE,
            normalize_contacts: true,
            collapse_short_word_runs: false,
        }
    }

    /// Raw mode: no post-processing beyond merging.
    ///
    /// Useful for inspecting exactly what the content streams contain.
    pub fn raw() -> Self {
        Self {
            normalize_contacts: false,
            collapse_short_word_runs: false,
            ..Self::new()
        }
    }

    /// Aggressive mode: every cleanup heuristic enabled.
    ///
    /// Warning: may glue genuinely separate short words together.
    pub fn aggressive() -> Self {
        Self {
            normalize_contacts: true,
            collapse_short_word_runs: true,
            ..Self::new()
        }
    }

    /// Set the maximum accepted input size.
    pub fn with_max_input_size(mut self, limit: usize) -> Self {
        self.max_input_size = limit;
        self
    }

    /// Set the filter marker search window.
    pub fn with_flate_context_window(mut self, window: usize) -> Self {
        self.flate_context_window = window;
        self
    }

    /// Set the per-block inflate cap.
    pub fn with_max_inflated_size(mut self, limit: usize) -> Self {
        self.max_inflated_size = limit;
        self
    }

    /// Enable contact normalization.
    pub fn with_normalize_contacts(mut self, enable: bool) -> Self {
        self.normalize_contacts = enable;
        self
    }

    /// Enable short word run collapsing.
    pub fn with_collapse_short_word_runs(mut self, enable: bool) -> Self {
        self.collapse_short_word_runs = enable;
        self
    }

    /// Check whether an input of `size` bytes is within the configured limit.
    pub(crate) fn accepts_input(&self, size: usize) -> bool {
        self.max_input_size == 0 || size <= self.max_input_size
    }
}
