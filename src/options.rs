//! Extraction options and configuration.

/// Options controlling outline extraction.
///
/// The defaults reproduce the tuned heuristics; most callers only touch the
/// switches (`use_bookmarks`, `parallel`, `error_mode`).
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineOptions {
    /// Error handling mode for per-page text extraction
    pub error_mode: ErrorMode,

    /// Whether to use parallel processing for per-page line reconstruction
    pub parallel: bool,

    /// Emit the document's native bookmarks when it has usable ones
    pub use_bookmarks: bool,

    /// Fraction of page height excluded at the top (running headers)
    pub margin_top: f32,

    /// Fraction of page height below which text is excluded (footers)
    pub margin_bottom: f32,

    /// Vertical quantization step, in points, used to merge spans into lines
    pub line_bucket: f32,

    /// Fraction of the first page searched for a title
    pub title_region: f32,

    /// Shortest heading text, in characters
    pub min_heading_chars: usize,

    /// Longest heading text, in characters
    pub max_heading_chars: usize,

    /// Styles averaging more words per line than this cannot be body text
    pub body_max_avg_words: f64,

    /// Styles averaging more words per line than this cannot be headings
    pub heading_max_avg_words: f64,

    /// Largest heading size must be at least this multiple of the body size
    pub min_heading_ratio: f64,
}

impl OutlineOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip pages whose text cannot be extracted).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Enable or disable the native bookmark fast path.
    pub fn with_bookmarks(mut self, use_bookmarks: bool) -> Self {
        self.use_bookmarks = use_bookmarks;
        self
    }

    /// Set the header and footer margins as fractions of page height.
    pub fn with_margins(mut self, top: f32, bottom: f32) -> Self {
        self.margin_top = top;
        self.margin_bottom = bottom;
        self
    }

    /// Set the accepted heading length range, in characters.
    pub fn with_heading_chars(mut self, min: usize, max: usize) -> Self {
        self.min_heading_chars = min;
        self.max_heading_chars = max;
        self
    }

    /// Set the minimum ratio between the largest heading and body size.
    pub fn with_min_heading_ratio(mut self, ratio: f64) -> Self {
        self.min_heading_ratio = ratio;
        self
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            parallel: true,
            use_bookmarks: true,
            margin_top: 0.08,
            margin_bottom: 0.92,
            line_bucket: 5.0,
            title_region: 0.5,
            min_heading_chars: 3,
            max_heading_chars: 300,
            body_max_avg_words: 20.0,
            heading_max_avg_words: 15.0,
            min_heading_ratio: 1.15,
        }
    }
}

/// Error handling mode during text extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    #[default]
    Strict,
    /// Treat pages whose text cannot be read as empty and continue
    Lenient,
}
