//! Configuration types for caption-to-PDF conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The defaults reproduce the classic
//! output: 500-character paragraphs, 80-column body text, a 55-column bold
//! title, US Letter pages with one-inch margins and 14 pt line spacing.

use crate::error::Vtt2PdfError;
use crate::pipeline::fetch::CaptionFetcher;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Host serving both the embedded player and the caption tracks.
pub const DEFAULT_CAPTION_HOST: &str = "fast.wistia.net";

/// Caption language requested from the host.
pub const DEFAULT_LANGUAGE: &str = "eng";

/// Configuration for a caption-to-PDF conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use vtt2pdf::{ConversionConfig, PageSize};
///
/// let config = ConversionConfig::builder()
///     .max_paragraph_len(400)
///     .page_size(PageSize::A4)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_paragraph_len, 400);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Upper bound on paragraph length in characters. Default: 500.
    ///
    /// Sentences are never split, so a single sentence longer than this
    /// still becomes its own paragraph.
    pub max_paragraph_len: usize,

    /// Page geometry and wrap widths used by the layout engine.
    pub layout: LayoutGeometry,

    /// Host of the embedded player and caption endpoint. Default: `fast.wistia.net`.
    pub caption_host: String,

    /// Caption language code. Default: `eng`.
    pub language: String,

    /// Caption request timeout in seconds. Default: None (reqwest default).
    pub request_timeout_secs: Option<u64>,

    /// Maximum characters kept from the page title for the output file name. Default: 50.
    pub max_filename_len: usize,

    /// Pre-constructed caption fetcher. Takes precedence over the HTTP fetcher
    /// built from `caption_host` / `language`.
    pub fetcher: Option<Arc<dyn CaptionFetcher>>,

    /// Per-file progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            max_paragraph_len: 500,
            layout: LayoutGeometry::default(),
            caption_host: DEFAULT_CAPTION_HOST.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            request_timeout_secs: None,
            max_filename_len: 50,
            fetcher: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("max_paragraph_len", &self.max_paragraph_len)
            .field("layout", &self.layout)
            .field("caption_host", &self.caption_host)
            .field("language", &self.language)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_filename_len", &self.max_filename_len)
            .field("fetcher", &self.fetcher.as_ref().map(|_| "<dyn CaptionFetcher>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn max_paragraph_len(mut self, n: usize) -> Self {
        self.config.max_paragraph_len = n.max(1);
        self
    }

    pub fn body_wrap_width(mut self, cols: usize) -> Self {
        self.config.layout.body_wrap_width = cols;
        self
    }

    pub fn title_wrap_width(mut self, cols: usize) -> Self {
        self.config.layout.title_wrap_width = cols;
        self
    }

    /// Switch paper size, keeping margins, spacing and wrap widths.
    pub fn page_size(mut self, size: PageSize) -> Self {
        let (w, h) = size.dimensions();
        self.config.layout.page_width = w;
        self.config.layout.page_height = h;
        self
    }

    pub fn margin(mut self, pt: f32) -> Self {
        self.config.layout.margin = pt;
        self
    }

    pub fn line_height(mut self, pt: f32) -> Self {
        self.config.layout.line_height = pt;
        self
    }

    pub fn caption_host(mut self, host: impl Into<String>) -> Self {
        self.config.caption_host = host.into();
        self
    }

    pub fn language(mut self, lang: impl Into<String>) -> Self {
        self.config.language = lang.into();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    pub fn max_filename_len(mut self, n: usize) -> Self {
        self.config.max_filename_len = n;
        self
    }

    pub fn fetcher(mut self, fetcher: Arc<dyn CaptionFetcher>) -> Self {
        self.config.fetcher = Some(fetcher);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Vtt2PdfError> {
        let c = &self.config;
        let g = &c.layout;
        if g.body_wrap_width == 0 || g.title_wrap_width == 0 {
            return Err(Vtt2PdfError::InvalidConfig(
                "Wrap widths must be ≥ 1 column".into(),
            ));
        }
        if g.line_height <= 0.0 {
            return Err(Vtt2PdfError::InvalidConfig(format!(
                "Line height must be positive, got {}",
                g.line_height
            )));
        }
        if g.margin < 0.0 || g.margin * 2.0 >= g.page_height || g.margin * 2.0 >= g.page_width {
            return Err(Vtt2PdfError::InvalidConfig(format!(
                "Margin {} does not fit a {}×{} page",
                g.margin, g.page_width, g.page_height
            )));
        }
        if g.title_top() < g.margin {
            return Err(Vtt2PdfError::InvalidConfig(format!(
                "A {}pt page has no room for the title below a {}pt margin and {}pt offset",
                g.page_height, g.margin, g.title_offset
            )));
        }
        if c.caption_host.trim().is_empty() {
            return Err(Vtt2PdfError::InvalidConfig(
                "Caption host must not be empty".into(),
            ));
        }
        if c.max_filename_len == 0 {
            return Err(Vtt2PdfError::InvalidConfig(
                "File name length must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Page geometry ────────────────────────────────────────────────────────

/// Paper sizes, in PDF points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PageSize {
    /// US Letter, 612 × 792. (default)
    #[default]
    Letter,
    /// ISO A4, 595 × 842.
    A4,
    /// Arbitrary width × height.
    Custom(f32, f32),
}

impl PageSize {
    /// `(width, height)` in points.
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            PageSize::Letter => (612.0, 792.0),
            PageSize::A4 => (595.0, 842.0),
            PageSize::Custom(w, h) => (w, h),
        }
    }
}

/// Everything the layout engine needs to place lines on a page.
///
/// Coordinates follow PDF conventions: the origin is the bottom-left corner
/// and `y` grows upwards, so the cursor moves *down* by decreasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutGeometry {
    pub page_width: f32,
    pub page_height: f32,
    /// Left, top and bottom margin.
    pub margin: f32,
    /// Vertical advance per line, shared by title and body.
    pub line_height: f32,
    /// Extra drop below the top margin before the first title line.
    pub title_offset: f32,
    pub title_font_size: f32,
    pub body_font_size: f32,
    /// Title wrap width in columns.
    pub title_wrap_width: usize,
    /// Body wrap width in columns.
    pub body_wrap_width: usize,
}

impl Default for LayoutGeometry {
    fn default() -> Self {
        let (page_width, page_height) = PageSize::Letter.dimensions();
        Self {
            page_width,
            page_height,
            margin: 72.0,
            line_height: 14.0,
            title_offset: 40.0,
            title_font_size: 16.0,
            body_font_size: 12.0,
            title_wrap_width: 55,
            body_wrap_width: 80,
        }
    }
}

impl LayoutGeometry {
    /// Cursor height where the first title line is drawn.
    pub fn title_top(&self) -> f32 {
        self.page_height - self.margin - self.title_offset
    }

    /// Cursor height right after a page break.
    pub fn page_top(&self) -> f32 {
        self.page_height - self.margin
    }

    /// Body lines that fit on the first page below a title of `title_lines` lines.
    pub fn first_page_capacity(&self, title_lines: usize) -> usize {
        let after_title = self.title_top() - (title_lines as f32 + 1.0) * self.line_height;
        let room = after_title - self.margin;
        if room < self.line_height {
            0
        } else {
            (room / self.line_height).floor() as usize
        }
    }

    /// Body lines that fit on every page after the first.
    pub fn page_capacity(&self) -> usize {
        let room = self.page_top() - self.margin;
        if room < 0.0 {
            0
        } else {
            (room / self.line_height).floor() as usize + 1
        }
    }
}
