//! Configuration types for decklist-to-DOCX builds.
//!
//! All build behaviour is controlled through [`BuildConfig`], built via its
//! [`BuildConfigBuilder`]. Every knob lives in one struct so a run can be
//! logged and two runs can be diffed to see why their sheets differ.

use crate::error::DeckError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default search endpoint for the artwork lookup.
pub const DEFAULT_SEARCH_URL: &str = "https://www.deviantart.com/search";

/// Default text prepended to every card name in the search query.
pub const DEFAULT_QUERY_PREFIX: &str = "rush duel";

/// Browser-like identification sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

/// Section headers skipped by the decklist parser, English then Korean.
pub const DEFAULT_HEADER_TOKENS: &[&str] = &[
    "monster",
    "spell",
    "trap",
    "extra",
    "side",
    "몬스터",
    "마법",
    "함정",
    "엑스트라",
    "사이드",
];

/// Configuration for a decklist build.
///
/// Built via [`BuildConfig::builder()`] or using [`BuildConfig::default()`].
///
/// # Example
/// ```rust
/// use deck2docx::BuildConfig;
///
/// let config = BuildConfig::builder()
///     .per_row(4)
///     .card_size(2.0, 2.9)
///     .build()
///     .unwrap();
/// assert_eq!(config.per_row, 4);
/// ```
#[derive(Clone)]
pub struct BuildConfig {
    /// Printed width of every card image, in inches. Default: 2.31.
    pub card_width_in: f64,

    /// Printed height of every card image, in inches. Default: 3.37.
    pub card_height_in: f64,

    /// Images per row before wrapping to a new row. Default: 3.
    ///
    /// Three 2.31" cards fit inside a Letter or A4 page with the default
    /// margins.
    pub per_row: usize,

    /// Page margins of the output document.
    pub margins: PageMargins,

    /// Search endpoint queried with `?q=<prefix> <card name>`.
    pub search_url: String,

    /// Text prepended to each card name in the search query. Default: `rush duel`.
    pub query_prefix: String,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,

    /// Timeout for the search and artwork-page requests, in seconds. Default: 10.
    pub page_timeout_secs: u64,

    /// Timeout for the image download, in seconds. Default: 15.
    pub image_timeout_secs: u64,

    /// Lower-cased lines the parser treats as section headers and skips.
    pub header_tokens: Vec<String>,

    /// Upper bound on copies per entry. Default: None (unbounded).
    ///
    /// When set, larger quantities are clamped and a warning is logged.
    pub max_copies: Option<u32>,

    /// Receives per-card events while the layout is built.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            card_width_in: 2.31,
            card_height_in: 3.37,
            per_row: 3,
            margins: PageMargins::default(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            query_prefix: DEFAULT_QUERY_PREFIX.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            page_timeout_secs: 10,
            image_timeout_secs: 15,
            header_tokens: DEFAULT_HEADER_TOKENS.iter().map(|s| s.to_string()).collect(),
            max_copies: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildConfig")
            .field("card_width_in", &self.card_width_in)
            .field("card_height_in", &self.card_height_in)
            .field("per_row", &self.per_row)
            .field("margins", &self.margins)
            .field("search_url", &self.search_url)
            .field("query_prefix", &self.query_prefix)
            .field("user_agent", &self.user_agent)
            .field("page_timeout_secs", &self.page_timeout_secs)
            .field("image_timeout_secs", &self.image_timeout_secs)
            .field("header_tokens", &self.header_tokens)
            .field("max_copies", &self.max_copies)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn BuildProgressCallback>"),
            )
            .finish()
    }
}

impl BuildConfig {
    /// Create a new builder for `BuildConfig`.
    pub fn builder() -> BuildConfigBuilder {
        BuildConfigBuilder {
            config: Self::default(),
        }
    }

    /// Copies to place for an entry, after applying `max_copies`.
    pub fn copies_for(&self, quantity: u32) -> u32 {
        match self.max_copies {
            Some(cap) => quantity.min(cap),
            None => quantity,
        }
    }
}

/// Builder for [`BuildConfig`].
#[derive(Debug)]
pub struct BuildConfigBuilder {
    config: BuildConfig,
}

impl BuildConfigBuilder {
    pub fn card_size(mut self, width_in: f64, height_in: f64) -> Self {
        self.config.card_width_in = width_in;
        self.config.card_height_in = height_in;
        self
    }

    pub fn per_row(mut self, n: usize) -> Self {
        self.config.per_row = n;
        self
    }

    pub fn margins(mut self, margins: PageMargins) -> Self {
        self.config.margins = margins;
        self
    }

    pub fn search_url(mut self, url: impl Into<String>) -> Self {
        self.config.search_url = url.into();
        self
    }

    pub fn query_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.query_prefix = prefix.into();
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    pub fn page_timeout_secs(mut self, secs: u64) -> Self {
        self.config.page_timeout_secs = secs;
        self
    }

    pub fn image_timeout_secs(mut self, secs: u64) -> Self {
        self.config.image_timeout_secs = secs;
        self
    }

    /// Replace the header-token list entirely.
    pub fn header_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.header_tokens = tokens
            .into_iter()
            .map(|t| t.into().trim().to_lowercase())
            .collect();
        self
    }

    /// Add one header token on top of the current list.
    pub fn extra_header_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into().trim().to_lowercase();
        if !token.is_empty() && !self.config.header_tokens.contains(&token) {
            self.config.header_tokens.push(token);
        }
        self
    }

    pub fn max_copies(mut self, cap: Option<u32>) -> Self {
        self.config.max_copies = cap;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BuildConfig, DeckError> {
        let c = &self.config;
        if c.per_row == 0 {
            return Err(DeckError::InvalidConfig("Images per row must be ≥ 1".into()));
        }
        for (what, v) in [("width", c.card_width_in), ("height", c.card_height_in)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(DeckError::InvalidConfig(format!(
                    "Card {what} must be a positive number of inches, got {v}"
                )));
            }
        }
        if c.page_timeout_secs == 0 || c.image_timeout_secs == 0 {
            return Err(DeckError::InvalidConfig("Timeouts must be ≥ 1 second".into()));
        }
        if reqwest::Url::parse(&c.search_url).is_err() {
            return Err(DeckError::InvalidConfig(format!(
                "Search URL is not a valid absolute URL: '{}'",
                c.search_url
            )));
        }
        c.margins.validate()?;
        Ok(self.config)
    }
}

// ── Page geometry ────────────────────────────────────────────────────────

/// Page margins in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageMargins {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Default for PageMargins {
    fn default() -> Self {
        Self {
            top: 0.4,
            left: 0.4,
            right: 0.5,
            bottom: 0.5,
        }
    }
}

impl PageMargins {
    fn validate(&self) -> Result<(), DeckError> {
        for v in [self.top, self.left, self.right, self.bottom] {
            if !v.is_finite() || v < 0.0 {
                return Err(DeckError::InvalidConfig(format!(
                    "Margins must be non-negative inches, got {v}"
                )));
            }
        }
        Ok(())
    }
}

/// English Metric Units per inch (DrawingML picture extents).
pub const EMU_PER_INCH: f64 = 914_400.0;

/// Twentieths of a point per inch (WordprocessingML page geometry).
pub const TWIPS_PER_INCH: f64 = 1_440.0;

pub fn inches_to_emu(inches: f64) -> u32 {
    (inches * EMU_PER_INCH).round() as u32
}

pub fn inches_to_twips(inches: f64) -> i32 {
    (inches * TWIPS_PER_INCH).round() as i32
}
