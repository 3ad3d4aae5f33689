//! Output types: assembled Markdown plus per-page and run-level stats.

use serde::{Deserialize, Serialize};

/// Result of a successful conversion.
///
/// A conversion that reaches the API and gets a parseable reply always
/// succeeds — even when the reply has no recognisable `pages` array, in
/// which case `markdown` holds a diagnostic dump of the raw response and
/// `pages` is empty. Callers that care can check `stats.page_count == 0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The combined Markdown document, trimmed of leading/trailing whitespace.
    pub markdown: String,

    /// Per-page sections in response order.
    pub pages: Vec<PageText>,

    /// Run-level statistics.
    pub stats: ConversionStats,
}

/// Text extracted from a single page of the OCR response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageText {
    /// 1-based page number (position in the response).
    pub page_num: usize,

    /// The page's `markdown` field if present, else its `text` field,
    /// else empty.
    pub text: String,

    /// Number of entries in the page's `images` array (0 when absent).
    pub image_count: usize,
}

/// Statistics about a conversion run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Pages processed (0 when the response shape was unrecognised).
    pub page_count: usize,

    /// Total images reported across all pages.
    pub image_count: usize,

    /// Wall-clock duration of the whole run in milliseconds.
    pub total_duration_ms: u64,
}
