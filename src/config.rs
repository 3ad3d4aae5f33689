//! Configuration types for PDF-to-Markdown conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across threads and diff two runs to understand
//! why their outputs differ.
//!
//! The API key never appears in `Debug` output — configs get logged at
//! `debug!` level and a leaked credential in a log file is a real incident.

use crate::error::OcrError;
use crate::progress::ProgressCallback;
use std::fmt;

/// Default OCR endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.mistral.ai/v1/ocr";

/// Default OCR model identifier.
pub const DEFAULT_MODEL: &str = "mistral-ocr-latest";

/// Default request timeout in seconds (5 minutes).
///
/// OCR of a large scanned document is slow on the server side; the request
/// stays open until the full response arrives. 300 s covers documents of a
/// few hundred pages without the client giving up first.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Configuration for a PDF-to-Markdown conversion.
///
/// Built via [`ConversionConfig::builder()`].
///
/// # Example
/// ```rust
/// use occurock::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .api_key("sk-test")
///     .timeout_secs(120)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Mistral API key sent as a bearer token. Required, non-empty.
    pub api_key: String,

    /// OCR model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// OCR endpoint URL. Default: [`DEFAULT_ENDPOINT`].
    ///
    /// Overridable mainly for tests and proxies; production use always
    /// targets the public Mistral endpoint.
    pub endpoint: String,

    /// Request timeout in seconds. Default: [`DEFAULT_TIMEOUT_SECS`].
    pub timeout_secs: u64,

    /// Ask the API to inline base64 images in the response. Default: true.
    ///
    /// Only the *count* of returned images is reported in the stats; the
    /// flag exists because the API returns per-page image metadata only
    /// when it is set.
    pub include_images: bool,

    /// Optional observer for stage-level progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            include_images: true,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .field("include_images", &self.include_images)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
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
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs.max(1);
        self
    }

    pub fn include_images(mut self, v: bool) -> Self {
        self.config.include_images = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, OcrError> {
        let c = &self.config;
        if c.api_key.trim().is_empty() {
            return Err(OcrError::InvalidConfig(
                "API key must not be empty".into(),
            ));
        }
        if c.endpoint.trim().is_empty() {
            return Err(OcrError::InvalidConfig("Endpoint must not be empty".into()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = ConversionConfig::builder()
            .api_key("sk-test")
            .build()
            .unwrap();
        assert_eq!(config.model, "mistral-ocr-latest");
        assert_eq!(config.endpoint, "https://api.mistral.ai/v1/ocr");
        assert_eq!(config.timeout_secs, 300);
        assert!(config.include_images);
    }

    #[test]
    fn empty_api_key_rejected() {
        let err = ConversionConfig::builder().api_key("   ").build();
        assert!(matches!(err, Err(OcrError::InvalidConfig(_))));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = ConversionConfig::builder()
            .api_key("sk-very-secret")
            .build()
            .unwrap();
        let dump = format!("{config:?}");
        assert!(!dump.contains("sk-very-secret"));
        assert!(dump.contains("<redacted>"));
    }

    #[test]
    fn timeout_floor_is_one_second() {
        let config = ConversionConfig::builder()
            .api_key("k")
            .timeout_secs(0)
            .build()
            .unwrap();
        assert_eq!(config.timeout_secs, 1);
    }
}
