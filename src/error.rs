//! Error types for the occurock library.
//!
//! Every failure the conversion workflow can hit is a variant of
//! [`OcrError`]. The variants mirror the stages of the pipeline: input
//! (file unreadable, not a PDF), transport (connection failure, timeout),
//! API (non-success HTTP status), and output (file write).
//!
//! An *unrecognised response shape* is deliberately **not** an error: the
//! assemble stage turns it into a diagnostic text dump and the conversion
//! succeeds. See [`crate::pipeline::assemble`].
//!
//! [`OcrError::user_message`] applies the cosmetic remapping rules before a
//! failure is surfaced to the user — timeouts, 401 and 429 get friendlier
//! wording, everything else passes through unchanged. The remapping never
//! triggers a retry.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the occurock library.
#[derive(Debug, Error)]
pub enum OcrError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file could not be read.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── Transport errors ──────────────────────────────────────────────────
    /// The OCR request exceeded the configured timeout.
    #[error("OCR request timed out after {secs}s")]
    Timeout { secs: u64 },

    /// Connection-level failure talking to the OCR endpoint.
    #[error("Network error calling OCR API: {reason}")]
    Network { reason: String },

    // ── API errors ────────────────────────────────────────────────────────
    /// The OCR API returned a non-success HTTP status.
    ///
    /// `message` comes from the response body's JSON `message` field when
    /// the body is JSON, else the literal "Unknown error".
    #[error("API Error {status}: {message}")]
    Api { status: u16, message: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Worker errors ─────────────────────────────────────────────────────
    /// A conversion is already in flight; only one run at a time is allowed.
    #[error("A conversion is already running")]
    Busy,

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl OcrError {
    /// Rewrite the raw error into the message shown to the user.
    ///
    /// Cosmetic remapping only — nothing is retried:
    /// * timeouts → "Request timed out. …"
    /// * HTTP 401 → "Invalid API key. …"
    /// * HTTP 429 → "Rate limit exceeded. …"
    /// * anything else passes through as its `Display` text.
    ///
    /// String matching on "401"/"429"/"timeout" is intentional: errors that
    /// arrive already stringified (e.g. forwarded over a channel) still get
    /// the same treatment as the typed variants.
    pub fn user_message(&self) -> String {
        let raw = self.to_string();
        match self {
            OcrError::Timeout { .. } => timeout_message(),
            OcrError::Api { status: 401, .. } => invalid_key_message(),
            OcrError::Api { status: 429, .. } => rate_limit_message(),
            _ => remap_message(&raw),
        }
    }
}

/// Apply the remapping rules to an already-stringified error message.
///
/// Used by [`OcrError::user_message`] and by the worker when it only has
/// the message text left.
pub fn remap_message(raw: &str) -> String {
    if raw.to_lowercase().contains("timeout") || raw.to_lowercase().contains("timed out") {
        timeout_message()
    } else if raw.contains("401") {
        invalid_key_message()
    } else if raw.contains("429") {
        rate_limit_message()
    } else {
        raw.to_string()
    }
}

fn timeout_message() -> String {
    "Request timed out. The PDF might be too large or complex.".to_string()
}

fn invalid_key_message() -> String {
    "Invalid API key. Please check your Mistral API key.".to_string()
}

fn rate_limit_message() -> String {
    "Rate limit exceeded. Please wait and try again.".to_string()
}
