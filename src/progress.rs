//! Progress-callback trait for conversion stage events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the workflow moves through its stages (encode → request →
//! parse → done).
//!
//! # Why callbacks instead of channels?
//!
//! The callback is the least-invasive integration point: callers can forward
//! events to an mpsc channel, a progress bar, or a status label without the
//! library knowing how the host application communicates. The trait is
//! `Send + Sync` so it can be driven from a background worker thread —
//! [`crate::worker::ConversionWorker`] does exactly that, bridging these
//! callbacks onto a channel the foreground thread drains.

use std::sync::Arc;

/// Fixed progress checkpoints of the conversion workflow.
///
/// The percentages are coarse by design: there are only four observable
/// stages, and the long pole (the OCR request) gives no intermediate
/// feedback, so anything finer would be fiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading the file and base64-encoding it. 20 %.
    Encoding,
    /// The HTTP request is in flight. 40 %.
    Uploading,
    /// Response received, parsing and assembling. 80 %.
    Parsing,
    /// Everything done. 100 %.
    Complete,
}

impl Stage {
    /// Progress percentage associated with this stage.
    pub fn percent(&self) -> u8 {
        match self {
            Stage::Encoding => 20,
            Stage::Uploading => 40,
            Stage::Parsing => 80,
            Stage::Complete => 100,
        }
    }

    /// Default status-line text for this stage.
    pub fn message(&self) -> &'static str {
        match self {
            Stage::Encoding => "Converting PDF to base64...",
            Stage::Uploading => "Sending to Mistral OCR API...",
            Stage::Parsing => "Processing response...",
            Stage::Complete => "Complete!",
        }
    }
}

/// Called by the conversion workflow as it passes each stage.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must be `Send + Sync`.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called when the workflow enters a stage.
    fn on_stage(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called once on success with final counts.
    fn on_complete(&self, page_count: usize, image_count: usize) {
        let _ = (page_count, image_count);
    }

    /// Called once on failure with the already-remapped user message.
    fn on_error(&self, message: &str) {
        let _ = message;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
