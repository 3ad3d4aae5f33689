//! Background worker: one conversion per run, events over a channel.
//!
//! The interactive surface (CLI progress bar, or a GUI) must stay
//! responsive while the blocking file read and HTTP call run. The worker
//! owns the conversion on a background thread and publishes immutable
//! [`WorkerEvent`]s over an `mpsc` channel; the foreground thread drains
//! the channel and is the only place display state is mutated. No state is
//! shared between the threads besides the single-run flag.
//!
//! Exactly one run may be in flight at a time: [`ConversionWorker::spawn`]
//! returns [`OcrError::Busy`] until the previous run's thread finishes.
//! There is no cancellation once a run starts; the only timeout is the
//! request timeout in the config.

use crate::config::ConversionConfig;
use crate::convert;
use crate::error::OcrError;
use crate::output::ConversionOutput;
use crate::progress::{ConversionProgressCallback, Stage};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use tracing::debug;

/// An immutable update published by the worker thread.
#[derive(Debug)]
pub enum WorkerEvent {
    /// The workflow reached a checkpoint.
    Progress { percent: u8, message: String },
    /// The run finished successfully.
    Done(ConversionOutput),
    /// The run failed; the message has already been through
    /// [`OcrError::user_message`].
    Failed(String),
}

/// Spawns and guards the single background conversion thread.
pub struct ConversionWorker {
    busy: Arc<AtomicBool>,
}

impl Default for ConversionWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionWorker {
    pub fn new() -> Self {
        Self {
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a run is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Start converting `path` on a background thread.
    ///
    /// Returns the receiving end of the event channel: zero or more
    /// `Progress` events followed by exactly one `Done` or `Failed`, after
    /// which the channel closes. Returns [`OcrError::Busy`] if a run is
    /// already in flight.
    pub fn spawn(
        &self,
        path: PathBuf,
        mut config: ConversionConfig,
    ) -> Result<mpsc::Receiver<WorkerEvent>, OcrError> {
        if self.busy.swap(true, Ordering::SeqCst) {
            return Err(OcrError::Busy);
        }

        let (tx, rx) = mpsc::channel();
        config.progress_callback = Some(Arc::new(ChannelProgress {
            tx: Mutex::new(tx.clone()),
        }));

        let busy = Arc::clone(&self.busy);
        std::thread::spawn(move || {
            debug!("Worker thread started for {}", path.display());
            let result = convert::convert_sync(&path, &config);

            // Clear the guard before the final event so a caller that saw
            // the channel close can immediately start the next run.
            busy.store(false, Ordering::SeqCst);

            let event = match result {
                Ok(output) => WorkerEvent::Done(output),
                Err(e) => WorkerEvent::Failed(e.user_message()),
            };
            // The receiver may already be gone; nothing left to do then.
            let _ = tx.send(event);
        });

        Ok(rx)
    }
}

/// Bridges [`ConversionProgressCallback`] events onto the worker channel.
///
/// `mpsc::Sender` is `Send` but not `Sync`, while the callback trait
/// requires both; the `Mutex` supplies the missing `Sync`.
struct ChannelProgress {
    tx: Mutex<mpsc::Sender<WorkerEvent>>,
}

impl ChannelProgress {
    fn send(&self, event: WorkerEvent) {
        if let Ok(tx) = self.tx.lock() {
            let _ = tx.send(event);
        }
    }
}

impl ConversionProgressCallback for ChannelProgress {
    // on_error keeps its no-op default: the terminal Failed event is sent
    // by the worker thread itself, after the single-run guard clears.

    fn on_stage(&self, stage: Stage) {
        // `Complete` is reported through on_complete with the final counts.
        if stage == Stage::Complete {
            return;
        }
        self.send(WorkerEvent::Progress {
            percent: stage.percent(),
            message: stage.message().to_string(),
        });
    }

    fn on_complete(&self, page_count: usize, image_count: usize) {
        self.send(WorkerEvent::Progress {
            percent: Stage::Complete.percent(),
            message: format!("Complete! Processed {page_count} pages, {image_count} images"),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConversionConfig;

    fn test_config() -> ConversionConfig {
        ConversionConfig::builder().api_key("sk-test").build().unwrap()
    }

    #[test]
    fn failed_run_emits_progress_then_failed() {
        let worker = ConversionWorker::new();
        let rx = worker
            .spawn(PathBuf::from("/nonexistent/missing.pdf"), test_config())
            .unwrap();

        let events: Vec<WorkerEvent> = rx.iter().collect();
        assert!(events.len() >= 2, "expected progress + terminal event");

        match &events[0] {
            WorkerEvent::Progress { percent: 20, message } => {
                assert!(message.contains("base64"));
            }
            other => panic!("expected first event to be 20% progress, got {other:?}"),
        }

        match events.last().unwrap() {
            WorkerEvent::Failed(msg) => {
                assert!(msg.contains("missing.pdf"), "got: {msg}");
            }
            other => panic!("expected terminal Failed event, got {other:?}"),
        }

        // Channel closed means the thread cleared the guard first.
        assert!(!worker.is_busy());
    }

    #[test]
    fn second_spawn_while_busy_is_rejected() {
        let worker = ConversionWorker::new();
        // Simulate an in-flight run without starting a thread.
        worker.busy.store(true, Ordering::SeqCst);

        let err = worker
            .spawn(PathBuf::from("whatever.pdf"), test_config())
            .unwrap_err();
        assert!(matches!(err, OcrError::Busy));

        worker.busy.store(false, Ordering::SeqCst);
        assert!(!worker.is_busy());
    }

    #[test]
    fn timeout_failure_message_is_remapped() {
        // The worker remaps via user_message(); verify the mapping it uses.
        let e = OcrError::Timeout { secs: 300 };
        assert!(e.user_message().contains("too large"));
    }
}
