//! Conversion entry points.
//!
//! [`convert`] runs the whole workflow for one document and returns the
//! assembled output. [`convert_to_file`] additionally persists the result
//! as `<output_dir>/<input stem>.md`. [`convert_sync`] is the blocking
//! wrapper used by [`crate::worker::ConversionWorker`] so a plain OS thread
//! can drive the async pipeline.

use crate::config::ConversionConfig;
use crate::error::OcrError;
use crate::output::{ConversionOutput, ConversionStats};
use crate::pipeline::{assemble, encode, input, ocr};
use crate::progress::Stage;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Convert a PDF file to Markdown via the Mistral OCR API.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// * [`OcrError::Io`] / [`OcrError::NotAPdf`] — the file is unreadable or
///   not a PDF
/// * [`OcrError::Timeout`] / [`OcrError::Network`] — the request did not
///   complete
/// * [`OcrError::Api`] — the API returned a non-success status
///
/// An unrecognised response *shape* is not an error; see
/// [`crate::pipeline::assemble`].
///
/// On failure the configured progress callback's
/// [`on_error`](crate::progress::ConversionProgressCallback::on_error) fires
/// exactly once with the remapped user message before the `Err` is returned.
pub async fn convert(
    path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, OcrError> {
    match run(path.as_ref(), config).await {
        Ok(output) => Ok(output),
        Err(e) => {
            if let Some(ref cb) = config.progress_callback {
                cb.on_error(&e.user_message());
            }
            Err(e)
        }
    }
}

async fn run(path: &Path, config: &ConversionConfig) -> Result<ConversionOutput, OcrError> {
    let start = Instant::now();
    info!("Starting conversion: {}", path.display());

    // ── Step 1: Read the file ────────────────────────────────────────────
    notify(config, Stage::Encoding);
    let bytes = input::read_pdf(path).await?;

    // ── Step 2: Encode as data URI ───────────────────────────────────────
    let data_uri = encode::to_data_uri(&bytes);
    drop(bytes);

    // ── Step 3: The OCR request ──────────────────────────────────────────
    notify(config, Stage::Uploading);
    let response = ocr::request_ocr(config, &data_uri).await?;

    // ── Step 4: Assemble the document ────────────────────────────────────
    notify(config, Stage::Parsing);
    let assembled = assemble::assemble(&response);

    let stats = ConversionStats {
        page_count: assembled.pages.len(),
        image_count: assembled.image_count,
        total_duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Conversion complete: {} pages, {} images, {}ms",
        stats.page_count, stats.image_count, stats.total_duration_ms
    );

    notify(config, Stage::Complete);
    if let Some(ref cb) = config.progress_callback {
        cb.on_complete(stats.page_count, stats.image_count);
    }

    Ok(ConversionOutput {
        markdown: assembled.markdown,
        pages: assembled.pages,
        stats,
    })
}

/// Convert a PDF and write the Markdown next to its stem in `output_dir`.
///
/// Creates `output_dir` if absent; overwrites an existing output file.
/// Uses atomic write (temp file + rename) to prevent partial files.
///
/// Returns the path written and the run stats.
pub async fn convert_to_file(
    path: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<(PathBuf, ConversionStats), OcrError> {
    let path = path.as_ref();
    let output = convert(path, config).await?;

    let out_path = output_path(path, output_dir.as_ref());
    write_markdown(&out_path, &output.markdown)?;

    info!("Wrote {}", out_path.display());
    Ok((out_path, output.stats))
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally. Used by the background
/// worker thread, which is a plain `std::thread`.
pub fn convert_sync(
    path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, OcrError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| OcrError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(convert(path, config))
}

/// Compute the output path: `<output_dir>/<input stem>.md`.
pub fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    output_dir.join(format!("{stem}.md"))
}

/// Write UTF-8 Markdown atomically (temp file + rename), creating the
/// parent directory if needed.
///
/// Public and blocking so non-async frontends (the CLI's file-delivery
/// path) get the same no-partial-files guarantee as [`convert_to_file`].
pub fn write_markdown(path: &Path, markdown: &str) -> Result<(), OcrError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| OcrError::OutputWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    let tmp_path = path.with_extension("md.tmp");
    std::fs::write(&tmp_path, markdown).map_err(|e| OcrError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    std::fs::rename(&tmp_path, path).map_err(|e| OcrError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

fn notify(config: &ConversionConfig, stage: Stage) {
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage(stage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ConversionProgressCallback;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[test]
    fn output_path_uses_input_stem() {
        let p = output_path(Path::new("/docs/report final.pdf"), Path::new("/out"));
        assert_eq!(p, PathBuf::from("/out/report final.md"));
    }

    #[test]
    fn output_path_without_stem_falls_back() {
        let p = output_path(Path::new("/"), Path::new("out"));
        assert_eq!(p, PathBuf::from("out/output.md"));
    }

    #[test]
    fn write_markdown_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/deeper/doc.md");
        write_markdown(&target, "# Hello\n").unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "# Hello\n");
    }

    #[test]
    fn write_markdown_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("doc.md");
        write_markdown(&target, "first").unwrap();
        write_markdown(&target, "second").unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "second");
    }

    #[test]
    fn write_markdown_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("doc.md");
        write_markdown(&target, "content").unwrap();
        assert!(!target.with_extension("md.tmp").exists());
    }

    #[tokio::test]
    async fn convert_missing_file_is_io_error() {
        let config = ConversionConfig::builder().api_key("sk-test").build().unwrap();
        let err = convert("/nonexistent/file.pdf", &config).await.unwrap_err();
        assert!(matches!(err, OcrError::Io { .. }));
    }

    #[tokio::test]
    async fn failure_fires_on_error_exactly_once() {
        struct ErrorCounter {
            count: AtomicUsize,
            last: Mutex<String>,
        }

        impl ConversionProgressCallback for ErrorCounter {
            fn on_error(&self, message: &str) {
                self.count.fetch_add(1, Ordering::SeqCst);
                *self.last.lock().unwrap() = message.to_string();
            }
        }

        let counter = Arc::new(ErrorCounter {
            count: AtomicUsize::new(0),
            last: Mutex::new(String::new()),
        });

        let config = ConversionConfig::builder()
            .api_key("sk-test")
            .progress_callback(Arc::clone(&counter) as Arc<dyn ConversionProgressCallback>)
            .build()
            .unwrap();

        let err = convert("/definitely/not/here.pdf", &config).await.unwrap_err();

        assert_eq!(counter.count.load(Ordering::SeqCst), 1);
        assert_eq!(*counter.last.lock().unwrap(), err.user_message());
    }
}
