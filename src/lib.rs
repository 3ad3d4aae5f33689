//! # occurock
//!
//! Convert PDF documents to Markdown using the Mistral OCR API.
//!
//! ## Why this crate?
//!
//! Traditional PDF-to-text tools (pdftotext, pdf-extract) fail on scanned
//! documents and complex layouts. Mistral's hosted OCR model reads the
//! document as a human would and returns per-page Markdown; this crate is
//! the plumbing around that one call — encode the file, POST it, assemble
//! the pages, save the result — with a CLI on top.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input     read the file, check %PDF magic bytes
//!  ├─ 2. Encode    bytes → base64 application/pdf data URI
//!  ├─ 3. OCR       one POST to api.mistral.ai/v1/ocr (300s timeout)
//!  ├─ 4. Assemble  pages[] → "--- PAGE i ---" sections + image counts
//!  └─ 5. Output    trimmed Markdown + stats, optional .md file
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use occurock::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder()
//!         .api_key(std::env::var("MISTRAL_API_KEY")?)
//!         .build()?;
//!     let output = convert("document.pdf", &config).await?;
//!     println!("{}", output.markdown);
//!     eprintln!("{} pages, {} images", output.stats.page_count, output.stats.image_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `occurock` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! occurock = { version = "0.3", default-features = false }
//! ```
//!
//! ## Threading model
//!
//! The library API is async. Interactive frontends should use
//! [`worker::ConversionWorker`]: it runs one conversion at a time on a
//! background thread and publishes immutable progress/result/error events
//! over a channel, so no display state is ever touched off the foreground
//! thread.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod settings;
pub mod worker;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, DEFAULT_ENDPOINT, DEFAULT_MODEL};
pub use convert::{convert, convert_sync, convert_to_file};
pub use error::OcrError;
pub use output::{ConversionOutput, ConversionStats, PageText};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback, Stage};
pub use settings::Settings;
pub use worker::{ConversionWorker, WorkerEvent};
