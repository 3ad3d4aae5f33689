//! Pipeline stages for PDF-to-Markdown conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable: everything
//! except the HTTP call is a pure function over bytes or JSON.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ encode ──▶ ocr ──▶ assemble
//! (path)   (base64)   (POST)   (pages → text)
//! ```
//!
//! 1. [`input`]    — validate the path and read the PDF fully into memory
//! 2. [`encode`]   — wrap the bytes as an `application/pdf` base64 data URI
//! 3. [`ocr`]      — the single POST to the Mistral OCR endpoint; the only
//!    stage with network I/O
//! 4. [`assemble`] — walk the response's `pages` array into one combined
//!    document, counting images along the way

pub mod assemble;
pub mod encode;
pub mod input;
pub mod ocr;
