//! Input stage: validate the path and read the PDF fully into memory.
//!
//! The whole file is read up front because the request embeds it as a
//! base64 data URI — there is no streaming upload in the OCR API. We check
//! the `%PDF` magic bytes before spending time and money on an API call:
//! the server would reject a non-PDF anyway, but a local check gives an
//! immediate, specific error instead of a confusing remote one.

use crate::error::OcrError;
use std::path::Path;
use tracing::debug;

/// Read the PDF at `path` into memory, validating the magic bytes.
pub async fn read_pdf(path: &Path) -> Result<Vec<u8>, OcrError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| OcrError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    if bytes.len() >= 4 && &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        return Err(OcrError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }

    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}
