//! Encode stage: PDF bytes → base64 `application/pdf` data URI.
//!
//! The OCR API accepts documents as data URIs embedded in the JSON request
//! body, so the entire file travels inside one POST — no multipart upload,
//! no separate storage step. The cost is a ~33 % size inflation from
//! base64, which is why the request timeout is generous.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

/// Wrap raw PDF bytes as a `data:application/pdf;base64,…` URI.
pub fn to_data_uri(bytes: &[u8]) -> String {
    let b64 = STANDARD.encode(bytes);
    debug!("Encoded PDF → {} bytes base64", b64.len());
    format!("data:application/pdf;base64,{b64}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_has_expected_prefix() {
        let uri = to_data_uri(b"%PDF-1.4 hello");
        assert!(uri.starts_with("data:application/pdf;base64,"));
    }

    #[test]
    fn payload_round_trips() {
        let original = b"%PDF-1.4\nsome binary \x00\xff content";
        let uri = to_data_uri(original);
        let b64 = uri.strip_prefix("data:application/pdf;base64,").unwrap();
        let decoded = STANDARD.decode(b64).expect("valid base64");
        assert_eq!(decoded, original);
    }

    #[test]
    fn empty_input_still_valid_uri() {
        assert_eq!(to_data_uri(b""), "data:application/pdf;base64,");
    }
}
