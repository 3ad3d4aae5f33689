//! OCR stage: the single POST to the Mistral OCR endpoint.
//!
//! This is the only stage with network I/O. It is intentionally thin: build
//! the request body, send it, classify the failure modes. All response
//! interpretation lives in [`crate::pipeline::assemble`] so it can be tested
//! without a network.
//!
//! ## Failure classification
//!
//! * timeout           → [`OcrError::Timeout`]
//! * transport failure → [`OcrError::Network`]
//! * non-2xx status    → [`OcrError::Api`] with the body's JSON `message`
//!   field when the body is JSON, else the literal "Unknown error"

use crate::config::ConversionConfig;
use crate::error::OcrError;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Wire shape of the OCR request body.
#[derive(Debug, Serialize)]
pub struct OcrRequest<'a> {
    pub model: &'a str,
    pub document: DocumentPart<'a>,
    pub include_image_base64: bool,
}

/// The `document` object inside the request body.
#[derive(Debug, Serialize)]
pub struct DocumentPart<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub document_url: &'a str,
}

impl<'a> OcrRequest<'a> {
    /// Build the request body for a data-URI document.
    pub fn for_data_uri(config: &'a ConversionConfig, data_uri: &'a str) -> Self {
        Self {
            model: &config.model,
            document: DocumentPart {
                kind: "document_url",
                document_url: data_uri,
            },
            include_image_base64: config.include_images,
        }
    }
}

/// POST the encoded document to the OCR endpoint and return the raw JSON.
pub async fn request_ocr(config: &ConversionConfig, data_uri: &str) -> Result<Value, OcrError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| OcrError::Network {
            reason: e.to_string(),
        })?;

    let body = OcrRequest::for_data_uri(config, data_uri);
    info!("POST {} (model {})", config.endpoint, config.model);

    let response = client
        .post(&config.endpoint)
        .bearer_auth(&config.api_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                OcrError::Timeout {
                    secs: config.timeout_secs,
                }
            } else {
                OcrError::Network {
                    reason: e.to_string(),
                }
            }
        })?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(OcrError::Api {
            status: status.as_u16(),
            message: api_message(&text),
        });
    }

    let json: Value = response.json().await.map_err(|e| {
        if e.is_timeout() {
            OcrError::Timeout {
                secs: config.timeout_secs,
            }
        } else {
            OcrError::Network {
                reason: format!("Failed to read response body: {e}"),
            }
        }
    })?;

    debug!("OCR response received");
    Ok(json)
}

/// Extract the error message from a non-success response body.
///
/// The API reports errors as `{"message": "…"}`; anything that is not JSON
/// with a string `message` field becomes "Unknown error".
fn api_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| "Unknown error".to_string())
}
