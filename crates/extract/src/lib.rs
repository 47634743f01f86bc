//! Ingestion adapters: turn raw receipt input into a [`ReceiptDraft`].
//!
//! Two paths mirror the upload flow: an AI vision call when an API key is
//! configured, and a regex text parser over OCR output as the fallback.
//! Neither path judges the extracted data: that is the validation
//! engine's job, so both produce drafts with `None` for anything they
//! cannot find.

use async_trait::async_trait;

use receiptvault_core::receipt::ReceiptDraft;

pub mod text_parser;
pub mod vision;

/// Errors from the extraction layer.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The vision API returned a non-2xx status code.
    #[error("Vision API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The vision API answered, but not with usable extraction JSON.
    #[error("Malformed vision response: {0}")]
    MalformedResponse(String),
}

/// An extractor producing a candidate receipt from an uploaded image.
#[async_trait]
pub trait ReceiptExtractor: Send + Sync {
    /// Extract a draft from a base64-encoded image.
    async fn extract_image(
        &self,
        image_base64: &str,
        mime_type: &str,
    ) -> Result<ReceiptDraft, ExtractError>;
}
