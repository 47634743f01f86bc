//! JSON client for a Gemini-style vision extraction endpoint.
//!
//! Sends the receipt image with an extraction prompt and parses the
//! model's JSON reply into a [`ReceiptDraft`]. Model behaviour itself is
//! out of scope; this is transport and response handling only.

use serde::Deserialize;

use receiptvault_core::receipt::ReceiptDraft;

use crate::{ExtractError, ReceiptExtractor};

/// Instruction sent alongside the image.
const EXTRACTION_PROMPT: &str = "Extract the receipt in this image as JSON with keys \
    bill_id, vendor, date (YYYY-MM-DD), amount, tax, subtotal, category, and \
    items (array of {name, quantity, price}). Use null for anything unreadable. \
    Reply with the JSON object only.";

/// HTTP client for a single vision API endpoint.
pub struct VisionClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

/// Response shape of a `generateContent` call, reduced to what we read.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

impl VisionClient {
    /// Create a client for the given endpoint, key, and model name.
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            model,
        }
    }

    /// Strip a Markdown code fence if the model wrapped its JSON in one.
    fn strip_code_fence(text: &str) -> &str {
        let trimmed = text.trim();
        let Some(inner) = trimmed.strip_prefix("```") else {
            return trimmed;
        };
        let inner = inner.strip_prefix("json").unwrap_or(inner);
        inner.strip_suffix("```").unwrap_or(inner).trim()
    }

    /// Parse the first candidate's text as a receipt draft.
    fn parse_reply(response: GenerateResponse) -> Result<ReceiptDraft, ExtractError> {
        let text = response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.as_str())
            .ok_or_else(|| {
                ExtractError::MalformedResponse("no candidates in response".to_string())
            })?;

        let json = Self::strip_code_fence(text);
        serde_json::from_str::<ReceiptDraft>(json)
            .map_err(|e| ExtractError::MalformedResponse(format!("invalid extraction JSON: {e}")))
    }
}

#[async_trait::async_trait]
impl ReceiptExtractor for VisionClient {
    async fn extract_image(
        &self,
        image_base64: &str,
        mime_type: &str,
    ) -> Result<ReceiptDraft, ExtractError> {
        let body = serde_json::json!({
            "contents": [{
                "parts": [
                    { "text": EXTRACTION_PROMPT },
                    { "inline_data": { "mime_type": mime_type, "data": image_base64 } },
                ],
            }],
        });

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_url, self.model, self.api_key
        );
        let response = self.client.post(url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        tracing::debug!("Vision extraction response received");
        Self::parse_reply(parsed)
    }
}
