//! Google Gemini Vision client for medical image analysis.
//!
//! Calls the `generateContent` endpoint with inline base64 image parts.
//! The API key travels as a query parameter, matching the REST surface.

use lazy_regex::regex;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use super::ServiceError;

const GENERATE_CONTENT_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";

pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(client: Client, api_key: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
        }
    }

    pub fn has_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Analyze one or more base64-encoded images with the given prompt.
    ///
    /// Images may carry a `data:image/...;base64,` prefix; it is stripped
    /// and used for mime-type detection.
    pub async fn analyze_images(
        &self,
        prompt: &str,
        images: &[String],
    ) -> Result<String, ServiceError> {
        if self.api_key.is_empty() {
            return Err(ServiceError::MissingKey("GOOGLE_GENERATIVE_AI_API_KEY"));
        }

        let mut parts = vec![json!({ "text": prompt })];
        for image in images {
            parts.push(json!({
                "inlineData": {
                    "mimeType": detect_mime_type(image),
                    "data": strip_data_url_prefix(image),
                }
            }));
        }

        let body = json!({
            "contents": [{ "parts": parts }],
            "generationConfig": {
                "temperature": 0.4,
                "topK": 32,
                "topP": 1,
                "maxOutputTokens": 2048,
            },
            "safetySettings": [
                { "category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
                { "category": "HARM_CATEGORY_HATE_SPEECH", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
                { "category": "HARM_CATEGORY_SEXUALLY_EXPLICIT", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
                { "category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
            ],
        });

        debug!(images = images.len(), "Calling Gemini Vision");

        let resp = self
            .client
            .post(GENERATE_CONTENT_URL)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
                message: status.to_string(),
            });
        }

        let data: Value = resp.json().await?;
        extract_candidate_text(&data)
            .ok_or_else(|| ServiceError::Decode("no response content from Gemini".into()))
    }
}

/// Pull the first candidate's text out of a `generateContent` response.
fn extract_candidate_text(data: &Value) -> Option<String> {
    data.get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
        .map(|s| s.to_string())
}

/// Detect the mime type from a data-URL prefix, defaulting to JPEG.
fn detect_mime_type(image: &str) -> String {
    if let Some(caps) = regex!(r"^data:image/([a-z]+);base64").captures(image) {
        return format!("image/{}", &caps[1]);
    }
    "image/jpeg".to_string()
}

/// Strip a leading `data:image/...;base64,` prefix if present.
fn strip_data_url_prefix(image: &str) -> &str {
    regex!(r"^data:image/[a-z]+;base64,")
        .find(image)
        .map(|m| &image[m.end()..])
        .unwrap_or(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_mime_type() {
        assert_eq!(detect_mime_type("data:image/png;base64,AAAA"), "image/png");
        assert_eq!(detect_mime_type("data:image/gif;base64,AAAA"), "image/gif");
        assert_eq!(detect_mime_type("AAAA"), "image/jpeg");
    }

    #[test]
    fn test_strip_data_url_prefix() {
        assert_eq!(strip_data_url_prefix("data:image/png;base64,QUJD"), "QUJD");
        assert_eq!(strip_data_url_prefix("QUJD"), "QUJD");
    }

    #[test]
    fn test_extract_candidate_text() {
        let data = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "diagnosis" }] }
            }]
        });
        assert_eq!(extract_candidate_text(&data), Some("diagnosis".into()));

        let empty = serde_json::json!({ "candidates": [] });
        assert_eq!(extract_candidate_text(&empty), None);
    }
}
