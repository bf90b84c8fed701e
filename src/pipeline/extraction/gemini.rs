use serde::{Deserialize, Serialize};

use super::types::ExtractionClient;
use super::ExtractionError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini HTTP client in JSON-response mode.
///
/// Every request carries the book-data response schema, so a well-behaved
/// model answers with a single JSON object matching `RawBookData`.
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: &str,
        timeout_secs: u64,
    ) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            client,
            timeout_secs,
        }
    }

    /// Public Gemini endpoint with the given model and the default
    /// long-manuscript timeout.
    pub fn public(model: &str, api_key: &str, timeout_secs: u64) -> Self {
        Self::new(DEFAULT_BASE_URL, model, api_key, timeout_secs)
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
    #[serde(rename = "responseSchema")]
    response_schema: serde_json::Value,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: String,
}

/// Response schema sent with every request (Gemini structured-output form
/// of the `RawBookData` wire contract).
fn book_data_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "author": { "type": "STRING" },
            "is_poetry": { "type": "BOOLEAN" },
            "chapters": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "number": { "type": "INTEGER" },
                        "name": { "type": "STRING" },
                        "tag_index_of_first_paragraph": { "type": "INTEGER" },
                        "tag_index_of_last_paragraph": { "type": "INTEGER" }
                    },
                    "required": [
                        "number",
                        "name",
                        "tag_index_of_first_paragraph",
                        "tag_index_of_last_paragraph"
                    ]
                }
            }
        },
        "required": ["title", "author", "is_poetry", "chapters"]
    })
}

impl ExtractionClient for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, ExtractionError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: book_data_schema(),
            },
        };

        let response = self.client.post(&url).json(&body).send().map_err(|e| {
            if e.is_connect() {
                ExtractionError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                ExtractionError::HttpClient(format!(
                    "Request timed out after {}s",
                    self.timeout_secs
                ))
            } else {
                ExtractionError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ExtractionError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response
            .text()
            .map_err(|e| ExtractionError::MalformedResponse(e.to_string()))?;

        let parsed: GenerateContentResponse = serde_json::from_str(&raw)
            .map_err(|e| ExtractionError::MalformedResponse(e.to_string()))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| {
                ExtractionError::MalformedResponse("response carries no candidate text".into())
            })?;

        tracing::debug!(model = %self.model, chars = text.len(), "Extraction response received");
        Ok(text)
    }
}

/// Mock extraction client for testing. Returns a configurable response.
pub struct MockExtractionClient {
    response: String,
}

impl MockExtractionClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
        }
    }
}

impl ExtractionClient for MockExtractionClient {
    fn generate(&self, _prompt: &str) -> Result<String, ExtractionError> {
        Ok(self.response.clone())
    }
}
