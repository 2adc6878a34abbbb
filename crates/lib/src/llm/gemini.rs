//! Gemini API client (generateContent), used to pull a place name out of free text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Client for the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("gemini request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("gemini api error: {0}")]
    Api(String),
    #[error("gemini returned no text")]
    Empty,
}

/// Extracts a location name from a user message.
#[async_trait]
pub trait LocationModel: Send + Sync {
    async fn extract_location(&self, text: &str) -> Result<String, GeminiError>;
}

/// Prompt asking for the bare location and nothing else.
pub fn location_prompt(text: &str) -> String {
    format!(
        "Extract ONLY the city or location name from this message: '{}'. \
         Respond with only the location, no extra text or punctuation.",
        text
    )
}

impl GeminiClient {
    pub fn new(api_key: String, model: Option<String>, base_url: Option<String>) -> Self {
        let base_url = base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model = model
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Self {
            base_url,
            api_key,
            model,
            client: reqwest::Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// POST /models/{model}:generateContent: single-turn prompt, returns the first candidate's text.
    pub async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![TextPart {
                    text: prompt.to_string(),
                }],
            }],
        };
        let res = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(GeminiError::Api(format!("{} {}", status, body)));
        }
        let data: GenerateResponse = res.json().await?;
        let text = data.text();
        if text.trim().is_empty() {
            return Err(GeminiError::Empty);
        }
        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl LocationModel for GeminiClient {
    async fn extract_location(&self, text: &str) -> Result<String, GeminiError> {
        self.generate(&location_prompt(text)).await
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TextPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate's parts.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default()
    }
}
