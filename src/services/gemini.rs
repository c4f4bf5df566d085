use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::GeminiConfig;
use crate::prompts::GenerationError;

/// Anything that can turn a prompt into raw model text.
#[async_trait]
pub trait PromptModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Top-level `generateContent` response envelope.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
    #[serde(default)]
    pub block_reason_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate.
    pub fn into_text(self) -> Result<String, GenerationError> {
        let text = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .filter(|t| !t.trim().is_empty());

        text.ok_or_else(|| GenerationError::EmptyResponse {
            block_reason: self
                .prompt_feedback
                .and_then(|f| f.block_reason_message.or(f.block_reason)),
        })
    }
}

/// Maps a non-success answer from the API onto the error the page shows.
pub fn upstream_error(status: u16, body: &str) -> GenerationError {
    let message = serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    if message.contains("API key not valid") {
        GenerationError::InvalidApiKey
    } else {
        GenerationError::Upstream(format!("Gemini API returned {status}: {message}"))
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Self {
        GeminiClient {
            client: Client::new(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            api_base: config.api_base.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base,
            urlencoding::encode(&self.model)
        )
    }
}

#[async_trait]
impl PromptModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!("Calling Gemini model {}", self.model);
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini request failed: {e}");
                GenerationError::Upstream(e.to_string())
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GenerationError::Upstream(e.to_string()))?;

        if !status.is_success() {
            error!("Gemini returned {status}: {text}");
            return Err(upstream_error(status.as_u16(), &text));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text).map_err(|e| {
            GenerationError::Upstream(format!("Unreadable Gemini response: {e}"))
        })?;
        parsed.into_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_candidate_text_extracted() {
        let json = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "{\"a\": 1}"}, {"text": "ignored"}]}},
                {"content": {"parts": [{"text": "second"}]}}
            ]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.into_text().unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_blocked_prompt_reports_reason() {
        let json = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let err = response.into_text().unwrap_err();
        assert!(err.to_string().ends_with("Reason: SAFETY"));

        let json = r#"{"candidates": [], "promptFeedback": {"blockReason": "OTHER", "blockReasonMessage": "Blocked for testing"}}"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert!(response
            .into_text()
            .unwrap_err()
            .to_string()
            .ends_with("Reason: Blocked for testing"));
    }

    #[test]
    fn test_invalid_key_detected() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}}"#;
        assert!(matches!(upstream_error(400, body), GenerationError::InvalidApiKey));
    }

    #[test]
    fn test_other_upstream_errors_keep_message() {
        let err = upstream_error(503, "overloaded");
        assert_eq!(
            err.to_string(),
            "An unexpected error occurred: Gemini API returned 503: overloaded"
        );
    }

    #[test]
    fn test_endpoint_built_from_config() {
        let client = GeminiClient::new(&GeminiConfig {
            api_key: "k".into(),
            model: "gemini-1.5-flash".into(),
            api_base: "http://localhost:9000".into(),
        });
        assert_eq!(
            client.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }
}
