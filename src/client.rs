use log::{debug, error};
use serde_json::Value;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

use crate::types::{OptimizedPrompts, UserGoal};

pub const GENERATE_ENDPOINT: &str = "/generate-prompts/";
pub const FALLBACK_ERROR: &str = "An unexpected error occurred. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Non-2xx answer; the message is already user-facing.
    #[error("{0}")]
    Server(String),
    #[error("{0}")]
    Network(String),
    #[error("Failed to read server response: {0}")]
    Decode(String),
}

/// Builds the banner text for a failed response.
///
/// `body` is the raw response text; it may not be JSON at all.
pub fn server_error_message(status: u16, status_text: &str, body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Err(_) => format!("Server Error: {status}"),
        Ok(value) => match value.get("detail").and_then(Value::as_str) {
            Some(detail) if !detail.is_empty() => detail.to_string(),
            _ => format!("Server Error: {status} - {status_text}"),
        },
    }
}

fn js_error_message(err: &JsValue) -> String {
    err.dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| FALLBACK_ERROR.to_string())
}

async fn text_of(response: &Response) -> Result<String, JsValue> {
    let text = JsFuture::from(response.text()?).await?;
    Ok(text.as_string().unwrap_or_default())
}

pub async fn generate_prompts(goal: &str) -> Result<OptimizedPrompts, ClientError> {
    let window = web_sys::window().ok_or_else(|| ClientError::Network(FALLBACK_ERROR.to_string()))?;

    let body = serde_json::to_string(&UserGoal {
        goal: goal.to_string(),
    })
    .map_err(|e| ClientError::Decode(e.to_string()))?;

    let headers = Headers::new().map_err(|e| ClientError::Network(js_error_message(&e)))?;
    headers
        .set("Content-Type", "application/json")
        .map_err(|e| ClientError::Network(js_error_message(&e)))?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_headers(&headers);
    init.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(GENERATE_ENDPOINT, &init)
        .map_err(|e| ClientError::Network(js_error_message(&e)))?;

    debug!("POST {GENERATE_ENDPOINT}");
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| {
            error!("Fetch error: {e:?}");
            ClientError::Network(js_error_message(&e))
        })?
        .dyn_into()
        .map_err(|e| ClientError::Network(js_error_message(&e)))?;

    let text = text_of(&response)
        .await
        .map_err(|e| ClientError::Decode(js_error_message(&e)))?;

    if !response.ok() {
        let message = server_error_message(response.status(), &response.status_text(), &text);
        error!("Prompt generation failed: {message}");
        return Err(ClientError::Server(message));
    }

    serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_preferred() {
        let msg = server_error_message(400, "Bad Request", r#"{"detail": "User goal cannot be empty."}"#);
        assert_eq!(msg, "User goal cannot be empty.");
    }

    #[test]
    fn test_json_without_detail_uses_status_text() {
        assert_eq!(
            server_error_message(502, "Bad Gateway", r#"{"error": "upstream"}"#),
            "Server Error: 502 - Bad Gateway"
        );
        assert_eq!(
            server_error_message(422, "Unprocessable Entity", r#"{"detail": [{"loc": ["body"]}]}"#),
            "Server Error: 422 - Unprocessable Entity"
        );
    }

    #[test]
    fn test_non_object_json_uses_status_text() {
        assert_eq!(
            server_error_message(500, "Internal Server Error", r#"["boom"]"#),
            "Server Error: 500 - Internal Server Error"
        );
        assert_eq!(
            server_error_message(500, "Internal Server Error", r#""oops""#),
            "Server Error: 500 - Internal Server Error"
        );
        assert_eq!(
            server_error_message(400, "Bad Request", r#"{"detail": ""}"#),
            "Server Error: 400 - Bad Request"
        );
    }

    #[test]
    fn test_unparseable_body_uses_status_only() {
        assert_eq!(
            server_error_message(500, "Internal Server Error", "<html>oops</html>"),
            "Server Error: 500"
        );
        assert_eq!(server_error_message(503, "", ""), "Server Error: 503");
    }

    #[test]
    fn test_client_error_display_is_message() {
        let err = ClientError::Server("Invalid Gemini API Key. Please check your configuration.".into());
        assert_eq!(
            err.to_string(),
            "Invalid Gemini API Key. Please check your configuration."
        );
    }
}
