//! The prompt-engineering instructions sent to the model and the parser for
//! what comes back.

use http::StatusCode;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::types::OptimizedPrompts;

pub const NOT_APPLICABLE_CODE: &str = "Not applicable for code generation.";

const USER_INPUT_PLACEHOLDER: &str = "{{user_input}}";

pub const PROMPT_ENGINEERING_INSTRUCTIONS: &str = r#"
You are an expert AI prompt engineer. Given a user goal or topic, return:

1.  A strong prompt for text generation (e.g., for models like Gemini, ChatGPT). This prompt should be detailed, provide context, and guide the AI towards a specific, high-quality output.
2.  A creative and descriptive prompt for image generation (e.g., for models like Midjourney, DALL·E, Stable Diffusion). This prompt should use vivid language, specify artistic style, mood, composition, and relevant details.
3.  A code-related prompt if the user's goal is clearly related to software development, programming, or scripting. If not applicable, state "Not applicable for code generation."
4.  Two variations of the above three prompts (text, image, and code if applicable).
    * Variation 1: Change the tone to be more formal and academic.
    * Variation 2: Change the style to be more experimental and abstract.

Format your entire response as a single, valid JSON object with the following keys:
"text_prompt": "...",
"image_prompt": "...",
"code_prompt": "..." OR "Not applicable for code generation.",
"variation1_text_prompt": "...",
"variation1_image_prompt": "...",
"variation1_code_prompt": "..." OR "Not applicable for code generation.",
"variation2_text_prompt": "...",
"variation2_image_prompt": "...",
"variation2_code_prompt": "..." OR "Not applicable for code generation."

Ensure the JSON is well-formed and can be directly parsed. Do not include any explanatory text outside of the JSON structure.

User goal: "{{user_input}}"
"#;

const EXPECTED_KEYS: [&str; 9] = [
    "text_prompt",
    "image_prompt",
    "code_prompt",
    "variation1_text_prompt",
    "variation1_image_prompt",
    "variation1_code_prompt",
    "variation2_text_prompt",
    "variation2_image_prompt",
    "variation2_code_prompt",
];

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("User goal cannot be empty.")]
    EmptyGoal,
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    #[error("Invalid Gemini API Key. Please check your configuration.")]
    InvalidApiKey,
    #[error(
        "Failed to generate prompts. The response from the generative model was empty or did not contain text.{}",
        reason_suffix(.block_reason)
    )]
    EmptyResponse { block_reason: Option<String> },
    #[error("Error parsing Gemini response as JSON. Raw response: {raw}")]
    MalformedJson { raw: String },
    #[error("Gemini response missing expected key: {key}. Response: {response}")]
    MissingKey { key: &'static str, response: String },
    #[error("Gemini response has an invalid value for key: {key}. Response: {response}")]
    InvalidValue { key: &'static str, response: String },
    #[error("An unexpected error occurred: {0}")]
    Upstream(String),
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|r| format!(" Reason: {r}"))
        .unwrap_or_default()
}

impl GenerationError {
    pub fn status(&self) -> StatusCode {
        match self {
            GenerationError::EmptyGoal => StatusCode::BAD_REQUEST,
            GenerationError::Rejected { status, .. } => *status,
            GenerationError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            GenerationError::EmptyResponse { .. }
            | GenerationError::MalformedJson { .. }
            | GenerationError::MissingKey { .. }
            | GenerationError::InvalidValue { .. }
            | GenerationError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub fn render_instructions(goal: &str) -> String {
    PROMPT_ENGINEERING_INSTRUCTIONS.replace(USER_INPUT_PLACEHOLDER, goal)
}

/// Drops a surrounding Markdown code fence (```` ```json ```` or bare ```` ``` ````).
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let inner = match text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    {
        Some(rest) => rest,
        None => return text,
    };
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn is_code_key(key: &str) -> bool {
    key.ends_with("code_prompt")
}

fn field(
    data: &Map<String, Value>,
    key: &'static str,
) -> Result<Option<String>, GenerationError> {
    let response = || Value::Object(data.clone()).to_string();
    match (data.get(key), is_code_key(key)) {
        (None, true) | (Some(Value::Null), true) => Ok(None),
        (None, false) => Err(GenerationError::MissingKey {
            key,
            response: response(),
        }),
        (Some(Value::String(s)), true) if s == NOT_APPLICABLE_CODE => Ok(None),
        (Some(Value::String(s)), _) => Ok(Some(s.clone())),
        (Some(_), _) => Err(GenerationError::InvalidValue {
            key,
            response: response(),
        }),
    }
}

/// Turns the model's raw text into the API response.
///
/// Code prompts that are missing, `null`, or "Not applicable" become `None`;
/// every other key is required.
pub fn parse_prompts(raw: &str) -> Result<OptimizedPrompts, GenerationError> {
    let cleaned = strip_code_fence(raw);
    let data = match serde_json::from_str::<Value>(cleaned) {
        Ok(Value::Object(map)) => map,
        _ => {
            return Err(GenerationError::MalformedJson {
                raw: cleaned.to_string(),
            })
        }
    };

    let mut values = EXPECTED_KEYS
        .iter()
        .map(|key| field(&data, key))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter();
    let mut next = || values.next().flatten();

    Ok(OptimizedPrompts {
        text_prompt: next(),
        image_prompt: next(),
        code_prompt: next(),
        variation1_text_prompt: next(),
        variation1_image_prompt: next(),
        variation1_code_prompt: next(),
        variation2_text_prompt: next(),
        variation2_image_prompt: next(),
        variation2_code_prompt: next(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_output(code: &str) -> String {
        format!(
            r#"{{
                "text_prompt": "Write a story",
                "image_prompt": "A lighthouse at dusk",
                "code_prompt": {code},
                "variation1_text_prompt": "Compose a scholarly narrative",
                "variation1_image_prompt": "A formal study of a lighthouse",
                "variation1_code_prompt": {code},
                "variation2_text_prompt": "Fragments of light",
                "variation2_image_prompt": "Abstract beams",
                "variation2_code_prompt": {code}
            }}"#
        )
    }

    #[test]
    fn test_instructions_embed_goal() {
        let rendered = render_instructions("a haiku about ferris");
        assert!(rendered.contains(r#"User goal: "a haiku about ferris""#));
        assert!(!rendered.contains(USER_INPUT_PLACEHOLDER));
    }

    #[test]
    fn test_strip_json_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("  ```\n{}\n```  "), "{}");
        assert_eq!(strip_code_fence("{\"plain\": true}"), "{\"plain\": true}");
    }

    #[test]
    fn test_parse_fenced_output() {
        let raw = format!("```json\n{}\n```", model_output(r#""Write a CLI in Rust""#));
        let prompts = parse_prompts(&raw).unwrap();
        assert_eq!(prompts.text_prompt.as_deref(), Some("Write a story"));
        assert_eq!(prompts.variation2_code_prompt.as_deref(), Some("Write a CLI in Rust"));
    }

    #[test]
    fn test_not_applicable_code_becomes_none() {
        let raw = model_output(r#""Not applicable for code generation.""#);
        let prompts = parse_prompts(&raw).unwrap();
        assert_eq!(prompts.code_prompt, None);
        assert_eq!(prompts.variation1_code_prompt, None);
        assert_eq!(prompts.variation2_code_prompt, None);
        assert!(prompts.image_prompt.is_some());
    }

    #[test]
    fn test_missing_code_keys_allowed() {
        let raw = r#"{
            "text_prompt": "t", "image_prompt": "i",
            "variation1_text_prompt": "t1", "variation1_image_prompt": "i1",
            "variation2_text_prompt": "t2", "variation2_image_prompt": "i2"
        }"#;
        let prompts = parse_prompts(raw).unwrap();
        assert_eq!(prompts.code_prompt, None);
        assert_eq!(prompts.variation2_image_prompt.as_deref(), Some("i2"));
    }

    #[test]
    fn test_missing_text_key_is_error() {
        let raw = r#"{"text_prompt": "t"}"#;
        let err = parse_prompts(raw).unwrap_err();
        assert!(matches!(err, GenerationError::MissingKey { key: "image_prompt", .. }));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err
            .to_string()
            .starts_with("Gemini response missing expected key: image_prompt. Response: "));
    }

    #[test]
    fn test_malformed_json_reports_raw_text() {
        let err = parse_prompts("Sure! Here are your prompts").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error parsing Gemini response as JSON. Raw response: Sure! Here are your prompts"
        );
        assert!(matches!(parse_prompts("[1, 2]"), Err(GenerationError::MalformedJson { .. })));
    }

    #[test]
    fn test_non_string_value_rejected() {
        let raw = model_output("42");
        assert!(matches!(
            parse_prompts(&raw),
            Err(GenerationError::InvalidValue { key: "code_prompt", .. })
        ));
    }

    #[test]
    fn test_error_statuses_and_messages() {
        assert_eq!(GenerationError::EmptyGoal.status(), StatusCode::BAD_REQUEST);
        assert_eq!(GenerationError::InvalidApiKey.status(), StatusCode::UNAUTHORIZED);

        let blocked = GenerationError::EmptyResponse {
            block_reason: Some("SAFETY".into()),
        };
        assert!(blocked.to_string().ends_with("did not contain text. Reason: SAFETY"));
        let empty = GenerationError::EmptyResponse { block_reason: None };
        assert!(empty.to_string().ends_with("did not contain text."));
    }
}
