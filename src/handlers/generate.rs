use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use log::{error, info};

use crate::prompts::GenerationError;
use crate::services::{generate_prompts, SharedModel};
use crate::types::{ApiErrorBody, OptimizedPrompts, UserGoal};

pub const GENERATE_PROMPTS_PATH: &str = "/generate-prompts/";

impl IntoResponse for GenerationError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ApiErrorBody {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub async fn generate_prompts_handler(
    State(model): State<SharedModel>,
    payload: Result<Json<UserGoal>, JsonRejection>,
) -> Result<Json<OptimizedPrompts>, GenerationError> {
    let Json(user_goal) = payload.map_err(|rejection| GenerationError::Rejected {
        status: rejection.status(),
        message: rejection.body_text(),
    })?;

    info!("Prompt generation requested");

    match generate_prompts(model.as_ref(), &user_goal.goal).await {
        Ok(prompts) => Ok(Json(prompts)),
        Err(e) => {
            error!("Prompt generation failed: {e}");
            Err(e)
        }
    }
}

pub fn routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    SharedModel: FromRef<S>,
{
    Router::new().route(GENERATE_PROMPTS_PATH, post(generate_prompts_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::PromptModel;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use http::{header, Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct Canned(Result<&'static str, fn() -> GenerationError>);

    #[async_trait]
    impl PromptModel for Canned {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            self.0.map(str::to_string).map_err(|make| make())
        }
    }

    const FULL_RESPONSE: &str = r#"{
        "text_prompt": "t", "image_prompt": "i", "code_prompt": "Not applicable for code generation.",
        "variation1_text_prompt": "t1", "variation1_image_prompt": "i1", "variation1_code_prompt": "c1",
        "variation2_text_prompt": "t2", "variation2_image_prompt": "i2", "variation2_code_prompt": null
    }"#;

    fn app(model: Canned) -> Router {
        let shared: SharedModel = Arc::new(model);
        routes().with_state(shared)
    }

    async fn post_json(app: Router, body: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(GENERATE_PROMPTS_PATH)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_returns_prompts() {
        let (status, body) = post_json(app(Canned(Ok(FULL_RESPONSE))), r#"{"goal": "a poem"}"#).await;
        assert_eq!(status, StatusCode::OK);
        let prompts: OptimizedPrompts = serde_json::from_value(body).unwrap();
        assert_eq!(prompts.text_prompt.as_deref(), Some("t"));
        assert_eq!(prompts.code_prompt, None);
        assert_eq!(prompts.variation1_code_prompt.as_deref(), Some("c1"));
    }

    #[tokio::test]
    async fn test_empty_goal_is_bad_request() {
        let (status, body) = post_json(app(Canned(Ok(FULL_RESPONSE))), r#"{"goal": "   "}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "User goal cannot be empty.");
    }

    #[tokio::test]
    async fn test_invalid_key_is_unauthorized() {
        let (status, body) =
            post_json(app(Canned(Err(|| GenerationError::InvalidApiKey))), r#"{"goal": "x"}"#).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body["detail"],
            "Invalid Gemini API Key. Please check your configuration."
        );
    }

    #[tokio::test]
    async fn test_unparseable_model_output_is_server_error() {
        let (status, body) = post_json(app(Canned(Ok("not json"))), r#"{"goal": "x"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["detail"],
            "Error parsing Gemini response as JSON. Raw response: not json"
        );
    }

    #[tokio::test]
    async fn test_malformed_body_answered_with_detail() {
        let (status, body) = post_json(app(Canned(Ok(FULL_RESPONSE))), r#"{"objective": "x"}"#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].as_str().is_some_and(|d| !d.is_empty()));
    }
}
