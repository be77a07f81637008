//! Test utilities for integration tests
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use serde_json::Value;
use tower::util::ServiceExt;

use topic_chat::api::AppState;
use topic_chat::api::app;
use topic_chat::core::AppConfig;
use topic_chat::openai::DEFAULT_ATTEMPT_TIMEOUT;

/// Config pointing the completion API at `api_hostname`, usually a
/// `mockito` server.
pub fn test_config(api_hostname: &str) -> AppConfig {
    AppConfig {
        groq_api_key: Some(String::from("test-api-key")),
        groq_model: String::from("llama-3.1-8b-instant"),
        groq_api_hostname: api_hostname.to_string(),
        static_dir: std::env::temp_dir().display().to_string(),
        attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
    }
}

/// Creates a test application router backed by `config`
pub fn test_app_with(config: AppConfig) -> Router {
    app(Arc::new(AppState::new(config)))
}

pub fn test_app(api_hostname: &str) -> Router {
    test_app_with(test_config(api_hostname))
}

/// An app with no API key configured
pub fn test_app_without_key() -> Router {
    test_app_with(AppConfig {
        groq_api_key: None,
        ..test_config("http://127.0.0.1:9")
    })
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

pub async fn post_json(app: Router, uri: &str, payload: Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Status and parsed JSON body of a response
pub async fn json_response(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let body = body_to_string(response.into_body()).await;
    let json = serde_json::from_str(&body).expect("Response body is not JSON");
    (status, json)
}

pub fn completion_body(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "model": "llama-3.1-8b-instant",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

pub const DECOMMISSIONED_BODY: &str = r#"{"error":{"message":"The model `gemma-7b-it` has been decommissioned and is no longer supported.","type":"invalid_request_error","code":"model_decommissioned"}}"#;
