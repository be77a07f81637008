//! Router for the summarize API

use std::sync::Arc;

use anyhow::Result;
use axum::{Json, Router, extract::State, routing::post};

use super::public;
use crate::ai::prompt::summary_messages;
use crate::api::public::{ApiError, ApiJson};
use crate::api::state::AppState;
use crate::chat::ChatMessage;
use crate::core::AppConfig;
use crate::openai::{GroqClient, resolve_completion};

type SharedState = Arc<AppState>;

async fn summarize(
    config: &AppConfig,
    client: &GroqClient,
    topic: Option<&str>,
    history: &[ChatMessage],
) -> Result<String> {
    let messages = summary_messages(topic, history)?;
    let summary = resolve_completion(
        client,
        &config.candidates(),
        &messages,
        config.attempt_timeout,
    )
    .await?;
    Ok(summary)
}

/// Summarize a transcript so someone new can catch up
async fn summarize_handler(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<public::SummarizeRequest>,
) -> Result<Json<public::SummarizeResponse>, ApiError> {
    let client = state.upstream()?;

    let summary = summarize(
        &state.config,
        client,
        payload.topic.as_deref(),
        &payload.history,
    )
    .await
    .map_err(|e| ApiError::internal(format!("Failed to summarize: {}", e)))?;

    Ok(Json(public::SummarizeResponse { summary }))
}

/// Create the summarize router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", post(summarize_handler))
}
