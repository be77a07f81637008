//! Router for the chat API

use std::sync::Arc;

use anyhow::Result;
use axum::{Json, Router, extract::State, routing::post};

use super::public;
use crate::ai::prompt::chat_messages;
use crate::api::public::{ApiError, ApiJson};
use crate::api::state::AppState;
use crate::chat::ChatMessage;
use crate::core::AppConfig;
use crate::openai::{GroqClient, resolve_completion};

type SharedState = Arc<AppState>;

async fn reply_to(
    config: &AppConfig,
    client: &GroqClient,
    topic: &str,
    history: &[ChatMessage],
    user_input: &str,
) -> Result<String> {
    let messages = chat_messages(topic, history, user_input)?;
    let reply = resolve_completion(
        client,
        &config.candidates(),
        &messages,
        config.attempt_timeout,
    )
    .await?;
    Ok(reply)
}

/// Answer the next user message in a topic's conversation
async fn chat_handler(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<public::ChatRequest>,
) -> Result<Json<public::ChatResponse>, ApiError> {
    let topic = payload
        .topic
        .as_deref()
        .filter(|topic| !topic.is_empty())
        .ok_or_else(|| ApiError::bad_request("Please select a topic before chatting."))?;
    let user_input = payload
        .user_input
        .as_deref()
        .filter(|input| !input.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Message cannot be empty."))?;
    let client = state.upstream()?;

    let reply = reply_to(&state.config, client, topic, &payload.history, user_input)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to get response: {}", e)))?;

    Ok(Json(public::ChatResponse { reply }))
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", post(chat_handler))
}
