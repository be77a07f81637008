//! Router for the models API

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};

use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;

type SharedState = Arc<AppState>;

/// List the model IDs available to the configured API key
async fn models_handler(
    State(state): State<SharedState>,
) -> Result<Json<public::ModelsResponse>, ApiError> {
    let client = state.upstream()?;
    let list = client
        .list_models()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(public::ModelsResponse {
        models: list.models,
        raw: list.raw,
    }))
}

/// Create the models router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", get(models_handler))
}
