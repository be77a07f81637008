//! API routes module

pub mod chat;
pub mod models;
pub mod summarize;

use std::sync::Arc;

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<AppState>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Chat turn
        .nest("/chat", chat::router())
        // Transcript summary
        .nest("/summarize", summarize::router())
        // Upstream model listing
        .nest("/models", models::router())
}
