//! Public types for the summarize API
use serde::{Deserialize, Serialize};

use crate::chat::ChatMessage;

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct SummarizeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SummarizeResponse {
    pub summary: String,
}
