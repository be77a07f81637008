//! Public types for the models API
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Deserialize, Debug)]
pub struct ModelsResponse {
    pub models: Vec<String>,
    // Upstream listing as returned by the provider
    pub raw: Value,
}
