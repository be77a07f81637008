use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::openai::Role;

/// One entry in a topic's transcript. `ts` travels as epoch
/// milliseconds, the way browsers produce it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub ts: Option<DateTime<Utc>>,
}

impl ChatMessage {
    pub fn new(role: Role, content: &str) -> Self {
        Self {
            role,
            content: content.to_string(),
            ts: None,
        }
    }

    /// New message stamped with the current time
    pub fn now(role: Role, content: &str) -> Self {
        Self {
            ts: Some(Utc::now()),
            ..Self::new(role, content)
        }
    }
}
