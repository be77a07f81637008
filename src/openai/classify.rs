//! Detects provider errors reporting that a model was retired.
//!
//! Anything that can't be read with confidence is reported as "not
//! decommissioned" and reaches the caller instead of being retried.

use serde_json::Value;

const DECOMMISSIONED_CODE: &str = "model_decommissioned";
const DECOMMISSIONED_PHRASE: &str = "decommissioned";

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Returns true when a raw error body says the requested model is no
/// longer served. Expects the `{"error": {"code", "message"}}` envelope
/// and falls back to a plain text match when the body isn't JSON.
pub fn is_decommissioned_payload(payload: &str) -> bool {
    match serde_json::from_str::<Value>(payload) {
        Ok(value) => {
            let code = value["error"]["code"].as_str().unwrap_or_default();
            let message = value["error"]["message"].as_str().unwrap_or_default();
            contains_ignore_case(code, DECOMMISSIONED_CODE)
                || contains_ignore_case(message, DECOMMISSIONED_PHRASE)
        }
        Err(_) => contains_ignore_case(payload, DECOMMISSIONED_PHRASE),
    }
}
