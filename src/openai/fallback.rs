use std::time::Duration;

use itertools::Itertools;

use super::core::{ChatCompletion, CompletionError, Message};

pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(25);

/// Models tried after the configured default, in priority order.
pub const FALLBACK_MODELS: &[&str] = &[
    "llama-3.1-8b-instant",
    "llama-3.3-70b-versatile",
    "qwen/qwen3-32b",
    "moonshotai/kimi-k2-instruct",
];

/// Builds the ordered candidate list: the configured model first,
/// then the fallbacks. Blank and repeated IDs are dropped, keeping the
/// first occurrence.
pub fn fallback_candidates(configured: &str, fallbacks: &[&str]) -> Vec<String> {
    std::iter::once(configured)
        .chain(fallbacks.iter().copied())
        .filter(|model| !model.is_empty())
        .unique()
        .map(String::from)
        .collect()
}

/// Outcome of a single candidate call
#[derive(Debug)]
pub enum Attempt {
    Success(String),
    Retryable(CompletionError),
    Fatal(CompletionError),
}

impl From<Result<String, CompletionError>> for Attempt {
    fn from(result: Result<String, CompletionError>) -> Self {
        match result {
            Ok(text) => Attempt::Success(text),
            Err(err) if err.is_decommissioned() => Attempt::Retryable(err),
            Err(err) => Attempt::Fatal(err),
        }
    }
}

/// Tries each candidate in order until one succeeds. A decommissioned
/// model moves on to the next candidate. Any other failure is returned
/// as is without trying the rest. If every candidate was
/// decommissioned the last of those errors is returned.
pub async fn resolve_completion<C>(
    backend: &C,
    candidates: &[String],
    messages: &[Message],
    timeout: Duration,
) -> Result<String, CompletionError>
where
    C: ChatCompletion + ?Sized,
{
    let mut last_error = None;

    for model in candidates {
        match Attempt::from(backend.attempt(model, messages, timeout).await) {
            Attempt::Success(text) => {
                tracing::debug!("Completion succeeded with model '{}'", model);
                return Ok(text);
            }
            Attempt::Retryable(err) => {
                tracing::warn!("Model '{}' is decommissioned. Trying next fallback...", model);
                last_error = Some(err);
            }
            Attempt::Fatal(err) => return Err(err),
        }
    }

    Err(last_error.unwrap_or(CompletionError::NoCandidates))
}
