use std::env;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::openai::{DEFAULT_ATTEMPT_TIMEOUT, FALLBACK_MODELS, fallback_candidates};

pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_API_HOSTNAME: &str = "https://api.groq.com/openai";

// Model IDs Groq has retired. Configuring one of these would fail every
// request before the fallbacks kick in.
static DEPRECATED_MODEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)gemma|^llama3-8b-8192$|^llama3-70b-8192$")
        .expect("Invalid deprecated model pattern")
});

/// Replace known deprecated model IDs with the default model
pub fn sanitize_model(model: &str) -> String {
    if DEPRECATED_MODEL.is_match(model) {
        tracing::warn!(
            "Configured GROQ_MODEL='{}' appears deprecated; using '{}'",
            model,
            DEFAULT_MODEL
        );
        return DEFAULT_MODEL.to_string();
    }
    model.to_string()
}

/// Built once at startup and shared read-only with every request.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub groq_api_key: Option<String>,
    pub groq_model: String,
    pub groq_api_hostname: String,
    pub static_dir: String,
    pub attempt_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        let groq_api_key = env::var("GROQ_API_KEY").ok().filter(|k| !k.is_empty());
        let groq_model = env::var("GROQ_MODEL")
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let groq_api_hostname =
            env::var("GROQ_API_HOSTNAME").unwrap_or_else(|_| DEFAULT_API_HOSTNAME.to_string());
        let static_dir =
            env::var("TOPIC_CHAT_STATIC_DIR").unwrap_or_else(|_| "./public".to_string());

        Self {
            groq_api_key,
            groq_model: sanitize_model(&groq_model),
            groq_api_hostname,
            static_dir,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }
}

impl AppConfig {
    /// Models to try for a completion, configured model first
    pub fn candidates(&self) -> Vec<String> {
        fallback_candidates(&self.groq_model, FALLBACK_MODELS)
    }
}
