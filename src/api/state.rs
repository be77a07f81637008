use crate::api::public::ApiError;
use crate::core::AppConfig;
use crate::openai::GroqClient;

pub struct AppState {
    pub config: AppConfig,
    // Only present when an API key is configured
    upstream: Option<GroqClient>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let upstream = config
            .groq_api_key
            .as_deref()
            .map(|key| GroqClient::new(&config.groq_api_hostname, key));
        Self { config, upstream }
    }

    /// Client for the completion API or a 500 when the server has no
    /// credential to call it with
    pub fn upstream(&self) -> Result<&GroqClient, ApiError> {
        self.upstream.as_ref().ok_or_else(ApiError::missing_credential)
    }
}
