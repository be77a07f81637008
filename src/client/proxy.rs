use anyhow::{Result, bail};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::api::public::ErrorResponse;
use crate::api::public::chat::{ChatRequest, ChatResponse};
use crate::api::public::summarize::{SummarizeRequest, SummarizeResponse};
use crate::chat::ChatMessage;

/// HTTP client for the chat proxy's API
#[derive(Clone, Debug)]
pub struct ProxyClient {
    http: reqwest::Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post<Req, Resp>(&self, path: &str, payload: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            // Prefer the proxy's own explanation when it gave one
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| "Request failed".to_string());
            bail!(message);
        }

        Ok(serde_json::from_str(&body)?)
    }

    pub async fn chat(
        &self,
        topic: &str,
        history: &[ChatMessage],
        user_input: &str,
    ) -> Result<String> {
        let payload = ChatRequest {
            topic: Some(topic.to_string()),
            history: history.to_vec(),
            user_input: Some(user_input.to_string()),
        };
        let resp: ChatResponse = self.post("/api/chat", &payload).await?;
        Ok(resp.reply)
    }

    pub async fn summarize(&self, topic: Option<&str>, history: &[ChatMessage]) -> Result<String> {
        let payload = SummarizeRequest {
            topic: topic.map(String::from),
            history: history.to_vec(),
        };
        let resp: SummarizeResponse = self.post("/api/summarize", &payload).await?;
        Ok(resp.summary)
    }
}
