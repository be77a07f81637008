use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::classify::is_decommissioned_payload;

/// Sampling parameters are fixed for every completion request.
pub const TEMPERATURE: f64 = 0.7;
pub const MAX_TOKENS: u32 = 512;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "user")]
    User,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Message {
            role,
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("No valid model available to complete the request.")]
    NoCandidates,

    #[error("Groq API error {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Request to model '{model}' timed out after {after:?}")]
    Timeout { model: String, after: Duration },

    #[error("Request to Groq failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed response from Groq: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("No content returned from Groq")]
    EmptyCompletion,
}

impl CompletionError {
    /// Only an upstream error body can say the model was retired. Every
    /// other failure is local to this attempt and must not be retried.
    pub fn is_decommissioned(&self) -> bool {
        match self {
            CompletionError::Upstream { body, .. } => is_decommissioned_payload(body),
            _ => false,
        }
    }
}

/// One bounded call to the completion endpoint for a single model.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn attempt(
        &self,
        model: &str,
        messages: &[Message],
        timeout: Duration,
    ) -> Result<String, CompletionError>;
}

// Field order matches what the provider documents for the request body
#[derive(Serialize)]
struct CompletionPayload<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize, Debug)]
pub struct ModelList {
    pub models: Vec<String>,
    pub raw: Value,
}

/// Client for an OpenAI compatible API (Groq by default).
#[derive(Clone, Debug)]
pub struct GroqClient {
    http: reqwest::Client,
    api_hostname: String,
    api_key: String,
}

impl GroqClient {
    pub fn new(api_hostname: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_hostname: api_hostname.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_hostname, path)
    }

    async fn send_completion(
        &self,
        model: &str,
        messages: &[Message],
    ) -> Result<String, CompletionError> {
        let payload = CompletionPayload {
            model,
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        let response = self
            .http
            .post(self.url("/v1/chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(CompletionError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let resp: Value = serde_json::from_str(&body)?;
        resp["choices"][0]["message"]["content"]
            .as_str()
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .map(String::from)
            .ok_or(CompletionError::EmptyCompletion)
    }

    /// List the model IDs available to the configured API key, sorted
    pub async fn list_models(&self) -> Result<ModelList, CompletionError> {
        let response = self
            .http
            .get(self.url("/v1/models"))
            .bearer_auth(&self.api_key)
            .timeout(super::DEFAULT_ATTEMPT_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(CompletionError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let raw: Value = serde_json::from_str(&body)?;
        let mut models: Vec<String> = raw["data"]
            .as_array()
            .map(|data| {
                data.iter()
                    .filter_map(|m| m["id"].as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();
        models.sort();

        Ok(ModelList { models, raw })
    }
}

#[async_trait]
impl ChatCompletion for GroqClient {
    async fn attempt(
        &self,
        model: &str,
        messages: &[Message],
        timeout: Duration,
    ) -> Result<String, CompletionError> {
        // Dropping the inner future on expiry cancels the in-flight
        // request and the timer goes with it
        tokio::time::timeout(timeout, self.send_completion(model, messages))
            .await
            .map_err(|_| CompletionError::Timeout {
                model: model.to_string(),
                after: timeout,
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn messages() -> Vec<Message> {
        vec![
            Message::new(Role::System, "You are a helpful assistant specialized in math."),
            Message::new(Role::User, "2+2?"),
        ]
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_value(Role::Assistant).unwrap(), "assistant");
        assert_eq!(serde_json::to_value(Role::System).unwrap(), "system");
        let role: Role = serde_json::from_str(r#""user""#).unwrap();
        assert_eq!(role, Role::User);
    }

    #[test]
    fn test_payload_serialization() {
        let msgs = vec![Message::new(Role::User, "hi")];
        let payload = CompletionPayload {
            model: "llama-3.1-8b-instant",
            messages: &msgs,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"model":"llama-3.1-8b-instant","messages":[{"role":"user","content":"hi"}],"temperature":0.7,"max_tokens":512}"#
        );
    }

    #[tokio::test]
    async fn test_attempt_returns_trimmed_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::Json(json!({
                "model": "llama-3.1-8b-instant",
                "messages": [
                    {"role": "system", "content": "You are a helpful assistant specialized in math."},
                    {"role": "user", "content": "2+2?"}
                ],
                "temperature": 0.7,
                "max_tokens": 512
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"  4  "}}]}"#)
            .create_async()
            .await;

        let client = GroqClient::new(&server.url(), "test-key");
        let result = client
            .attempt("llama-3.1-8b-instant", &messages(), Duration::from_secs(5))
            .await;

        mock.assert_async().await;
        assert_eq!(result.unwrap(), "4");
    }

    #[tokio::test]
    async fn test_attempt_captures_error_body() {
        let mut server = mockito::Server::new_async().await;
        let body = r#"{"error":{"code":"model_decommissioned","message":"The model has been decommissioned"}}"#;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(400)
            .with_body(body)
            .create_async()
            .await;

        let client = GroqClient::new(&server.url(), "test-key");
        let err = client
            .attempt("gemma-7b-it", &messages(), Duration::from_secs(5))
            .await
            .unwrap_err();

        match &err {
            CompletionError::Upstream { status, body: raw } => {
                assert_eq!(*status, 400);
                assert_eq!(raw, body);
            }
            other => panic!("Expected Upstream error, got {:?}", other),
        }
        assert!(err.is_decommissioned());
    }

    #[tokio::test]
    async fn test_attempt_empty_completion() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"   "}}]}"#)
            .create_async()
            .await;

        let client = GroqClient::new(&server.url(), "test-key");
        let err = client
            .attempt("llama-3.1-8b-instant", &messages(), Duration::from_secs(5))
            .await
            .unwrap_err();

        assert!(matches!(err, CompletionError::EmptyCompletion));
        assert!(!err.is_decommissioned());
    }

    #[tokio::test]
    async fn test_attempt_missing_choices() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let client = GroqClient::new(&server.url(), "test-key");
        let err = client
            .attempt("llama-3.1-8b-instant", &messages(), Duration::from_secs(5))
            .await
            .unwrap_err();

        assert!(matches!(err, CompletionError::EmptyCompletion));
    }

    #[tokio::test]
    async fn test_attempt_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body("decommissioned but not json")
            .create_async()
            .await;

        let client = GroqClient::new(&server.url(), "test-key");
        let err = client
            .attempt("llama-3.1-8b-instant", &messages(), Duration::from_secs(5))
            .await
            .unwrap_err();

        assert!(matches!(err, CompletionError::Malformed(_)));
        assert!(!err.is_decommissioned());
    }

    #[tokio::test]
    async fn test_attempt_times_out() {
        // Accept connections and never answer
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = GroqClient::new(&format!("http://{}", addr), "test-key");
        let started = std::time::Instant::now();
        let err = client
            .attempt("llama-3.1-8b-instant", &messages(), Duration::from_millis(100))
            .await
            .unwrap_err();

        assert!(started.elapsed() < Duration::from_secs(5));
        match &err {
            CompletionError::Timeout { model, after } => {
                assert_eq!(model, "llama-3.1-8b-instant");
                assert_eq!(*after, Duration::from_millis(100));
            }
            other => panic!("Expected Timeout error, got {:?}", other),
        }
        assert!(!err.is_decommissioned());
    }

    #[tokio::test]
    async fn test_list_models_sorted() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/models")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_body(
                r#"{"object":"list","data":[{"id":"qwen/qwen3-32b"},{"id":"llama-3.3-70b-versatile"},{"id":"llama-3.1-8b-instant"}]}"#,
            )
            .create_async()
            .await;

        let client = GroqClient::new(&server.url(), "test-key");
        let list = client.list_models().await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            list.models,
            vec![
                "llama-3.1-8b-instant",
                "llama-3.3-70b-versatile",
                "qwen/qwen3-32b"
            ]
        );
        assert_eq!(list.raw["object"], "list");
    }

    #[tokio::test]
    async fn test_list_models_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/models")
            .with_status(401)
            .with_body(r#"{"error":{"code":"invalid_api_key","message":"Invalid API Key"}}"#)
            .create_async()
            .await;

        let client = GroqClient::new(&server.url(), "bad-key");
        let err = client.list_models().await.unwrap_err();

        assert!(err.to_string().starts_with("Groq API error 401"));
    }
}
