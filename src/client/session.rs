use anyhow::{Result, anyhow};

use super::proxy::ProxyClient;
use super::store::{Persisted, TranscriptStore};
use crate::chat::ChatMessage;
use crate::openai::Role;

/// What a chat action added to the transcript
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// Nothing was sent
    Skipped,
    /// The assistant's answer, or an apology when the request failed
    Appended(ChatMessage),
}

/// A topic and its transcript. Every change is written back to the
/// store on a best-effort basis.
pub struct ChatSession {
    proxy: ProxyClient,
    store: TranscriptStore,
    topic: Option<String>,
    transcript: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(proxy: ProxyClient, store: TranscriptStore, topic: Option<String>) -> Self {
        let transcript = store.load(topic.as_deref());
        Self {
            proxy,
            store,
            topic,
            transcript,
        }
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    fn persist(&self) {
        if let Persisted::Ignored(reason) = self.store.save(self.topic(), &self.transcript) {
            tracing::debug!("Transcript not saved: {}", reason);
        }
    }

    fn append(&mut self, message: ChatMessage) -> Outcome {
        self.transcript.push(message.clone());
        self.persist();
        Outcome::Appended(message)
    }

    /// Switch to another topic and pick up where that conversation
    /// left off
    pub fn switch_topic(&mut self, topic: &str) {
        self.topic = Some(topic.to_string()).filter(|t| !t.is_empty());
        self.transcript = self.store.load(self.topic());
    }

    pub fn clear(&mut self) {
        self.transcript.clear();
        self.persist();
    }

    /// Send the next user message. Failures talking to the proxy end up
    /// in the transcript as an assistant message rather than an error.
    pub async fn send(&mut self, input: &str) -> Result<Outcome> {
        let user_input = input.trim();
        let topic = self
            .topic
            .clone()
            .ok_or_else(|| anyhow!("Please select a topic before sending a message."))?;
        if user_input.is_empty() {
            return Ok(Outcome::Skipped);
        }

        self.transcript.push(ChatMessage::now(Role::User, user_input));
        self.persist();

        let content = match self.proxy.chat(&topic, &self.transcript, user_input).await {
            Ok(reply) => reply,
            Err(e) => format!("Sorry, I ran into an issue: {}", e),
        };

        Ok(self.append(ChatMessage::now(Role::Assistant, &content)))
    }

    /// Ask for a summary of the conversation and add it to the
    /// transcript
    pub async fn summarize(&mut self) -> Outcome {
        if self.transcript.is_empty() {
            return Outcome::Skipped;
        }

        let content = match self.proxy.summarize(self.topic(), &self.transcript).await {
            Ok(summary) => summary,
            Err(e) => format!("Could not summarize: {}", e),
        };

        self.append(ChatMessage::now(Role::Assistant, &content))
    }
}
