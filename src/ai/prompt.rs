//! Prompts using Handlebars for templating. Handlebars adds
//! additional security controls since it can't do much out of the box
//! without registering your own helpers. Transcripts come from the
//! client and should be considered untrusted.
//!
//! Output goes to the completion API as plain text so HTML escaping is
//! turned off.

use std::fmt;

use anyhow::Result;
use handlebars::{Handlebars, no_escape};
use serde_json::json;

use crate::chat::ChatMessage;
use crate::openai::{Message, Role};

/// Topic used for summaries when the client didn't pick one
pub const DEFAULT_SUMMARY_TOPIC: &str = "general topics";

#[derive(Debug)]
pub enum Prompt {
    TopicSystem,
    ChatTurn,
    Summary,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

const TOPIC_SYSTEM_PROMPT: &str = "You are a helpful assistant specialized in {{topic}}.";

const CHAT_TURN_PROMPT: &str = "Here is the conversation so far:\n{{conversation}}\n\nRespond helpfully to the latest user message: {{user_input}}";

const SUMMARY_PROMPT: &str = "Summarize the following conversation briefly and clearly so a newcomer can catch up:\n{{conversation}}";

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry.register_escape_fn(no_escape);
    registry
        .register_template_string(&Prompt::TopicSystem.to_string(), TOPIC_SYSTEM_PROMPT)
        .expect("Failed to register template");
    registry
        .register_template_string(&Prompt::ChatTurn.to_string(), CHAT_TURN_PROMPT)
        .expect("Failed to register template");
    registry
        .register_template_string(&Prompt::Summary.to_string(), SUMMARY_PROMPT)
        .expect("Failed to register template");
    registry
}

/// Flatten a transcript into `Role: content` lines in transcript
/// order. Anything that isn't the assistant is shown as the user.
pub fn format_history(history: &[ChatMessage]) -> String {
    history
        .iter()
        .map(|m| {
            let speaker = match m.role {
                Role::Assistant => "Assistant",
                _ => "User",
            };
            format!("{}: {}", speaker, m.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn system_message(registry: &Handlebars, topic: &str) -> Result<Message> {
    let content = registry.render(&Prompt::TopicSystem.to_string(), &json!({ "topic": topic }))?;
    Ok(Message::new(Role::System, &content))
}

/// Messages for the next turn of a chat about `topic`
pub fn chat_messages(topic: &str, history: &[ChatMessage], user_input: &str) -> Result<Vec<Message>> {
    let registry = templates();
    let content = registry.render(
        &Prompt::ChatTurn.to_string(),
        &json!({
            "conversation": format_history(history),
            "user_input": user_input,
        }),
    )?;

    Ok(vec![
        system_message(&registry, topic)?,
        Message::new(Role::User, &content),
    ])
}

/// Messages asking for a short summary of the transcript
pub fn summary_messages(topic: Option<&str>, history: &[ChatMessage]) -> Result<Vec<Message>> {
    let registry = templates();
    let topic = topic
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_SUMMARY_TOPIC);
    let content = registry.render(
        &Prompt::Summary.to_string(),
        &json!({ "conversation": format_history(history) }),
    )?;

    Ok(vec![
        system_message(&registry, topic)?,
        Message::new(Role::User, &content),
    ])
}
