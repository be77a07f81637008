use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::chat::ChatMessage;

/// Result of a best-effort write. Saving a transcript is never allowed
/// to fail a chat turn so callers inspect this and move on.
#[derive(Debug, PartialEq)]
pub enum Persisted {
    Saved,
    Ignored(String),
}

/// Stores one JSON transcript file per topic under a directory
#[derive(Clone, Debug)]
pub struct TranscriptStore {
    dir: PathBuf,
}

impl TranscriptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage key for a topic, `chat_history_none` without one
    pub fn key(topic: Option<&str>) -> String {
        let topic = topic.filter(|t| !t.is_empty()).unwrap_or("none");
        format!("chat_history_{}", topic)
    }

    fn path(&self, topic: Option<&str>) -> PathBuf {
        // Percent-encoding keeps distinct topics in distinct files and
        // turns path separators into `%2F`
        let file_name = urlencoding::encode(&Self::key(topic)).into_owned();
        self.dir.join(format!("{}.json", file_name))
    }

    /// Load a topic's transcript. Missing or unreadable data is an
    /// empty transcript.
    pub fn load(&self, topic: Option<&str>) -> Vec<ChatMessage> {
        fs::read_to_string(self.path(topic))
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    pub fn save(&self, topic: Option<&str>, transcript: &[ChatMessage]) -> Persisted {
        match self.try_save(topic, transcript) {
            Ok(()) => Persisted::Saved,
            Err(e) => Persisted::Ignored(e.to_string()),
        }
    }

    fn try_save(&self, topic: Option<&str>, transcript: &[ChatMessage]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let raw = serde_json::to_string(transcript)?;
        fs::write(self.path(topic), raw)?;
        Ok(())
    }
}
