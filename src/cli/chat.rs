use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use rustyline::history::History;

use crate::chat::ChatMessage;
use crate::client::{ChatSession, Outcome, ProxyClient, TranscriptStore};
use crate::core::logging::init_tracing;
use crate::openai::Role;

const HELP: &str = "Commands: /topic NAME, /summarize, /clear, /quit";

fn print_message(message: &ChatMessage) {
    let speaker = match message.role {
        Role::Assistant => "AI",
        _ => "You",
    };
    println!("{}: {}", speaker, message.content);
}

fn print_outcome(outcome: &Outcome) {
    if let Outcome::Appended(message) = outcome {
        print_message(message);
    }
}

/// Add a line to the editor's history. Returns whether it was kept.
fn remember_line<H: History>(history: &mut H, line: &str) -> bool {
    if line.is_empty() {
        return false;
    }
    match history.add(line) {
        Ok(added) => added,
        Err(e) => {
            tracing::debug!("History entry not recorded: {}", e);
            false
        }
    }
}

pub async fn run(url: &str, topic: Option<String>, home_path: &str) -> Result<()> {
    init_tracing("warn");
    let mut rl = DefaultEditor::new()?;
    let mut session = ChatSession::new(
        ProxyClient::new(url),
        TranscriptStore::new(home_path),
        topic,
    );

    println!("{}", HELP);
    for message in session.transcript() {
        print_message(message);
    }

    loop {
        let prompt = format!("{}> ", session.topic().unwrap_or(""));
        // Requests are awaited before reading the next line so the
        // transcript only changes between round trips
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                remember_line(rl.history_mut(), line);
                match line.split_once(' ').unwrap_or((line, "")) {
                    ("/quit", _) => break,
                    ("/clear", _) => session.clear(),
                    ("/summarize", _) => print_outcome(&session.summarize().await),
                    ("/topic", name) => {
                        session.switch_topic(name.trim());
                        for message in session.transcript() {
                            print_message(message);
                        }
                    }
                    ("/help", _) => println!("{}", HELP),
                    _ => match session.send(line).await {
                        Ok(outcome) => print_outcome(&outcome),
                        Err(e) => println!("{}", e),
                    },
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rustyline::history::MemHistory;

    use super::*;

    #[test]
    fn test_remember_line() {
        let mut history = MemHistory::new();

        assert!(remember_line(&mut history, "/topic math"));
        assert!(!remember_line(&mut history, "/topic math"));
        assert!(!remember_line(&mut history, ""));
        assert!(remember_line(&mut history, "2+2?"));
        assert_eq!(history.len(), 2);
    }
}
