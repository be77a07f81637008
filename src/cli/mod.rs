use anyhow::Result;
use clap::{Parser, Subcommand};
use std::env;

pub mod chat;
pub mod models;
pub mod serve;

#[derive(Subcommand)]
enum Command {
    /// Run the chat proxy server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, env = "PORT", default_value = "3000")]
        port: String,
    },
    /// Start an interactive chat session against a running server
    Chat {
        /// Base URL of the chat server
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        url: String,

        /// Topic the assistant specializes in
        #[arg(long)]
        topic: Option<String>,
    },
    /// List the models available to the configured API key
    Models {},
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    let home_path = env::var("TOPIC_CHAT_HOME").unwrap_or("./.topic-chat".to_string());

    // Handle each sub command
    match args.command {
        Some(Command::Serve { host, port }) => {
            serve::run(host, port).await?;
        }
        Some(Command::Chat { url, topic }) => {
            chat::run(&url, topic, &home_path).await?;
        }
        Some(Command::Models {}) => {
            models::run().await?;
        }
        None => {}
    }

    Ok(())
}
