use anyhow::Result;
use topic_chat::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
