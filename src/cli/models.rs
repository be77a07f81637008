use anyhow::{Result, anyhow};

use crate::core::AppConfig;
use crate::core::logging::init_tracing;
use crate::openai::GroqClient;

pub async fn run() -> Result<()> {
    init_tracing("warn");
    let config = AppConfig::default();
    let api_key = config
        .groq_api_key
        .as_deref()
        .ok_or(anyhow!("Missing env var GROQ_API_KEY"))?;

    let client = GroqClient::new(&config.groq_api_hostname, api_key);
    let list = client.list_models().await?;
    for model in list.models {
        println!("{}", model);
    }

    Ok(())
}
