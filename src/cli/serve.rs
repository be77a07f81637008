use anyhow::Result;

use crate::api;
use crate::core::AppConfig;
use crate::core::logging::{init_tracing, server_directives};

pub async fn run(host: String, port: String) -> Result<()> {
    // Logging comes first so config warnings are visible
    init_tracing(&server_directives());
    let config = AppConfig::default();
    api::serve(host, port, config).await
}
