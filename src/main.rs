// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use fabstir_avatar_node::api::start_server;
use fabstir_avatar_node::config::NodeConfig;
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚀 Starting Fabstir Avatar Node...\n");
    println!("📦 BUILD VERSION: {}", fabstir_avatar_node::version::VERSION);
    println!("📅 Build Date: {}", fabstir_avatar_node::version::BUILD_DATE);
    println!();

    let config = NodeConfig::from_env();
    tracing::info!(
        "Configuration: port={}, model={}, upstream={}",
        config.api_port,
        config.gemini.model,
        config.gemini.base_url
    );
    if config.gemini.api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; the node starts degraded");
    }

    start_server(config).await
}
