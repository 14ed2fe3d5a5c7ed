use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;

use tracing::info;

use relay::{AppConfig, Logger, RelayServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = Arc::new(AppConfig::parse());

    // guards are kept alive to flush logs and maintain the sentry connection
    let _guards = Logger::init(config.cargo_env, config.sentry_dsn.clone());

    info!("logger and env prepped...");

    match config.forward_proxy_url.as_deref() {
        Some(_) => info!("outbound fetches will tunnel through the configured forward proxy"),
        None => info!("no forward proxy configured, outbound fetches go direct"),
    }

    RelayServer::serve(config)
        .await
        .context("relay server failed to start")?;

    Ok(())
}
