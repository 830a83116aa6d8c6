//! `prompt-manager-server`: serves the prompt store over HTTP.
//!
//! Usage: `prompt-manager-server [CONFIG.json]`. Settings not in the file
//! come from defaults and `PROMPT_MANAGER_*` environment variables.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use prompt_config::ServerConfig;
use prompt_store::{PromptStore, StoreConfig};
use prompt_telemetry::tracing_support;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_support::init(tracing_support::DEFAULT_FILTER)?;

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = prompt_config::load(config_path.as_deref()).context("loading configuration")?;
    let store = Arc::new(open_store(&config.server).await?);

    let listener = TcpListener::bind(config.server.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.server.bind_addr))?;

    prompt_server::serve(listener, store, shutdown_signal()).await?;
    Ok(())
}

async fn open_store(server: &ServerConfig) -> Result<PromptStore> {
    let mut store_config = StoreConfig::new(&server.data_dir);
    if let Some(categories) = &server.default_categories {
        store_config = store_config.with_default_categories(categories);
    }
    let store = PromptStore::open(store_config)
        .await
        .with_context(|| format!("opening store in {}", server.data_dir.display()))?;
    info!(data_dir = %server.data_dir.display(), "store ready");
    Ok(store)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
