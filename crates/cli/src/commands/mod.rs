//! Subcommands of the relay binary.

pub mod quote;
pub mod serve;

pub use quote::QuoteArgs;
pub use serve::ServeArgs;

use anyhow::{Context, Result};
use nifty_relay_core::{AppConfig, Broker, ConfigLoader};
use nifty_relay_dhan::{DhanClient, DhanClientConfig, PaperBroker};
use std::sync::Arc;

/// Loads and validates configuration from `path` plus the environment.
fn load_config(path: &str, paper: bool) -> Result<AppConfig> {
    let mut config = ConfigLoader::load_from(path)
        .with_context(|| format!("failed to load config from {path}"))?;
    if paper {
        config.broker.paper = true;
    }
    config.validate()?;
    Ok(config)
}

/// Live Dhan client, wrapped in the paper shim when `broker.paper` is set.
fn build_broker(config: &AppConfig) -> Result<Arc<dyn Broker>> {
    let client = DhanClient::new(DhanClientConfig::from_broker_config(&config.broker))
        .context("failed to build Dhan client")?;
    let live: Arc<dyn Broker> = Arc::new(client);

    if config.broker.paper {
        tracing::warn!("Paper mode: orders are simulated, quotes are live");
        Ok(Arc::new(PaperBroker::new(live)))
    } else {
        Ok(live)
    }
}
