use anyhow::Result;
use clap::Args;
use nifty_relay_core::{RelayEngine, DEFAULT_CONFIG_PATH};
use nifty_relay_web_api::ApiServer;
use std::sync::Arc;

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Simulate orders instead of sending them
    #[arg(long)]
    pub paper: bool,
}

/// Runs the webhook server until Ctrl-C.
pub async fn run(args: ServeArgs) -> Result<()> {
    let config = super::load_config(&args.config, args.paper)?;
    let broker = super::build_broker(&config)?;

    tracing::info!(
        broker = broker.name(),
        underlying = %config.strategy.underlying,
        marker = %config.strategy.marker,
        interval = %config.strategy.strike_interval,
        quantity = config.strategy.quantity,
        "Starting relay"
    );

    let engine = Arc::new(RelayEngine::from_config(broker, &config));
    ApiServer::new(engine).serve(&config.server.bind_addr()).await
}
