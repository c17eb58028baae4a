use anyhow::Result;
use clap::Args;
use nifty_relay_core::DEFAULT_CONFIG_PATH;

/// Arguments for the `quote` command.
#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Symbol to quote, defaults to the configured underlying
    #[arg(long)]
    pub symbol: Option<String>,
}

/// Prints one last traded price.
pub async fn run(args: QuoteArgs) -> Result<()> {
    let config = super::load_config(&args.config, false)?;
    let broker = super::build_broker(&config)?;

    let exchange = config.strategy.quote_exchange.as_str();
    let symbol = args
        .symbol
        .as_deref()
        .unwrap_or(config.strategy.underlying.as_str());

    let ltp = broker.last_traded_price(exchange, symbol).await?;
    println!("{exchange}:{symbol} {ltp}");

    Ok(())
}
