use clap::{Parser, Subcommand};

mod commands;

use commands::{QuoteArgs, ServeArgs};

#[derive(Parser)]
#[command(name = "nifty-relay")]
#[command(about = "Turns chart alerts into NIFTY option orders", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the webhook server
    Serve(ServeArgs),
    /// Fetch one last traded price to check broker credentials
    Quote(QuoteArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Serve(args) => commands::serve::run(args).await?,
        Commands::Quote(args) => commands::quote::run(args).await?,
    }

    Ok(())
}
