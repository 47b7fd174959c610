mod app;
mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use voyage_config::Config;

use crate::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();

    if let cli::Commands::Completions { shell } = cli.command {
        commands::completions::handle(shell);
        return Ok(());
    }

    let config = Config::load()?;
    let app = App::open(&config).await?;

    match cli.command {
        cli::Commands::Package(cmd) => commands::package::handle(cmd, &app).await,
        cli::Commands::Media(cmd) => commands::media::handle(cmd, &app).await,
        cli::Commands::Moment(cmd) => commands::moment::handle(cmd, &app).await,
        cli::Commands::Admin(cmd) => commands::admin::handle(cmd, &app).await,
        cli::Commands::Completions { .. } => Ok(()),
    }
}
