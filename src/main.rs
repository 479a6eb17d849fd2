use aggregator::RollingAggregator;
use clap::{Parser, Subcommand};
use configuration::{load_settings, SettingsOverrides};
use std::path::PathBuf;
use std::sync::Arc;
use web_server::AppState;

mod logging;

/// The main entry point for the rolling statistics service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(overrides) => handle_serve(cli.config, overrides).await,
        Commands::CheckConfig => handle_check_config(cli.config),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Ingests timestamped events and serves rolling count/sum/average statistics.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults to `config.toml` if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server.
    Serve(SettingsOverrides),
    /// Load and validate the configuration, then print the effective settings.
    CheckConfig,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_serve(config: Option<PathBuf>, overrides: SettingsOverrides) -> anyhow::Result<()> {
    let settings = overrides.apply(load_settings(config.as_deref())?)?;
    let _guard = logging::init_logging(&settings.logging)?;

    tracing::info!(
        window_millis = settings.window.duration_millis,
        "Starting rolling stats service."
    );

    let aggregator = Arc::new(RollingAggregator::new(settings.window.duration_millis));
    let state = Arc::new(AppState::new(aggregator));
    web_server::run_server(&settings.server, state).await
}

fn handle_check_config(config: Option<PathBuf>) -> anyhow::Result<()> {
    let settings = load_settings(config.as_deref())?;
    println!("{settings:#?}");
    Ok(())
}
