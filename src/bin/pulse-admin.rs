use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pulse::analytics::AnalyticsService;
use pulse::config::Config;
use pulse::storage;

#[derive(Parser)]
#[command(name = "pulse-admin")]
#[command(about = "Pulse visit analytics admin CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the analytics table if it does not exist
    Init,
    /// Record a single visit
    Record {
        /// Page path, e.g. /doctors
        path: String,
    },
    /// Print the current analytics snapshot as JSON
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let store = storage::connect(&config.store).await?;

    // Ensure database is initialized
    store.init().await?;

    match cli.command {
        Commands::Init => {
            println!("✅ Record store initialized ({:?})", config.store.backend);
        }
        Commands::Record { path } => {
            // Go through the store directly so failures are reported, not dropped
            store
                .insert_visit(&path)
                .await
                .with_context(|| format!("failed to record visit to {path}"))?;
            println!("✅ Recorded visit to {}", path);
        }
        Commands::Stats => {
            let snapshot = AnalyticsService::new(store).snapshot().await;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }

    Ok(())
}
