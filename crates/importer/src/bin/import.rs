use std::path::PathBuf;

use clap::{Parser, Subcommand};
use importer::canonical::{
    loader::{CanonicalLoader, LoadSummary}, models::CanonicalFixture, validator::CanonicalValidator,
};
use storage::Database;
use storage::repository::result::ResultRepository;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "sbyra-import")]
#[command(about = "SBYRA racing fixture importer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a fixture file and load it into the database
    Load {
        file: PathBuf,

        /// Run the load against the database and roll it back
        #[arg(long)]
        validate_only: bool,
    },
    /// Re-derive every posted time of one event
    Recompute {
        #[arg(long)]
        event: Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("sbyra_import={},importer={},storage={}", log_level, log_level, log_level)
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Load {
            file,
            validate_only,
        } => {
            handle_load(file, validate_only, &cli.database_url).await?;
        }
        Commands::Recompute { event } => {
            handle_recompute(event, &cli.database_url).await?;
        }
    }

    Ok(())
}

async fn handle_load(
    file: PathBuf,
    validate_only: bool,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Loading fixture from: {}", file.display());

    let json_content = tokio::fs::read_to_string(&file).await?;
    let fixture: CanonicalFixture = serde_json::from_str(&json_content)?;

    tracing::info!(
        "Loaded {} clubs, {} yachts, {} series (v{})",
        fixture.clubs.len(),
        fixture.yachts.len(),
        fixture.series.len(),
        fixture.format_version
    );

    tracing::info!("Validating fixture...");
    let validation_report = CanonicalValidator::validate(&fixture)?;
    validation_report.log_warnings();
    tracing::info!("Validation successful");

    let db = connect(database_url).await?;
    let loader = CanonicalLoader::new(db.pool());

    if validate_only {
        let summary = loader.dry_run(&fixture).await?;
        log_summary("Dry run completed, nothing written", &summary);
        return Ok(());
    }

    let summary = loader.load(&fixture).await?;
    log_summary("Import completed", &summary);

    Ok(())
}

fn log_summary(outcome: &str, summary: &LoadSummary) {
    tracing::info!(
        "{}: {} clubs, {} spinnakers, {} yachts, {} series, {} events, {} results created; {} events recomputed; {} already present",
        outcome,
        summary.clubs_created,
        summary.spinnakers_created,
        summary.yachts_created,
        summary.series_created,
        summary.events_created,
        summary.results_created,
        summary.events_recomputed,
        summary.skipped
    );
}

async fn handle_recompute(event_id: Uuid, database_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = connect(database_url).await?;

    let count = ResultRepository::new(db.pool()).recompute_event(event_id).await?;
    tracing::info!("Recomputed {} result(s) for event {}", count, event_id);

    Ok(())
}

async fn connect(database_url: &str) -> Result<Database, Box<dyn std::error::Error>> {
    tracing::info!("Connecting to database...");
    let db = Database::with_max_connections(database_url, 5).await?;
    db.run_migrations().await?;

    Ok(db)
}
