// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mi Fitness → Strava sync CLI.
//!
//! Without a subcommand the full pipeline runs: import the export CSV,
//! obtain a valid Strava token, upload pending activities. Each stage is
//! also exposed as its own subcommand for selective runs.

use clap::{Parser, Subcommand};
use mifit_sync::config::Config;
use mifit_sync::db::Database;
use mifit_sync::error::{AppError, Result};
use mifit_sync::export;
use mifit_sync::services::{AuthService, Importer, StravaClient, TokenStore, Uploader};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mifit-sync", about = "Sync Mi Fitness activity exports to Strava")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Import the sport-record CSV from the export folder into the database
    Import {
        /// Export folder to read, overriding MI_FITNESS_DOWNLOADS_PATH
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
    /// Obtain (or refresh) a Strava access token and exit
    Auth,
    /// Upload pending activities using the stored token
    Upload,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            std::process::exit(AppError::from(e).exit_code());
        }
    };

    if let Err(e) = run(cli.command, &config).await {
        tracing::error!(error = %e, "Run failed");
        std::process::exit(e.exit_code());
    }
}

async fn run(command: Option<Commands>, config: &Config) -> Result<()> {
    match command {
        Some(Commands::Import { path }) => {
            let db = Database::open(&config.database_path)?;
            run_import(config, &db, path)?;
            Ok(())
        }
        Some(Commands::Auth) => {
            auth_service(config).obtain_valid_token().await.map(|_| ())
        }
        Some(Commands::Upload) => {
            let db = Database::open(&config.database_path)?;
            let token = auth_service(config).obtain_valid_token().await?;
            run_upload(config, &db, &token).await
        }
        None => {
            let db = Database::open(&config.database_path)?;

            // An import failure is logged and does not block the upload of
            // records already in the database; it still fails the run after
            // the upload stage has had its chance.
            let import_result = run_import(config, &db, None);
            if let Err(e) = &import_result {
                tracing::error!(error = %e, "Import stage failed, continuing with upload");
            }

            let token = auth_service(config).obtain_valid_token().await?;
            run_upload(config, &db, &token).await?;

            import_result.map(|_| ())
        }
    }
}

fn run_import(config: &Config, db: &Database, path_override: Option<PathBuf>) -> Result<usize> {
    let export_dir = path_override
        .or_else(|| config.export_dir.clone())
        .ok_or_else(|| {
            AppError::Import("No export folder configured (MI_FITNESS_DOWNLOADS_PATH)".to_string())
        })?;

    let csv_path = export::sport_csv_path(&export_dir)?;
    let rows = export::read_rows(&csv_path)?;

    let inserted = Importer::new(db, config.utc_offset).import(&rows)?;
    tracing::info!(inserted, "Import stage complete");
    Ok(inserted)
}

async fn run_upload(config: &Config, db: &Database, token: &str) -> Result<()> {
    let client = strava_client(config);
    let outcome = Uploader::new(db, &client, &config.upload_cutoff)
        .sync(token)
        .await?;
    tracing::info!(
        uploaded = outcome.uploaded,
        skipped = outcome.skipped,
        "Upload stage complete"
    );
    Ok(())
}

fn strava_client(config: &Config) -> StravaClient {
    StravaClient::new(
        config.strava_client_id.clone(),
        config.strava_client_secret.clone(),
    )
}

fn auth_service(config: &Config) -> AuthService {
    AuthService::new(
        strava_client(config),
        TokenStore::new(&config.token_file),
        config.callback_port,
        Duration::from_secs(config.auth_timeout_secs),
    )
}

/// Initialize terminal logging with env-filter overrides.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mifit_sync=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
