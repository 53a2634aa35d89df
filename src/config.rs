//! Application configuration loaded from environment variables.
//!
//! Loaded once at startup and passed down; components never read the
//! environment themselves.

use chrono::FixedOffset;
use std::env;
use std::path::PathBuf;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Strava OAuth client ID (public)
    pub strava_client_id: String,
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// Path to the SQLite activity database
    pub database_path: PathBuf,
    /// Mi Fitness export folder (the `*_c3_data_copy` directory)
    pub export_dir: Option<PathBuf>,
    /// Where the OAuth token pair is persisted between runs
    pub token_file: PathBuf,
    /// Local port the OAuth redirect lands on
    pub callback_port: u16,
    /// Time zone of the tracker device; epoch timestamps in the export are
    /// shifted by this offset to get wall-clock time
    pub utc_offset: FixedOffset,
    /// Records with a local datetime before this date are never uploaded
    pub upload_cutoff: String,
    /// How long to wait for the user to finish the browser authorization
    pub auth_timeout_secs: u64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            strava_client_secret: "test_secret".to_string(),
            database_path: PathBuf::from(":memory:"),
            export_dir: None,
            token_file: PathBuf::from("strava_tokens.json"),
            callback_port: 8000,
            utc_offset: FixedOffset::west_opt(3 * 3600).expect("static offset"),
            upload_cutoff: "2024-06-01".to_string(),
            auth_timeout_secs: 300,
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let offset_hours: i32 = env::var("UTC_OFFSET_HOURS")
            .unwrap_or_else(|_| "-3".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("UTC_OFFSET_HOURS"))?;
        let utc_offset = FixedOffset::east_opt(offset_hours * 3600)
            .ok_or(ConfigError::Invalid("UTC_OFFSET_HOURS"))?;

        Ok(Self {
            strava_client_id: env::var("STRAVA_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_ID"))?,
            strava_client_secret: env::var("STRAVA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_SECRET"))?,
            database_path: env::var("DATABASE_PATH")
                .map(PathBuf::from)
                .map_err(|_| ConfigError::Missing("DATABASE_PATH"))?,
            export_dir: env::var("MI_FITNESS_DOWNLOADS_PATH").ok().map(PathBuf::from),
            token_file: env::var("TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("strava_tokens.json")),
            callback_port: env::var("CALLBACK_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("CALLBACK_PORT"))?,
            utc_offset,
            upload_cutoff: env::var("UPLOAD_CUTOFF").unwrap_or_else(|_| "2024-06-01".to_string()),
            auth_timeout_secs: env::var("AUTH_TIMEOUT_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("AUTH_TIMEOUT_SECS"))?,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
