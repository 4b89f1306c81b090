//! CLI argument parsing, validation, and startup helpers.

use crate::ServerConfig;
use crate::db::Database;
use crate::password::DEFAULT_COST;
use clap::Parser;
use tracing::{error, info, warn};

/// Environment variable holding the token signing secret.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET_KEY";

const RECOMMENDED_JWT_SECRET_LENGTH: usize = 32;

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "storefront", about = "Storefront REST backend with JWT authentication")]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8088")]
    pub port: u16,

    /// Path to SQLite database file
    #[arg(short, long, default_value = "storefront.db")]
    pub database: String,

    /// Path to file containing the JWT secret. Prefer the JWT_SECRET_KEY env var instead
    #[arg(long)]
    pub jwt_secret_file: Option<String>,

    /// bcrypt work factor for new password hashes
    #[arg(long, default_value_t = DEFAULT_COST, value_parser = clap::value_parser!(u32).range(4..=31))]
    pub bcrypt_cost: u32,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Load JWT secret from environment variable or file.
/// Returns None and logs an error if the secret cannot be loaded or is empty.
///
/// Call before any other thread exists; the env var is removed once read.
pub fn load_jwt_secret(jwt_secret_file: Option<&str>) -> Option<String> {
    let secret = if let Ok(secret) = std::env::var(JWT_SECRET_ENV) {
        // Clear the environment variable to prevent leaking
        // SAFETY: main calls this before building the tokio runtime,
        // so no other thread can touch the environment concurrently.
        unsafe { std::env::remove_var(JWT_SECRET_ENV) };
        secret
    } else if let Some(path) = jwt_secret_file {
        match std::fs::read_to_string(path) {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read JWT secret file");
                return None;
            }
        }
    } else {
        error!(
            "JWT secret is required. Set {} environment variable (recommended) or use --jwt-secret-file",
            JWT_SECRET_ENV
        );
        return None;
    };

    validate_jwt_secret(secret)
}

fn validate_jwt_secret(secret: String) -> Option<String> {
    if secret.trim().is_empty() {
        error!("JWT secret is required but the configured value is empty");
        return None;
    }

    if secret.len() < RECOMMENDED_JWT_SECRET_LENGTH {
        warn!(
            "JWT secret is shorter than {} characters. Use a longer secret",
            RECOMMENDED_JWT_SECRET_LENGTH
        );
    }

    Some(secret)
}

/// Build ServerConfig from validated arguments.
pub fn build_config(db: Database, jwt_secret: String, bcrypt_cost: u32) -> ServerConfig {
    ServerConfig {
        db,
        jwt_secret: jwt_secret.into_bytes(),
        bcrypt_cost,
    }
}

/// Open the database, logging errors if it fails.
pub async fn open_database(path: &str) -> Option<Database> {
    match Database::open(path).await {
        Ok(db) => {
            info!(path = %path, "Database opened");
            Some(db)
        }
        Err(e) => {
            error!(path = %path, error = %e, "Failed to open database");
            None
        }
    }
}
