//! CLI argument parsing, validation, and startup helpers.

use clap::Parser;
use tracing::{error, info};

use crate::ServerConfig;
use crate::db::Database;
use crate::password;

const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "Authgate", about = "Cookie-based JWT authentication gateway")]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8319")]
    pub port: u16,

    /// Path to SQLite database file
    #[arg(short, long, default_value = "authgate.db")]
    pub database: String,

    /// Path to file containing JWT secret. Prefer using JWT_SECRET env var instead
    #[arg(long)]
    pub jwt_secret_file: Option<String>,

    /// Clock skew tolerance in seconds applied to token expiry checks
    #[arg(long, default_value = "0")]
    pub clock_skew_leeway: u64,

    /// Create an active user on startup and print the generated password
    #[arg(long, value_name = "USERNAME")]
    pub create_user: Option<String>,

    /// Email address for the user created with --create-user
    #[arg(long, default_value = "")]
    pub email: String,

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
/// Returns None and logs an error if the secret cannot be loaded.
pub fn load_jwt_secret(jwt_secret_file: Option<&str>) -> Option<String> {
    let secret = if let Ok(secret) = std::env::var("JWT_SECRET") {
        // Clear the environment variable to prevent leaking
        // SAFETY: We're single-threaded at this point during startup,
        // and no other code is reading this environment variable.
        unsafe { std::env::remove_var("JWT_SECRET") };
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
            "JWT secret is required. Set JWT_SECRET environment variable (recommended) or use --jwt-secret-file"
        );
        return None;
    };

    if secret.len() < MIN_JWT_SECRET_LENGTH {
        error!(
            "JWT secret is shorter than {} characters. Use a longer secret",
            MIN_JWT_SECRET_LENGTH
        );
        return None;
    }

    Some(secret)
}

/// Handle the --create-user flag: provision an active user and print the
/// generated password once. Registration has no HTTP endpoint.
pub async fn handle_create_user(db: &Database, username: &str, email: &str) {
    match db.users().get_by_username(username).await {
        Ok(Some(_)) => {
            error!(username = %username, "User already exists");
            std::process::exit(1);
        }
        Ok(None) => {
            let password = uuid::Uuid::new_v4().to_string();
            let hash = match password::hash_password(&password) {
                Ok(hash) => hash,
                Err(e) => {
                    error!(error = %e, "Failed to hash generated password");
                    std::process::exit(1);
                }
            };

            match db.users().create(username, email, &hash, "", "").await {
                Ok(_) => {
                    println!();
                    println!("User created: {}", username);
                    println!("Password: {}", password);
                    println!();
                }
                Err(e) => {
                    error!(error = %e, "Failed to create user");
                    std::process::exit(1);
                }
            }
        }
        Err(e) => {
            error!(error = %e, "Failed to check for existing user");
            std::process::exit(1);
        }
    }
}

/// Build ServerConfig from validated arguments.
pub fn build_config(db: Database, jwt_secret: String, clock_skew_leeway: u64) -> ServerConfig {
    ServerConfig {
        db,
        jwt_secret: jwt_secret.into_bytes(),
        clock_skew_leeway,
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
