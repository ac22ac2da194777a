use std::env;

/// Database file used when no override is supplied.
pub const DEFAULT_DATABASE_PATH: &str = "jobs.db";

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Path to the SQLite database file
    pub database_path: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Optional environment variables:
    /// - DATABASE_PATH: path to the SQLite database file (default: jobs.db)
    pub fn from_env() -> Self {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string());

        Config { database_path }
    }
}
