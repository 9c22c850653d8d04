use std::path::PathBuf;

use crate::analysis::AnalysisConfig;
use crate::auth::jwt::JwtConfig;
use crate::twitter::TwitterConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except the
/// secrets pulled in by [`JwtConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `300`). Analysis jobs run
    /// inside the request, so this bounds them too.
    pub request_timeout_secs: u64,
    /// JSON file of experiments upserted at startup, if set.
    pub experiments_seed_file: Option<PathBuf>,
    pub jwt: JwtConfig,
    pub analysis: AnalysisConfig,
    pub twitter: TwitterConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `8080`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `300`                   |
    /// | `EXPERIMENTS_SEED_FILE` | unset                   |
    ///
    /// Nested sections document their own variables.
    ///
    /// # Panics
    ///
    /// Panics on malformed numeric values or missing required secrets.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let experiments_seed_file = std::env::var("EXPERIMENTS_SEED_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            experiments_seed_file,
            jwt: JwtConfig::from_env(),
            analysis: AnalysisConfig::from_env(),
            twitter: TwitterConfig::from_env(),
        }
    }
}
