//! Server configuration loaded from environment variables.

use std::path::PathBuf;

/// Server configuration.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Base URL of the external catalog service (default:
    /// `http://localhost:9999`).
    pub catalog_url: String,
    /// Optional `ApiKey` header value for the catalog connection.
    pub catalog_api_key: Option<String>,
    /// Directory for snapshot backups (default: `./backups`).
    pub backup_dir: PathBuf,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                  |
    /// |------------------------|--------------------------|
    /// | `HOST`                 | `0.0.0.0`                |
    /// | `PORT`                 | `3000`                   |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                     |
    /// | `CATALOG_URL`          | `http://localhost:9999`  |
    /// | `CATALOG_API_KEY`      | (unset)                  |
    /// | `BACKUP_DIR`           | `./backups`              |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let catalog_url =
            std::env::var("CATALOG_URL").unwrap_or_else(|_| "http://localhost:9999".into());

        let catalog_api_key = std::env::var("CATALOG_API_KEY").ok().filter(|s| !s.is_empty());

        let backup_dir =
            PathBuf::from(std::env::var("BACKUP_DIR").unwrap_or_else(|_| "./backups".into()));

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            catalog_url,
            catalog_api_key,
            backup_dir,
        }
    }
}
