use std::path::PathBuf;

/// Engine configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. In production,
/// override via environment variables.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// SQLite database URL (default: `sqlite://candid.db`).
    pub database_url: String,
    /// Root directory for the local blob store (default: `./blobs`).
    pub blob_root: PathBuf,
    /// Seconds between stats reconciliation passes (default: `900`).
    pub stats_refresh_interval_secs: u64,
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default              |
    /// |-------------------------------|----------------------|
    /// | `DATABASE_URL`                | `sqlite://candid.db` |
    /// | `BLOB_ROOT`                   | `./blobs`            |
    /// | `STATS_REFRESH_INTERVAL_SECS` | `900`                |
    pub fn from_env() -> Self {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://candid.db".into());

        let blob_root: PathBuf = std::env::var("BLOB_ROOT")
            .unwrap_or_else(|_| "./blobs".into())
            .into();

        let stats_refresh_interval_secs: u64 = std::env::var("STATS_REFRESH_INTERVAL_SECS")
            .unwrap_or_else(|_| "900".into())
            .parse()
            .expect("STATS_REFRESH_INTERVAL_SECS must be a valid u64");

        Self {
            database_url,
            blob_root,
            stats_refresh_interval_secs,
        }
    }

    /// Load `.env` if present, then read the environment.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::from_env()
    }
}
