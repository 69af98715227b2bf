//! Candid engine: the operation layer over the storage crate.
//!
//! [`Engine`] bundles the database pool with the two pluggable collaborators
//! (blob store, participant directory) and exposes every user-facing
//! operation as an async method: session lifecycle, photo capture and
//! reveal, trade proposal and settlement, stats and badges. Callers pass an
//! [`identity::IdentityResolver`] per call; the engine itself holds no
//! caller state.

pub mod background;
pub mod blobs;
pub mod config;
pub mod directory;
pub mod error;
pub mod gamification;
pub mod gate;
pub mod identity;
pub mod photos;
pub mod sessions;
pub mod trades;

use std::sync::Arc;

use candid_db::DbPool;

use crate::blobs::{BlobStore, LocalBlobStore};
use crate::config::EngineConfig;
use crate::directory::{DbParticipantDirectory, ParticipantDirectory};
use crate::error::EngineResult;

/// The engine: a database pool plus the pluggable collaborators.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`);
/// clone freely into spawned tasks.
#[derive(Clone)]
pub struct Engine {
    pool: DbPool,
    blobs: Arc<dyn BlobStore>,
    directory: Arc<dyn ParticipantDirectory>,
}

impl Engine {
    /// Build an engine over an existing pool with the default
    /// database-backed participant directory.
    pub fn new(pool: DbPool, blobs: Arc<dyn BlobStore>) -> Self {
        let directory: Arc<dyn ParticipantDirectory> =
            Arc::new(DbParticipantDirectory::new(pool.clone()));
        Self {
            pool,
            blobs,
            directory,
        }
    }

    /// Build an engine with a custom participant directory.
    pub fn with_directory(
        pool: DbPool,
        blobs: Arc<dyn BlobStore>,
        directory: Arc<dyn ParticipantDirectory>,
    ) -> Self {
        Self {
            pool,
            blobs,
            directory,
        }
    }

    /// Connect, run migrations, and assemble the default engine from
    /// configuration.
    pub async fn from_config(config: &EngineConfig) -> EngineResult<Self> {
        let pool = candid_db::connect(&config.database_url).await?;
        candid_db::run_migrations(&pool).await?;
        let blobs: Arc<dyn BlobStore> = Arc::new(LocalBlobStore::new(&config.blob_root)?);
        Ok(Self::new(pool, blobs))
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}
