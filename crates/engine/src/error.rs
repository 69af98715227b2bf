use candid_core::error::CoreError;

use crate::blobs::BlobError;

/// Operation-level error type for the engine.
///
/// Wraps [`CoreError`] for domain failures and adds variants for the two
/// infrastructure layers the engine drives (database, blob store). An
/// embedding surface (HTTP, RPC) maps these to its own status codes.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A domain-level error from `candid_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A blob store error.
    #[error("Blob store error: {0}")]
    Blob(#[from] BlobError),
}

/// Convenience type alias for engine operation return values.
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// The wrapped domain error, if this is one.
    ///
    /// Callers matching on authorization or state failures use this to avoid
    /// reaching through the wrapper everywhere.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            EngineError::Core(core) => Some(core),
            _ => None,
        }
    }
}
