//! Blob storage behind an object-safe trait.
//!
//! Photo bytes live outside the database; rows carry only an opaque
//! `blob_ref`. The default [`LocalBlobStore`] writes content-addressed files
//! under a root directory and serves `file://` URLs. Other backends (S3 and
//! the like) plug in by implementing [`BlobStore`].

use std::path::PathBuf;

use async_trait::async_trait;
use candid_core::types::BlobRef;
use sha2::{Digest, Sha256};

/// Error type for blob store operations.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    /// Underlying filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A ref this store could never have produced.
    #[error("Invalid blob ref '{0}'")]
    InvalidRef(String),
}

/// Abstraction over wherever photo bytes actually live.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store a blob, returning the opaque ref to persist on the photo row.
    async fn put(&self, bytes: &[u8]) -> Result<BlobRef, BlobError>;

    /// Resolve a ref to a fetchable URL, or `None` if the blob is missing.
    async fn url(&self, blob_ref: &str) -> Result<Option<String>, BlobError>;
}

/// Content-addressed blob store on the local filesystem.
///
/// Blobs are named by their SHA-256 hex digest, so storing the same bytes
/// twice is a no-op and refs never collide.
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, BlobError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Path for a validated ref. Refs are hex digests; anything else
    /// (separators, dots) is corruption or a traversal attempt.
    fn blob_path(&self, blob_ref: &str) -> Result<PathBuf, BlobError> {
        let valid = !blob_ref.is_empty() && blob_ref.chars().all(|c| c.is_ascii_alphanumeric());
        if !valid {
            return Err(BlobError::InvalidRef(blob_ref.to_string()));
        }
        Ok(self.root.join(blob_ref))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, bytes: &[u8]) -> Result<BlobRef, BlobError> {
        let hash = Sha256::digest(bytes);
        let blob_ref = format!("{hash:x}");
        let path = self.root.join(&blob_ref);
        if !tokio::fs::try_exists(&path).await? {
            tokio::fs::write(&path, bytes).await?;
        }
        Ok(blob_ref)
    }

    async fn url(&self, blob_ref: &str) -> Result<Option<String>, BlobError> {
        let path = self.blob_path(blob_ref)?;
        if tokio::fs::try_exists(&path).await? {
            Ok(Some(format!("file://{}", path.display())))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn store() -> (tempfile::TempDir, LocalBlobStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path()).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn put_returns_hex_digest() {
        let (_dir, store) = store();
        let blob_ref = store.put(b"").await.unwrap();
        assert_eq!(
            blob_ref,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[tokio::test]
    async fn put_is_content_addressed() {
        let (_dir, store) = store();
        let first = store.put(b"photo bytes").await.unwrap();
        let again = store.put(b"photo bytes").await.unwrap();
        let other = store.put(b"different bytes").await.unwrap();
        assert_eq!(first, again);
        assert_ne!(first, other);
    }

    #[tokio::test]
    async fn url_resolves_stored_blob() {
        let (_dir, store) = store();
        let blob_ref = store.put(b"photo bytes").await.unwrap();
        let url = store.url(&blob_ref).await.unwrap().unwrap();
        assert!(url.starts_with("file://"));
        assert!(url.ends_with(&blob_ref));
    }

    #[tokio::test]
    async fn url_for_unknown_ref_is_none() {
        let (_dir, store) = store();
        let url = store.url("deadbeef").await.unwrap();
        assert!(url.is_none());
    }

    #[tokio::test]
    async fn url_rejects_malformed_refs() {
        let (_dir, store) = store();
        assert_matches!(store.url("../secrets").await, Err(BlobError::InvalidRef(_)));
        assert_matches!(store.url("").await, Err(BlobError::InvalidRef(_)));
    }
}
