//! Shared helpers for engine integration tests.

use std::sync::Arc;

use candid_core::types::DbId;
use candid_db::models::photo::Photo;
use candid_db::DbPool;
use candid_engine::blobs::LocalBlobStore;
use candid_engine::identity::FixedIdentity;
use candid_engine::photos::CaptureMeta;
use candid_engine::Engine;

/// Build an engine over the test pool with a blob store in a fresh temp
/// directory. The returned guard keeps the directory alive for the test.
pub fn build_test_engine(pool: DbPool) -> (tempfile::TempDir, Engine) {
    let dir = tempfile::tempdir().expect("temp blob root");
    let blobs = Arc::new(LocalBlobStore::new(dir.path()).expect("blob store"));
    (dir, Engine::new(pool, blobs))
}

/// Forward `RUST_LOG` to test output when set. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Shorthand for a fixed identity.
pub fn user(id: DbId) -> FixedIdentity {
    FixedIdentity::user(id)
}

/// Shorthand for the anonymous identity.
pub fn anon() -> FixedIdentity {
    FixedIdentity::anonymous()
}

/// Upload bytes and capture the resulting blob into the session.
pub async fn capture(engine: &Engine, user_id: DbId, session_id: DbId, bytes: &[u8]) -> Photo {
    let blob_ref = engine
        .upload_photo(&user(user_id), bytes)
        .await
        .expect("upload");
    engine
        .capture_photo(&user(user_id), session_id, blob_ref, CaptureMeta::default())
        .await
        .expect("capture")
}
