//! Repository for the `photos` table.

use candid_core::types::{DbId, Timestamp};
use sqlx::SqlitePool;

use crate::models::photo::{CreatePhoto, Photo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, session_id, original_owner_id, owner_id, blob_ref, \
    is_revealed, file_size, width, height, trade_count, captured_at";

/// Provides CRUD and ownership queries for photos.
///
/// Ownership mutation is deliberately absent here: `owner_id` changes only
/// through [`crate::repositories::TradeRepo::settle`], which owns the guarded
/// swap and its audit trail.
pub struct PhotoRepo;

impl PhotoRepo {
    // ── Standard CRUD ────────────────────────────────────────────────

    /// Insert a freshly captured photo: unrevealed, zero trades, owned by
    /// its capturer.
    pub async fn create(
        pool: &SqlitePool,
        input: &CreatePhoto,
        now: Timestamp,
    ) -> Result<Photo, sqlx::Error> {
        let query = format!(
            "INSERT INTO photos \
                (session_id, original_owner_id, owner_id, blob_ref, \
                 is_revealed, file_size, width, height, trade_count, captured_at) \
             VALUES (?, ?, ?, ?, 0, ?, ?, ?, 0, ?) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Photo>(&query)
            .bind(input.session_id)
            .bind(input.owner_id)
            .bind(input.owner_id)
            .bind(&input.blob_ref)
            .bind(input.file_size)
            .bind(input.width)
            .bind(input.height)
            .bind(now)
            .fetch_one(pool)
            .await
    }

    /// Find a photo by its ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Photo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM photos WHERE id = ?");
        sqlx::query_as::<_, Photo>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load a batch of photos by ID. The result preserves no particular
    /// order and silently skips dangling IDs; callers that care check the
    /// returned length.
    pub async fn find_by_ids(
        pool: &SqlitePool,
        ids: &[DbId],
    ) -> Result<Vec<Photo>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; ids.len()].join(", ");
        let query = format!("SELECT {COLUMNS} FROM photos WHERE id IN ({placeholders})");
        let mut q = sqlx::query_as::<_, Photo>(&query);
        for id in ids {
            q = q.bind(*id);
        }
        q.fetch_all(pool).await
    }

    // ── Listings ─────────────────────────────────────────────────────

    /// All photos in a session, oldest first.
    pub async fn list_by_session(
        pool: &SqlitePool,
        session_id: DbId,
    ) -> Result<Vec<Photo>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM photos WHERE session_id = ? ORDER BY captured_at, id");
        sqlx::query_as::<_, Photo>(&query)
            .bind(session_id)
            .fetch_all(pool)
            .await
    }

    /// Photos in a session the viewer may see: everything once revealed,
    /// plus the viewer's own unrevealed captures.
    pub async fn list_visible_in_session(
        pool: &SqlitePool,
        session_id: DbId,
        viewer_id: DbId,
    ) -> Result<Vec<Photo>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM photos \
             WHERE session_id = ? AND (is_revealed = 1 OR original_owner_id = ?) \
             ORDER BY captured_at, id"
        );
        sqlx::query_as::<_, Photo>(&query)
            .bind(session_id)
            .bind(viewer_id)
            .fetch_all(pool)
            .await
    }

    /// Photos the user currently holds across all sessions, newest first.
    pub async fn list_owned_by(
        pool: &SqlitePool,
        owner_id: DbId,
    ) -> Result<Vec<Photo>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM photos WHERE owner_id = ? ORDER BY captured_at DESC, id DESC"
        );
        sqlx::query_as::<_, Photo>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Photos captured by the user in one session. Used by capture-count
    /// checks and tests.
    pub async fn count_captured_in_session(
        pool: &SqlitePool,
        session_id: DbId,
        user_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM photos WHERE session_id = ? AND original_owner_id = ?",
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}
