//! Repository for the `sessions` table.

use candid_core::types::{DbId, Timestamp};
use sqlx::SqlitePool;

use crate::models::session::{CreateSession, Session, SessionWithCount};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, host_id, status, reveal_time, created_at";

/// Provides CRUD and lifecycle operations for capture sessions.
pub struct SessionRepo;

impl SessionRepo {
    // ── Standard CRUD ────────────────────────────────────────────────

    /// Insert a new active session and enroll the host as its first
    /// participant, in one transaction.
    pub async fn create(
        pool: &SqlitePool,
        input: &CreateSession,
        now: Timestamp,
    ) -> Result<Session, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO sessions (name, host_id, status, reveal_time, created_at) \
             VALUES (?, ?, 'active', ?, ?) \
             RETURNING {COLUMNS}"
        );
        let session = sqlx::query_as::<_, Session>(&query)
            .bind(&input.name)
            .bind(input.host_id)
            .bind(input.reveal_time)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO session_participants (session_id, user_id, joined_at) VALUES (?, ?, ?)",
        )
        .bind(session.id)
        .bind(input.host_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(session)
    }

    /// Find a session by its ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Session>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE id = ?");
        sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The session's host, if the session exists.
    pub async fn host_of(pool: &SqlitePool, id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as("SELECT host_id FROM sessions WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(|r| r.0))
    }

    /// List the sessions a user participates in, newest first, each carrying
    /// its participant count.
    pub async fn list_for_user(
        pool: &SqlitePool,
        user_id: DbId,
    ) -> Result<Vec<SessionWithCount>, sqlx::Error> {
        sqlx::query_as::<_, SessionWithCount>(
            "SELECT s.id, s.name, s.host_id, s.status, s.reveal_time, s.created_at, \
                    (SELECT COUNT(*) FROM session_participants c \
                      WHERE c.session_id = s.id) AS participant_count \
             FROM sessions s \
             JOIN session_participants p ON p.session_id = s.id \
             WHERE p.user_id = ? \
             ORDER BY s.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Reveal a session: flip its status and every one of its photos,
    /// atomically.
    ///
    /// The status flip is guarded on `status = 'active'`, so a second reveal
    /// matches zero rows and returns `None` with nothing mutated. The photo
    /// flips commit together with the status flip; readers never observe a
    /// revealed session with hidden photos or the reverse.
    pub async fn reveal(
        pool: &SqlitePool,
        id: DbId,
        now: Timestamp,
    ) -> Result<Option<Session>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE sessions SET status = 'revealed', reveal_time = ? \
             WHERE id = ? AND status = 'active' \
             RETURNING {COLUMNS}"
        );
        let session = sqlx::query_as::<_, Session>(&query)
            .bind(now)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        // Dropping the transaction rolls the flip back, though with zero
        // rows matched there is nothing to roll back.
        let Some(session) = session else {
            return Ok(None);
        };

        sqlx::query("UPDATE photos SET is_revealed = 1 WHERE session_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(session))
    }

    /// Mark a session as ended. Guarded so only live sessions can end.
    pub async fn end(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions SET status = 'ended' \
             WHERE id = ? AND status IN ('active', 'revealed')",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
