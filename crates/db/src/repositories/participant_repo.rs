//! Repository for the `session_participants` table.

use candid_core::types::{DbId, Timestamp};
use sqlx::SqlitePool;

use crate::models::session::SessionParticipant;

/// Provides membership operations for session rosters.
pub struct ParticipantRepo;

impl ParticipantRepo {
    /// Enroll a user in a session. Idempotent: re-joining is a no-op.
    ///
    /// Returns `true` if a new roster row was inserted, `false` if the user
    /// was already a participant.
    pub async fn join(
        pool: &SqlitePool,
        session_id: DbId,
        user_id: DbId,
        now: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO session_participants (session_id, user_id, joined_at) \
             VALUES (?, ?, ?) \
             ON CONFLICT (session_id, user_id) DO NOTHING",
        )
        .bind(session_id)
        .bind(user_id)
        .bind(now)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether the user has a roster row for the session.
    pub async fn is_participant(
        pool: &SqlitePool,
        session_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT 1 FROM session_participants WHERE session_id = ? AND user_id = ?",
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        Ok(row.is_some())
    }

    /// List a session's roster in join order.
    pub async fn list_for_session(
        pool: &SqlitePool,
        session_id: DbId,
    ) -> Result<Vec<SessionParticipant>, sqlx::Error> {
        sqlx::query_as::<_, SessionParticipant>(
            "SELECT session_id, user_id, joined_at \
             FROM session_participants \
             WHERE session_id = ? \
             ORDER BY joined_at, user_id",
        )
        .bind(session_id)
        .fetch_all(pool)
        .await
    }
}
