//! Capture session model and DTOs.

use candid_core::session::SessionStatus;
use candid_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A session row from the `sessions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Session {
    pub id: DbId,
    pub name: String,
    pub host_id: DbId,
    #[sqlx(try_from = "String")]
    pub status: SessionStatus,
    pub reveal_time: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for creating a new session. The host joins as a participant in the
/// same transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSession {
    pub name: String,
    pub host_id: DbId,
    pub reveal_time: Option<Timestamp>,
}

/// A roster row from the `session_participants` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SessionParticipant {
    pub session_id: DbId,
    pub user_id: DbId,
    pub joined_at: Timestamp,
}

/// A session row joined with its participant count, for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SessionWithCount {
    pub id: DbId,
    pub name: String,
    pub host_id: DbId,
    #[sqlx(try_from = "String")]
    pub status: SessionStatus,
    pub reveal_time: Option<Timestamp>,
    pub created_at: Timestamp,
    pub participant_count: i64,
}
