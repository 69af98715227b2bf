//! Session membership lookups behind a trait.
//!
//! The authorization gate asks two questions: is this user enrolled in the
//! session, and who hosts it. By default both are answered from the session
//! tables via [`DbParticipantDirectory`]; an embedding with an external
//! membership source can substitute its own implementation.

use async_trait::async_trait;
use candid_core::types::DbId;
use candid_db::repositories::{ParticipantRepo, SessionRepo};
use candid_db::DbPool;

use crate::error::EngineResult;

/// Answers membership and host questions for the authorization gate.
#[async_trait]
pub trait ParticipantDirectory: Send + Sync {
    /// Whether the user is enrolled in the session.
    async fn is_participant(&self, session_id: DbId, user_id: DbId) -> EngineResult<bool>;

    /// The session's host, or `None` for an unknown session.
    async fn host_of(&self, session_id: DbId) -> EngineResult<Option<DbId>>;
}

/// Directory backed by the `sessions` and `session_participants` tables.
pub struct DbParticipantDirectory {
    pool: DbPool,
}

impl DbParticipantDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipantDirectory for DbParticipantDirectory {
    async fn is_participant(&self, session_id: DbId, user_id: DbId) -> EngineResult<bool> {
        Ok(ParticipantRepo::is_participant(&self.pool, session_id, user_id).await?)
    }

    async fn host_of(&self, session_id: DbId) -> EngineResult<Option<DbId>> {
        Ok(SessionRepo::host_of(&self.pool, session_id).await?)
    }
}
