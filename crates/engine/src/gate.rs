//! Authorization gate for engine operations.
//!
//! Mutations check identity and membership up front and fail fast; read
//! queries skip the gate and degrade to empty results, so membership cannot
//! be probed through error shapes.

use candid_core::error::CoreError;
use candid_core::types::DbId;

use crate::error::EngineResult;
use crate::identity::IdentityResolver;
use crate::Engine;

/// Resolve the caller or fail with `NotAuthenticated`.
pub fn require_user(identity: &dyn IdentityResolver) -> Result<DbId, CoreError> {
    identity.current_user_id().ok_or(CoreError::NotAuthenticated)
}

impl Engine {
    /// Fail with `NotAParticipant` unless the user is enrolled in the session.
    pub(crate) async fn require_participant(
        &self,
        session_id: DbId,
        user_id: DbId,
    ) -> EngineResult<()> {
        if self.directory.is_participant(session_id, user_id).await? {
            Ok(())
        } else {
            Err(CoreError::NotAParticipant {
                session_id,
                user_id,
            }
            .into())
        }
    }

    /// Fail with `NotAuthorized` unless the user hosts the session, or with
    /// `NotFound` when the session does not exist.
    pub(crate) async fn require_host(&self, session_id: DbId, user_id: DbId) -> EngineResult<()> {
        match self.directory.host_of(session_id).await? {
            Some(host_id) if host_id == user_id => Ok(()),
            Some(_) => Err(CoreError::NotAuthorized(format!(
                "user {user_id} is not the host of session {session_id}"
            ))
            .into()),
            None => Err(CoreError::NotFound {
                entity: "session",
                id: session_id,
            }
            .into()),
        }
    }
}
