//! Session lifecycle and session queries.
//!
//! Sessions move through `active` → `revealed` → `ended`; only the host may
//! advance them. Captures are allowed while active, trades while revealed,
//! joins until ended.

use candid_core::error::CoreError;
use candid_core::session;
use candid_core::types::{DbId, Timestamp};
use candid_db::models::session::{CreateSession, Session, SessionParticipant, SessionWithCount};
use candid_db::repositories::{ParticipantRepo, PhotoRepo, SessionRepo};
use chrono::Utc;
use serde::Serialize;

use crate::error::EngineResult;
use crate::gate;
use crate::identity::IdentityResolver;
use crate::photos::PhotoWithUrl;
use crate::Engine;

/// A session listing entry: the row, its headcount, and whether the caller
/// hosts it.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    #[serde(flatten)]
    pub session: SessionWithCount,
    pub is_host: bool,
}

/// Detail view for a participant: the roster plus the photos the caller may
/// currently see.
#[derive(Debug, Clone, Serialize)]
pub struct SessionDetails {
    #[serde(flatten)]
    pub session: Session,
    pub participants: Vec<SessionParticipant>,
    pub photos: Vec<PhotoWithUrl>,
    pub is_host: bool,
}

impl Engine {
    // ── Lifecycle ────────────────────────────────────────────────────

    /// Create a session. The creator becomes host and is enrolled as the
    /// first participant.
    pub async fn create_session(
        &self,
        identity: &dyn IdentityResolver,
        name: String,
        reveal_time: Option<Timestamp>,
    ) -> EngineResult<Session> {
        let host_id = gate::require_user(identity)?;

        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(CoreError::Validation("session name cannot be empty".into()).into());
        }

        let input = CreateSession {
            name,
            host_id,
            reveal_time,
        };
        let session = SessionRepo::create(&self.pool, &input, Utc::now()).await?;
        tracing::info!(session_id = session.id, host_id, "Session created");
        Ok(session)
    }

    /// Join a session. Idempotent for an existing participant; fails only
    /// once the session has ended.
    pub async fn join_session(
        &self,
        identity: &dyn IdentityResolver,
        session_id: DbId,
    ) -> EngineResult<Session> {
        let user_id = gate::require_user(identity)?;

        let Some(session) = SessionRepo::find_by_id(&self.pool, session_id).await? else {
            return Err(CoreError::NotFound {
                entity: "session",
                id: session_id,
            }
            .into());
        };
        if !session.status.accepts_joins() {
            return Err(CoreError::InvalidState(format!("session {session_id} has ended")).into());
        }

        let joined = ParticipantRepo::join(&self.pool, session_id, user_id, Utc::now()).await?;
        if joined {
            tracing::debug!(session_id, user_id, "Participant joined session");
        }
        Ok(session)
    }

    /// Reveal a session's photos. Host-only, one-way.
    ///
    /// The status flip and the per-photo `is_revealed` flips commit in one
    /// transaction; no reader observes a revealed session with hidden
    /// photos.
    pub async fn reveal_session(
        &self,
        identity: &dyn IdentityResolver,
        session_id: DbId,
    ) -> EngineResult<Session> {
        let user_id = gate::require_user(identity)?;
        self.require_host(session_id, user_id).await?;

        let Some(current) = SessionRepo::find_by_id(&self.pool, session_id).await? else {
            return Err(CoreError::NotFound {
                entity: "session",
                id: session_id,
            }
            .into());
        };
        session::validate_reveal(current.status, session_id)?;

        let Some(revealed) = SessionRepo::reveal(&self.pool, session_id, Utc::now()).await? else {
            // Lost a race with another status flip between the check and
            // the guarded update.
            return Err(
                CoreError::InvalidState(format!("session {session_id} is no longer active")).into(),
            );
        };
        tracing::info!(session_id, host_id = user_id, "Session revealed");
        Ok(revealed)
    }

    /// End a session. Host-only; terminal from both live states.
    pub async fn end_session(
        &self,
        identity: &dyn IdentityResolver,
        session_id: DbId,
    ) -> EngineResult<Session> {
        let user_id = gate::require_user(identity)?;
        self.require_host(session_id, user_id).await?;

        let ended = SessionRepo::end(&self.pool, session_id).await?;
        if !ended {
            return Err(
                CoreError::InvalidState(format!("session {session_id} has already ended")).into(),
            );
        }
        tracing::info!(session_id, host_id = user_id, "Session ended");

        let Some(session) = SessionRepo::find_by_id(&self.pool, session_id).await? else {
            return Err(CoreError::NotFound {
                entity: "session",
                id: session_id,
            }
            .into());
        };
        Ok(session)
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Sessions the caller participates in, newest first. Empty when
    /// unauthenticated.
    pub async fn list_user_sessions(
        &self,
        identity: &dyn IdentityResolver,
    ) -> EngineResult<Vec<SessionSummary>> {
        let Some(user_id) = identity.current_user_id() else {
            return Ok(Vec::new());
        };
        let sessions = SessionRepo::list_for_user(&self.pool, user_id).await?;
        Ok(sessions
            .into_iter()
            .map(|session| SessionSummary {
                is_host: session.host_id == user_id,
                session,
            })
            .collect())
    }

    /// Roster and currently visible photos for one session.
    ///
    /// `None` for unauthenticated callers and non-participants; `NotFound`
    /// only for a dangling id.
    pub async fn session_details(
        &self,
        identity: &dyn IdentityResolver,
        session_id: DbId,
    ) -> EngineResult<Option<SessionDetails>> {
        let Some(user_id) = identity.current_user_id() else {
            return Ok(None);
        };
        let Some(session) = SessionRepo::find_by_id(&self.pool, session_id).await? else {
            return Err(CoreError::NotFound {
                entity: "session",
                id: session_id,
            }
            .into());
        };
        if !self.directory.is_participant(session_id, user_id).await? {
            return Ok(None);
        }

        let participants = ParticipantRepo::list_for_session(&self.pool, session_id).await?;
        let visible = PhotoRepo::list_visible_in_session(&self.pool, session_id, user_id).await?;
        let photos = self.enrich_photos(visible, user_id).await?;

        Ok(Some(SessionDetails {
            is_host: session.host_id == user_id,
            session,
            participants,
            photos,
        }))
    }
}
