use crate::types::DbId;

/// Domain error taxonomy shared by the storage and engine layers.
///
/// Mutating operations validate these conditions before touching any row and
/// fail fast; the settlement path additionally re-checks ownership inside its
/// transaction and rolls back entirely on a late failure. Read-only queries
/// do not use `NotAuthenticated`/`NotAParticipant`: they degrade to empty
/// results instead, so a caller cannot probe membership through error shapes.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// No identity present on the call.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Identity present but lacking rights for this action (wrong trade
    /// responder, non-host reveal).
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// Session membership required.
    #[error("User {user_id} is not a participant of session {session_id}")]
    NotAParticipant { session_id: DbId, user_id: DbId },

    /// A referenced photo is not currently owned by the expected party.
    #[error("Photo {photo_id} is not owned by user {user_id}")]
    NotOwner { photo_id: DbId, user_id: DbId },

    /// Session or trade is not in the state the action requires.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Capture requires an active session.
    #[error("Session {session_id} is not active (status: {status})")]
    SessionNotActive { session_id: DbId, status: String },

    /// The trade was already accepted or rejected.
    #[error("Trade {trade_id} was already resolved (status: {status})")]
    AlreadyResolved { trade_id: DbId, status: String },

    /// Dangling reference to a session, photo, or trade.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Malformed input: empty or duplicated offer sets, self-trades, photos
    /// from a different session, and similar.
    #[error("Validation failed: {0}")]
    Validation(String),
}
