//! Session lifecycle rules.
//!
//! A session moves one way through its lifecycle: participants capture photos
//! while it is `active`, the host reveals it exactly once, and trading only
//! opens while it is `revealed`. `ended` is terminal. These rules live in
//! `core` (zero internal deps) so the storage and engine layers share a
//! single source of truth for what each state permits.

use std::fmt;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Status enum
// ---------------------------------------------------------------------------

/// Lifecycle state of a capture session, stored in `sessions.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Capture window is open. Photos stay hidden from everyone except
    /// their capturer.
    Active,
    /// The host revealed the session. Photos are visible to participants
    /// and trading is open.
    Revealed,
    /// Closed for good. No captures, reveals, joins, or new trades.
    Ended,
}

impl SessionStatus {
    /// Stable string form stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Revealed => "revealed",
            Self::Ended => "ended",
        }
    }

    /// Parse the stored string form back into the enum.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "active" => Ok(Self::Active),
            "revealed" => Ok(Self::Revealed),
            "ended" => Ok(Self::Ended),
            other => Err(CoreError::Validation(format!(
                "unknown session status '{other}'"
            ))),
        }
    }

    /// Photos can only be captured while the session is active.
    pub fn accepts_captures(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Trades can only be proposed after the host reveals the session.
    pub fn accepts_trades(self) -> bool {
        matches!(self, Self::Revealed)
    }

    /// New participants may join any session that has not ended. Joining a
    /// revealed session is allowed so latecomers can still receive trades.
    pub fn accepts_joins(self) -> bool {
        !matches!(self, Self::Ended)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for SessionStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Returns the set of states reachable from `from`.
///
/// The lifecycle is strictly one-way. `Ended` returns an empty slice because
/// no further transitions are allowed.
pub fn valid_transitions(from: SessionStatus) -> &'static [SessionStatus] {
    match from {
        SessionStatus::Active => &[SessionStatus::Revealed, SessionStatus::Ended],
        SessionStatus::Revealed => &[SessionStatus::Ended],
        SessionStatus::Ended => &[],
    }
}

/// Check whether a transition from `from` to `to` is valid.
pub fn can_transition(from: SessionStatus, to: SessionStatus) -> bool {
    valid_transitions(from).contains(&to)
}

/// Validate a reveal attempt against the current status.
///
/// Reveal is one-shot: a second attempt finds the session already revealed
/// and fails here without touching any photo rows.
pub fn validate_reveal(status: SessionStatus, session_id: DbId) -> Result<(), CoreError> {
    match status {
        SessionStatus::Active => Ok(()),
        other => Err(CoreError::InvalidState(format!(
            "session {session_id} cannot be revealed from status '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // String round-trip
    // -----------------------------------------------------------------------

    #[test]
    fn parse_known_statuses() {
        assert_eq!(SessionStatus::parse("active").unwrap(), SessionStatus::Active);
        assert_eq!(
            SessionStatus::parse("revealed").unwrap(),
            SessionStatus::Revealed
        );
        assert_eq!(SessionStatus::parse("ended").unwrap(), SessionStatus::Ended);
    }

    #[test]
    fn parse_unknown_status_fails() {
        let err = SessionStatus::parse("archived").unwrap_err();
        assert!(err.to_string().contains("unknown session status"));
    }

    #[test]
    fn display_matches_stored_form() {
        assert_eq!(SessionStatus::Revealed.to_string(), "revealed");
    }

    // -----------------------------------------------------------------------
    // Lifecycle permissions
    // -----------------------------------------------------------------------

    #[test]
    fn only_active_accepts_captures() {
        assert!(SessionStatus::Active.accepts_captures());
        assert!(!SessionStatus::Revealed.accepts_captures());
        assert!(!SessionStatus::Ended.accepts_captures());
    }

    #[test]
    fn only_revealed_accepts_trades() {
        assert!(!SessionStatus::Active.accepts_trades());
        assert!(SessionStatus::Revealed.accepts_trades());
        assert!(!SessionStatus::Ended.accepts_trades());
    }

    #[test]
    fn ended_rejects_joins() {
        assert!(SessionStatus::Active.accepts_joins());
        assert!(SessionStatus::Revealed.accepts_joins());
        assert!(!SessionStatus::Ended.accepts_joins());
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    #[test]
    fn active_to_revealed() {
        assert!(can_transition(SessionStatus::Active, SessionStatus::Revealed));
    }

    #[test]
    fn active_to_ended() {
        assert!(can_transition(SessionStatus::Active, SessionStatus::Ended));
    }

    #[test]
    fn revealed_to_ended() {
        assert!(can_transition(SessionStatus::Revealed, SessionStatus::Ended));
    }

    #[test]
    fn no_backwards_transitions() {
        assert!(!can_transition(SessionStatus::Revealed, SessionStatus::Active));
        assert!(!can_transition(SessionStatus::Ended, SessionStatus::Active));
        assert!(!can_transition(SessionStatus::Ended, SessionStatus::Revealed));
    }

    #[test]
    fn ended_is_terminal() {
        assert!(valid_transitions(SessionStatus::Ended).is_empty());
    }

    #[test]
    fn reveal_allowed_only_from_active() {
        assert!(validate_reveal(SessionStatus::Active, 1).is_ok());
        assert!(validate_reveal(SessionStatus::Revealed, 1).is_err());
        assert!(validate_reveal(SessionStatus::Ended, 1).is_err());
    }

    #[test]
    fn second_reveal_reports_current_status() {
        let err = validate_reveal(SessionStatus::Revealed, 42).unwrap_err();
        assert!(err.to_string().contains("revealed"));
        assert!(err.to_string().contains("42"));
    }
}
