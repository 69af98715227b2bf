//! Trade status machine and offer-set validation.
//!
//! A trade is a two-sided exchange proposal: the proposer offers a set of
//! their own photos against a set of the counterparty's. Acceptance settles
//! both sides at once; rejection resolves the trade with no transfer. Both
//! resolved states are terminal.

use std::collections::HashSet;
use std::fmt;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Status enum
// ---------------------------------------------------------------------------

/// Lifecycle state of a trade, stored in `trades.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeStatus {
    /// Awaiting the counterparty's response.
    Pending,
    /// Accepted and settled. Ownership moved, transfers recorded.
    Accepted,
    /// Declined by the counterparty. No ownership change.
    Rejected,
}

impl TradeStatus {
    /// Stable string form stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Parse the stored string form back into the enum.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            other => Err(CoreError::Validation(format!(
                "unknown trade status '{other}'"
            ))),
        }
    }

    /// A resolved trade can never change status again.
    pub fn is_resolved(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Only `Pending -> Accepted` and `Pending -> Rejected` exist.
    pub fn can_transition_to(self, to: TradeStatus) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Accepted) | (Self::Pending, Self::Rejected)
        )
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for TradeStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

// ---------------------------------------------------------------------------
// Offer sides
// ---------------------------------------------------------------------------

/// Which side of the exchange a `trade_photos` row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeSide {
    /// Photos the proposer puts up.
    Offered,
    /// Photos the proposer wants from the counterparty.
    Requested,
}

impl TradeSide {
    /// Stable string form stored in `trade_photos.side`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Offered => "offered",
            Self::Requested => "requested",
        }
    }

    /// Parse the stored string form back into the enum.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "offered" => Ok(Self::Offered),
            "requested" => Ok(Self::Requested),
            other => Err(CoreError::Validation(format!("unknown trade side '{other}'"))),
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for TradeSide {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

// ---------------------------------------------------------------------------
// Offer-set validation
// ---------------------------------------------------------------------------

/// Validate the shape of a proposal's offer sets.
///
/// Checks only what can be known without the database: both sides non-empty,
/// no duplicate ids within a side, and no photo appearing on both sides.
/// Ownership and session membership of each photo are checked against live
/// rows by the proposal engine.
pub fn validate_offer_sets(offered: &[DbId], requested: &[DbId]) -> Result<(), CoreError> {
    if offered.is_empty() {
        return Err(CoreError::Validation(
            "a trade must offer at least one photo".to_string(),
        ));
    }
    if requested.is_empty() {
        return Err(CoreError::Validation(
            "a trade must request at least one photo".to_string(),
        ));
    }

    let offered_set: HashSet<DbId> = offered.iter().copied().collect();
    if offered_set.len() != offered.len() {
        return Err(CoreError::Validation(
            "duplicate photo in offered set".to_string(),
        ));
    }
    let requested_set: HashSet<DbId> = requested.iter().copied().collect();
    if requested_set.len() != requested.len() {
        return Err(CoreError::Validation(
            "duplicate photo in requested set".to_string(),
        ));
    }

    if let Some(id) = offered_set.intersection(&requested_set).next() {
        return Err(CoreError::Validation(format!(
            "photo {id} appears on both sides of the trade"
        )));
    }

    Ok(())
}

/// Validate the parties of a proposal. Trading with yourself is rejected.
pub fn validate_parties(from_user_id: DbId, to_user_id: DbId) -> Result<(), CoreError> {
    if from_user_id == to_user_id {
        return Err(CoreError::Validation(
            "cannot propose a trade to yourself".to_string(),
        ));
    }
    Ok(())
}
