//! Trade entity model and DTOs.

use candid_core::trade::{TradeSide, TradeStatus};
use candid_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A trade row from the `trades` table. The offer sets live in
/// `trade_photos` and are loaded separately.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Trade {
    pub id: DbId,
    pub session_id: DbId,
    pub from_user_id: DbId,
    pub to_user_id: DbId,
    #[sqlx(try_from = "String")]
    pub status: TradeStatus,
    pub created_at: Timestamp,
    /// Set once, when the trade is accepted.
    pub completed_at: Option<Timestamp>,
}

/// DTO for creating a pending trade with both offer sets.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTrade {
    pub session_id: DbId,
    pub from_user_id: DbId,
    pub to_user_id: DbId,
    pub offered_photo_ids: Vec<DbId>,
    pub requested_photo_ids: Vec<DbId>,
}

/// An offer-set row from the `trade_photos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TradePhoto {
    pub trade_id: DbId,
    pub photo_id: DbId,
    #[sqlx(try_from = "String")]
    pub side: TradeSide,
    pub position: i64,
}
