//! User statistics and badge models.

use candid_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A stats row from the `user_stats` table. Created lazily on a user's
/// first capture or settlement.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserStats {
    pub user_id: DbId,
    pub total_photos: i64,
    pub total_trades: i64,
    pub sessions_attended: i64,
    pub photos_received: i64,
    pub joined_at: Timestamp,
    pub last_activity: Timestamp,
}

/// An earned badge row from the `user_badges` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserBadge {
    pub user_id: DbId,
    pub badge_id: String,
    pub name: String,
    pub criteria: String,
    pub earned_at: Timestamp,
}

/// One leaderboard entry: a stats row plus the user's badge ids, assembled
/// by the stats repository.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub user_id: DbId,
    pub total_photos: i64,
    pub total_trades: i64,
    pub sessions_attended: i64,
    pub badges: Vec<String>,
}
