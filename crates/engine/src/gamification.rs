//! User statistics, badges, and the leaderboard.
//!
//! Stats rows are bookkeeping, written after capture and settlement commit;
//! the photos, trades, and transfer tables stay the source of truth. Badge
//! evaluation therefore aggregates from live rows, never from the counters
//! it is about to update.

use candid_core::badges::earned_badges;
use candid_db::models::stats::{LeaderboardEntry, UserBadge, UserStats};
use candid_db::repositories::StatsRepo;
use chrono::Utc;
use serde::Serialize;

use crate::error::EngineResult;
use crate::gate;
use crate::identity::IdentityResolver;
use crate::Engine;

/// A user's stats row together with every badge they hold.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub stats: UserStats,
    pub badges: Vec<UserBadge>,
}

impl Engine {
    // ── Queries ──────────────────────────────────────────────────────

    /// The caller's stats with badges. `None` when unauthenticated or when
    /// no stats row exists yet.
    pub async fn get_user_stats(
        &self,
        identity: &dyn IdentityResolver,
    ) -> EngineResult<Option<UserProfile>> {
        let Some(user_id) = identity.current_user_id() else {
            return Ok(None);
        };
        let Some(stats) = StatsRepo::find_by_user(&self.pool, user_id).await? else {
            return Ok(None);
        };
        let badges = StatsRepo::badges_for_user(&self.pool, user_id).await?;
        Ok(Some(UserProfile { stats, badges }))
    }

    /// Every known user ranked by photos captured, ties broken by trades
    /// completed. Empty when unauthenticated.
    pub async fn leaderboard(
        &self,
        identity: &dyn IdentityResolver,
    ) -> EngineResult<Vec<LeaderboardEntry>> {
        if identity.current_user_id().is_none() {
            return Ok(Vec::new());
        }
        Ok(StatsRepo::leaderboard(&self.pool).await?)
    }

    // ── Badge evaluation ─────────────────────────────────────────────

    /// Evaluate badge criteria against live rows and persist anything newly
    /// earned. Returns every badge the caller now holds.
    ///
    /// Deterministic and idempotent: a repeat call with unchanged data
    /// awards nothing and returns the same list.
    pub async fn calculate_and_assign_badges(
        &self,
        identity: &dyn IdentityResolver,
    ) -> EngineResult<Vec<UserBadge>> {
        let user_id = gate::require_user(identity)?;
        let now = Utc::now();

        StatsRepo::ensure_exists(&self.pool, user_id, now).await?;

        let inputs = StatsRepo::badge_inputs(&self.pool, user_id).await?;
        let earned = earned_badges(&inputs);
        let newly_awarded = StatsRepo::award_badges(&self.pool, user_id, &earned, now).await?;
        if !newly_awarded.is_empty() {
            let ids: Vec<&str> = newly_awarded.iter().map(|b| b.badge_id.as_str()).collect();
            tracing::info!(user_id, badges = ?ids, "Badges awarded");
        }

        Ok(StatsRepo::badges_for_user(&self.pool, user_id).await?)
    }

    // ── Reconciliation ───────────────────────────────────────────────

    /// Recompute every stats row from the photos, trades, and transfer
    /// tables. Idempotent maintenance pass; returns the number of rows
    /// refreshed.
    pub async fn refresh_all_user_stats(&self) -> EngineResult<u64> {
        let refreshed = StatsRepo::refresh_all(&self.pool).await?;
        tracing::info!(refreshed, "User stats refreshed from source tables");
        Ok(refreshed)
    }
}
