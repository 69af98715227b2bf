//! Repository for the `user_stats` and `user_badges` tables.
//!
//! Stats are bookkeeping, not source of truth: capture and settlement bump
//! counters incrementally after their own transactions commit, and
//! [`StatsRepo::refresh_all`] recomputes every row from the photo, trade,
//! and transfer tables to repair any drift.

use std::collections::HashMap;

use candid_core::badges::{BadgeInputs, BadgeSpec};
use candid_core::types::{DbId, Timestamp};
use sqlx::SqlitePool;

use crate::models::stats::{LeaderboardEntry, UserBadge, UserStats};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "user_id, total_photos, total_trades, sessions_attended, \
    photos_received, joined_at, last_activity";

/// Column list for the `user_badges` table.
const BADGE_COLUMNS: &str = "user_id, badge_id, name, criteria, earned_at";

/// Provides aggregate bookkeeping, badge persistence, and the leaderboard.
pub struct StatsRepo;

impl StatsRepo {
    // ── Row access ───────────────────────────────────────────────────

    /// A user's stats row, if one exists yet.
    pub async fn find_by_user(
        pool: &SqlitePool,
        user_id: DbId,
    ) -> Result<Option<UserStats>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_stats WHERE user_id = ?");
        sqlx::query_as::<_, UserStats>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Create an all-zero stats row if the user has none. Idempotent.
    pub async fn ensure_exists(
        pool: &SqlitePool,
        user_id: DbId,
        now: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO user_stats \
                (user_id, total_photos, total_trades, sessions_attended, \
                 photos_received, joined_at, last_activity) \
             VALUES (?, 0, 0, 0, 0, ?, ?) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;
        Ok(())
    }

    // ── Incremental bookkeeping ──────────────────────────────────────

    /// Record one captured photo: `total_photos` + 1, `sessions_attended`
    /// recomputed from captured photos, `last_activity` stamped. Creates the
    /// row on first capture.
    ///
    /// Called after the photo insert committed, so the distinct-session
    /// count already includes the new photo.
    pub async fn record_capture(
        pool: &SqlitePool,
        user_id: DbId,
        now: Timestamp,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let sessions: (i64,) = sqlx::query_as(
            "SELECT COUNT(DISTINCT session_id) FROM photos WHERE original_owner_id = ?",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO user_stats \
                (user_id, total_photos, total_trades, sessions_attended, \
                 photos_received, joined_at, last_activity) \
             VALUES (?, 1, 0, ?, 0, ?, ?) \
             ON CONFLICT (user_id) DO UPDATE SET \
                 total_photos = total_photos + 1, \
                 sessions_attended = excluded.sessions_attended, \
                 last_activity = excluded.last_activity",
        )
        .bind(user_id)
        .bind(sessions.0)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Record one settled trade for both parties: `total_trades` + 1 each,
    /// `photos_received` bumped by what each side took home,
    /// `last_activity` stamped.
    pub async fn record_settlement(
        pool: &SqlitePool,
        from_user_id: DbId,
        to_user_id: DbId,
        photos_to_proposer: i64,
        photos_to_responder: i64,
        now: Timestamp,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        for (user_id, received) in [
            (from_user_id, photos_to_proposer),
            (to_user_id, photos_to_responder),
        ] {
            sqlx::query(
                "INSERT INTO user_stats \
                    (user_id, total_photos, total_trades, sessions_attended, \
                     photos_received, joined_at, last_activity) \
                 VALUES (?, 0, 1, 0, ?, ?, ?) \
                 ON CONFLICT (user_id) DO UPDATE SET \
                     total_trades = total_trades + 1, \
                     photos_received = photos_received + excluded.photos_received, \
                     last_activity = excluded.last_activity",
            )
            .bind(user_id)
            .bind(received)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Recompute every stats row from the underlying tables.
    ///
    /// Idempotent and safe alongside live traffic; one guarded pass, no
    /// ownership data touched, `last_activity` left alone. Returns how many
    /// rows were refreshed.
    pub async fn refresh_all(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_stats SET \
                total_photos = (SELECT COUNT(*) FROM photos p \
                    WHERE p.original_owner_id = user_stats.user_id), \
                total_trades = (SELECT COUNT(*) FROM trades t \
                    WHERE t.status = 'accepted' \
                      AND (t.from_user_id = user_stats.user_id \
                        OR t.to_user_id = user_stats.user_id)), \
                sessions_attended = (SELECT COUNT(DISTINCT p.session_id) FROM photos p \
                    WHERE p.original_owner_id = user_stats.user_id), \
                photos_received = (SELECT COUNT(*) FROM photo_transfers x \
                    WHERE x.to_user_id = user_stats.user_id)",
        )
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    // ── Badges ───────────────────────────────────────────────────────

    /// The badges a user has earned, oldest first.
    pub async fn badges_for_user(
        pool: &SqlitePool,
        user_id: DbId,
    ) -> Result<Vec<UserBadge>, sqlx::Error> {
        let query = format!(
            "SELECT {BADGE_COLUMNS} FROM user_badges \
             WHERE user_id = ? ORDER BY earned_at, badge_id"
        );
        sqlx::query_as::<_, UserBadge>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Aggregates for badge evaluation, computed from live rows rather than
    /// the (possibly stale) stats counters.
    pub async fn badge_inputs(
        pool: &SqlitePool,
        user_id: DbId,
    ) -> Result<BadgeInputs, sqlx::Error> {
        let per_session: (i64,) = sqlx::query_as(
            "SELECT COALESCE(MAX(cnt), 0) FROM ( \
                SELECT COUNT(*) AS cnt FROM photos \
                WHERE original_owner_id = ? GROUP BY session_id)",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        // Captured photos plus photos ever received cover everything the
        // user has held at any point.
        let held_trade_count: (i64,) = sqlx::query_as(
            "SELECT COALESCE(MAX(trade_count), 0) FROM photos \
             WHERE original_owner_id = ? \
                OR id IN (SELECT photo_id FROM photo_transfers WHERE to_user_id = ?)",
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        let trades: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM trades \
             WHERE status = 'accepted' AND (from_user_id = ? OR to_user_id = ?)",
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(BadgeInputs {
            max_photos_in_one_session: per_session.0,
            max_trade_count_on_held_photo: held_trade_count.0,
            total_trades: trades.0,
        })
    }

    /// Persist newly earned badges, skipping any the user already holds.
    ///
    /// Returns only the rows actually inserted, so a repeat evaluation with
    /// unchanged inputs returns an empty list.
    pub async fn award_badges(
        pool: &SqlitePool,
        user_id: DbId,
        specs: &[&'static BadgeSpec],
        now: Timestamp,
    ) -> Result<Vec<UserBadge>, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_badges (user_id, badge_id, name, criteria, earned_at) \
             VALUES (?, ?, ?, ?, ?) \
             ON CONFLICT (user_id, badge_id) DO NOTHING \
             RETURNING {BADGE_COLUMNS}"
        );

        let mut awarded = Vec::new();
        for spec in specs {
            let inserted = sqlx::query_as::<_, UserBadge>(&query)
                .bind(user_id)
                .bind(spec.id)
                .bind(spec.name)
                .bind(spec.criteria)
                .bind(now)
                .fetch_optional(pool)
                .await?;
            if let Some(badge) = inserted {
                awarded.push(badge);
            }
        }
        Ok(awarded)
    }

    // ── Leaderboard ──────────────────────────────────────────────────

    /// Every stats row ordered by photos captured, ties broken by trades
    /// completed, each carrying the user's badge ids.
    pub async fn leaderboard(pool: &SqlitePool) -> Result<Vec<LeaderboardEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_stats \
             ORDER BY total_photos DESC, total_trades DESC, user_id"
        );
        let stats = sqlx::query_as::<_, UserStats>(&query).fetch_all(pool).await?;

        let badge_rows: Vec<(DbId, String)> =
            sqlx::query_as("SELECT user_id, badge_id FROM user_badges ORDER BY earned_at, badge_id")
                .fetch_all(pool)
                .await?;
        let mut badges_by_user: HashMap<DbId, Vec<String>> = HashMap::new();
        for (user_id, badge_id) in badge_rows {
            badges_by_user.entry(user_id).or_default().push(badge_id);
        }

        Ok(stats
            .into_iter()
            .map(|s| LeaderboardEntry {
                user_id: s.user_id,
                total_photos: s.total_photos,
                total_trades: s.total_trades,
                sessions_attended: s.sessions_attended,
                badges: badges_by_user.remove(&s.user_id).unwrap_or_default(),
            })
            .collect())
    }
}
