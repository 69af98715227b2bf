//! Repository for the `trades` and `trade_photos` tables.
//!
//! Settlement is the one place in the system where photo ownership mutates.
//! It runs as a single transaction: claim the pending trade with a guarded
//! status flip, then swap each photo with a guarded owner update and record
//! its transfer. Any guard miss drops the transaction, so either every
//! mutation is observed or none.

use candid_core::trade::TradeSide;
use candid_core::types::{DbId, Timestamp};
use sqlx::SqlitePool;

use crate::models::trade::{CreateTrade, Trade, TradePhoto};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, session_id, from_user_id, to_user_id, status, created_at, completed_at";

/// Outcome of a settlement attempt.
#[derive(Debug)]
pub enum SettlementOutcome {
    /// The trade is accepted, ownership moved, transfers recorded.
    Settled(SettledTrade),
    /// The trade was no longer pending. Nothing was mutated.
    StatusConflict,
    /// A photo changed hands since proposal. Nothing was mutated and the
    /// trade is still pending.
    OwnershipConflict {
        photo_id: DbId,
        expected_owner_id: DbId,
    },
}

/// A successful settlement with the per-party receipt counts the stats
/// layer needs.
#[derive(Debug)]
pub struct SettledTrade {
    pub trade: Trade,
    /// Photos the proposer received (the requested set).
    pub photos_to_proposer: i64,
    /// Photos the responder received (the offered set).
    pub photos_to_responder: i64,
}

/// Provides proposal, listing, and settlement operations for trades.
pub struct TradeRepo;

impl TradeRepo {
    // ── Proposal ─────────────────────────────────────────────────────

    /// Insert a pending trade together with both offer sets, in one
    /// transaction. `position` preserves the order the proposer listed.
    pub async fn create(
        pool: &SqlitePool,
        input: &CreateTrade,
        now: Timestamp,
    ) -> Result<Trade, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO trades (session_id, from_user_id, to_user_id, status, created_at) \
             VALUES (?, ?, ?, 'pending', ?) \
             RETURNING {COLUMNS}"
        );
        let trade = sqlx::query_as::<_, Trade>(&query)
            .bind(input.session_id)
            .bind(input.from_user_id)
            .bind(input.to_user_id)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        for (position, photo_id) in input.offered_photo_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO trade_photos (trade_id, photo_id, side, position) \
                 VALUES (?, ?, 'offered', ?)",
            )
            .bind(trade.id)
            .bind(*photo_id)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }
        for (position, photo_id) in input.requested_photo_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO trade_photos (trade_id, photo_id, side, position) \
                 VALUES (?, ?, 'requested', ?)",
            )
            .bind(trade.id)
            .bind(*photo_id)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(trade)
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Find a trade by its ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Trade>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM trades WHERE id = ?");
        sqlx::query_as::<_, Trade>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Both offer sets for a trade, each in proposal order.
    pub async fn offer_sets(
        pool: &SqlitePool,
        trade_id: DbId,
    ) -> Result<(Vec<DbId>, Vec<DbId>), sqlx::Error> {
        let rows = sqlx::query_as::<_, TradePhoto>(
            "SELECT trade_id, photo_id, side, position FROM trade_photos \
             WHERE trade_id = ? ORDER BY side, position",
        )
        .bind(trade_id)
        .fetch_all(pool)
        .await?;

        let mut offered = Vec::new();
        let mut requested = Vec::new();
        for row in rows {
            match row.side {
                TradeSide::Offered => offered.push(row.photo_id),
                TradeSide::Requested => requested.push(row.photo_id),
            }
        }
        Ok((offered, requested))
    }

    /// Trades the user sent or received in a session, newest first.
    pub async fn list_for_user_in_session(
        pool: &SqlitePool,
        session_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<Trade>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM trades \
             WHERE session_id = ? AND (from_user_id = ? OR to_user_id = ?) \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Trade>(&query)
            .bind(session_id)
            .bind(user_id)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    // ── Resolution ───────────────────────────────────────────────────

    /// Flip a pending trade to rejected. Guarded on `status = 'pending'`;
    /// returns `None` when the trade was already resolved (or missing).
    pub async fn reject(pool: &SqlitePool, id: DbId) -> Result<Option<Trade>, sqlx::Error> {
        let query = format!(
            "UPDATE trades SET status = 'rejected' \
             WHERE id = ? AND status = 'pending' \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Trade>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Accept and settle a pending trade.
    ///
    /// Claims the trade first with a guarded status flip; of two concurrent
    /// responders exactly one claim succeeds and the other sees
    /// [`SettlementOutcome::StatusConflict`]. Each photo swap is guarded on
    /// the owner recorded at proposal time, so a photo that changed hands
    /// through another settled trade aborts the whole transaction with
    /// [`SettlementOutcome::OwnershipConflict`] and the trade stays pending.
    pub async fn settle(
        pool: &SqlitePool,
        trade_id: DbId,
        now: Timestamp,
    ) -> Result<SettlementOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE trades SET status = 'accepted', completed_at = ? \
             WHERE id = ? AND status = 'pending' \
             RETURNING {COLUMNS}"
        );
        let trade = sqlx::query_as::<_, Trade>(&query)
            .bind(now)
            .bind(trade_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(trade) = trade else {
            return Ok(SettlementOutcome::StatusConflict);
        };

        let rows = sqlx::query_as::<_, TradePhoto>(
            "SELECT trade_id, photo_id, side, position FROM trade_photos \
             WHERE trade_id = ? ORDER BY side, position",
        )
        .bind(trade_id)
        .fetch_all(&mut *tx)
        .await?;

        let mut photos_to_proposer = 0i64;
        let mut photos_to_responder = 0i64;
        for row in &rows {
            // Offered photos flow proposer -> responder, requested ones back.
            let (from_user, to_user) = match row.side {
                TradeSide::Offered => (trade.from_user_id, trade.to_user_id),
                TradeSide::Requested => (trade.to_user_id, trade.from_user_id),
            };

            let swapped = sqlx::query(
                "UPDATE photos SET owner_id = ?, trade_count = trade_count + 1 \
                 WHERE id = ? AND owner_id = ?",
            )
            .bind(to_user)
            .bind(row.photo_id)
            .bind(from_user)
            .execute(&mut *tx)
            .await?;

            // Dropping the transaction rolls back the claim and every
            // prior swap.
            if swapped.rows_affected() == 0 {
                return Ok(SettlementOutcome::OwnershipConflict {
                    photo_id: row.photo_id,
                    expected_owner_id: from_user,
                });
            }

            sqlx::query(
                "INSERT INTO photo_transfers \
                    (photo_id, from_user_id, to_user_id, trade_id, transferred_at) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(row.photo_id)
            .bind(from_user)
            .bind(to_user)
            .bind(trade_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            match row.side {
                TradeSide::Offered => photos_to_responder += 1,
                TradeSide::Requested => photos_to_proposer += 1,
            }
        }

        tx.commit().await?;
        Ok(SettlementOutcome::Settled(SettledTrade {
            trade,
            photos_to_proposer,
            photos_to_responder,
        }))
    }
}
