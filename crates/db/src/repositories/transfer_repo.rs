//! Repository for the `photo_transfers` audit table.
//!
//! Read-only: transfer rows are written exclusively by
//! [`crate::repositories::TradeRepo::settle`] inside the settlement
//! transaction.

use candid_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::transfer::PhotoTransfer;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, photo_id, from_user_id, to_user_id, trade_id, transferred_at";

/// Provides read access to the ownership audit trail.
pub struct TransferRepo;

impl TransferRepo {
    /// A photo's full custody history, oldest first.
    pub async fn list_for_photo(
        pool: &SqlitePool,
        photo_id: DbId,
    ) -> Result<Vec<PhotoTransfer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM photo_transfers \
             WHERE photo_id = ? ORDER BY transferred_at, id"
        );
        sqlx::query_as::<_, PhotoTransfer>(&query)
            .bind(photo_id)
            .fetch_all(pool)
            .await
    }

    /// Every transfer a trade produced.
    pub async fn list_for_trade(
        pool: &SqlitePool,
        trade_id: DbId,
    ) -> Result<Vec<PhotoTransfer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM photo_transfers WHERE trade_id = ? ORDER BY id");
        sqlx::query_as::<_, PhotoTransfer>(&query)
            .bind(trade_id)
            .fetch_all(pool)
            .await
    }

    /// How many transfer rows a photo has. Must always equal the photo's
    /// `trade_count`.
    pub async fn count_for_photo(pool: &SqlitePool, photo_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM photo_transfers WHERE photo_id = ?")
            .bind(photo_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// How many photos the user has received through trades.
    pub async fn count_received_by(pool: &SqlitePool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM photo_transfers WHERE to_user_id = ?")
                .bind(user_id)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }
}
