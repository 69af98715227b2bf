//! Photo transfer audit model.

use candid_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// An audit row from the `photo_transfers` table.
///
/// Rows are written only by trade settlement, in the same transaction as the
/// ownership swap they record, and are never updated or deleted.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PhotoTransfer {
    pub id: DbId,
    pub photo_id: DbId,
    pub from_user_id: DbId,
    pub to_user_id: DbId,
    pub trade_id: DbId,
    pub transferred_at: Timestamp,
}
