//! Photo entity model and DTOs.

use candid_core::types::{BlobRef, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A photo row from the `photos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Photo {
    pub id: DbId,
    pub session_id: DbId,
    /// The capturer. Never changes.
    pub original_owner_id: DbId,
    /// The current holder. Mutates only inside accepted-trade settlement.
    pub owner_id: DbId,
    pub blob_ref: BlobRef,
    pub is_revealed: bool,
    pub file_size: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub trade_count: i64,
    pub captured_at: Timestamp,
}

/// DTO for inserting a freshly captured photo.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePhoto {
    pub session_id: DbId,
    /// The capturer, recorded as both original and current owner.
    pub owner_id: DbId,
    pub blob_ref: BlobRef,
    pub file_size: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}
