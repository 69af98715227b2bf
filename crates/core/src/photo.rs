//! Photo visibility and tradability rules.
//!
//! Photos are hidden until their session is revealed; only the capturer can
//! see their own unrevealed shots. After reveal, ownership (not capture)
//! decides who may put a photo into a trade.

use crate::types::DbId;

/// Can `viewer` see this photo in a session listing?
///
/// Revealed photos are visible to every participant. Unrevealed photos are
/// visible only to the user who captured them, regardless of current
/// ownership (ownership cannot change before reveal anyway).
pub fn is_visible_to(is_revealed: bool, original_owner_id: DbId, viewer_id: DbId) -> bool {
    is_revealed || original_owner_id == viewer_id
}

/// Can `viewer` request this photo in a trade?
///
/// Only revealed photos are tradable, and only photos the viewer does not
/// already hold. You request what you lack and offer what you own.
pub fn is_tradable_by(is_revealed: bool, owner_id: DbId, viewer_id: DbId) -> bool {
    is_revealed && owner_id != viewer_id
}
