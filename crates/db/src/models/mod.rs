//! Row structs and insert DTOs for the storage layer.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts where callers supply input
//!
//! Status columns decode through the `candid-core` enums, so a stored value
//! outside the CHECK constraint surfaces as a column decode error instead of
//! leaking into domain logic.

pub mod photo;
pub mod session;
pub mod stats;
pub mod trade;
pub mod transfer;
