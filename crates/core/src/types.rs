/// All database primary keys are 64-bit SQLite INTEGER (rowid) columns.
pub type DbId = i64;

/// All timestamps are UTC. They are set in Rust code, not by SQL defaults,
/// so a single clock ordering covers every table.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Opaque reference into the blob store. The default store uses the content
/// digest, but callers must treat the value as a black box.
pub type BlobRef = String;
