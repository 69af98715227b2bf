//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&SqlitePool` as the first argument. Multi-step mutations open
//! their own transaction so callers get all-or-nothing semantics without
//! managing one.

pub mod participant_repo;
pub mod photo_repo;
pub mod session_repo;
pub mod stats_repo;
pub mod trade_repo;
pub mod transfer_repo;

pub use participant_repo::ParticipantRepo;
pub use photo_repo::PhotoRepo;
pub use session_repo::SessionRepo;
pub use stats_repo::StatsRepo;
pub use trade_repo::{SettledTrade, SettlementOutcome, TradeRepo};
pub use transfer_repo::TransferRepo;
