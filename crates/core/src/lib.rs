//! Domain rules for the Candid photo-trading backend.
//!
//! This crate has no internal dependencies so it can be used by the storage
//! layer, the engine, and any future worker or CLI tooling. It holds the
//! pieces every layer agrees on: id and timestamp aliases, the error
//! taxonomy, the session and trade state machines, offer-set validation,
//! photo visibility rules, and the badge catalog.

pub mod badges;
pub mod error;
pub mod photo;
pub mod session;
pub mod trade;
pub mod types;
