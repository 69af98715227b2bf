//! Badge catalog and award rules.
//!
//! Badges are append-only achievements: once earned they are never revoked,
//! and re-evaluating with the same inputs awards nothing new. The catalog
//! and its thresholds live here so the storage layer only ever persists
//! `(user_id, badge_id)` pairs it was handed.

// ---------------------------------------------------------------------------
// Badge ids
// ---------------------------------------------------------------------------

/// Captured at least [`SHARP_SHOOTER_SESSION_PHOTOS`] photos in one session.
pub const SHARP_SHOOTER: &str = "sharp_shooter";

/// Held a photo that has changed hands at least [`MOST_WANTED_TRADE_COUNT`]
/// times.
pub const MOST_WANTED: &str = "most_wanted";

/// Completed at least [`COLLECTOR_TOTAL_TRADES`] trades.
pub const COLLECTOR: &str = "collector";

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Photos captured in a single session for Sharp Shooter.
pub const SHARP_SHOOTER_SESSION_PHOTOS: i64 = 5;

/// Trade count on a currently-or-previously-held photo for Most Wanted.
pub const MOST_WANTED_TRADE_COUNT: i64 = 3;

/// Accepted trades (as either party) for Collector.
pub const COLLECTOR_TOTAL_TRADES: i64 = 10;

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// One badge definition: stable id plus display copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct BadgeSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub criteria: &'static str,
}

/// Every badge the system can award, in evaluation order.
pub const CATALOG: &[BadgeSpec] = &[
    BadgeSpec {
        id: SHARP_SHOOTER,
        name: "Sharp Shooter",
        criteria: "Capture 5 or more photos in a single session",
    },
    BadgeSpec {
        id: MOST_WANTED,
        name: "Most Wanted",
        criteria: "Hold a photo that has been traded 3 or more times",
    },
    BadgeSpec {
        id: COLLECTOR,
        name: "Collector",
        criteria: "Complete 10 or more trades",
    },
];

/// Look up a badge definition by its stable id.
pub fn find(id: &str) -> Option<&'static BadgeSpec> {
    CATALOG.iter().find(|spec| spec.id == id)
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Aggregates the evaluator needs, computed by the stats repository.
///
/// `max_photos_in_one_session` and `max_trade_count_on_held_photo` are maxima
/// over the user's history, so they never decrease and evaluation stays
/// monotone: earned badges remain earned on every later call.
#[derive(Debug, Clone, Copy, Default)]
pub struct BadgeInputs {
    /// Largest number of photos the user captured within any one session.
    pub max_photos_in_one_session: i64,
    /// Highest `trade_count` among photos the user captured or received.
    pub max_trade_count_on_held_photo: i64,
    /// Accepted trades involving the user on either side.
    pub total_trades: i64,
}

/// Evaluate which badges the inputs earn, in catalog order.
///
/// Callers diff the result against already-held badges; this function is
/// pure and makes no idempotence decisions itself.
pub fn earned_badges(inputs: &BadgeInputs) -> Vec<&'static BadgeSpec> {
    let mut earned = Vec::new();
    if inputs.max_photos_in_one_session >= SHARP_SHOOTER_SESSION_PHOTOS {
        earned.push(&CATALOG[0]);
    }
    if inputs.max_trade_count_on_held_photo >= MOST_WANTED_TRADE_COUNT {
        earned.push(&CATALOG[1]);
    }
    if inputs.total_trades >= COLLECTOR_TOTAL_TRADES {
        earned.push(&CATALOG[2]);
    }
    earned
}
