//! Integration tests for stats bookkeeping, badges, and the leaderboard.
//!
//! Exercises `StatsRepo` against a real database:
//! - Capture and settlement bookkeeping create rows lazily and bump counters
//! - `refresh_all` recomputes rows from the underlying tables
//! - Badge awards are append-only and idempotent
//! - Leaderboard orders by photos, then trades

use candid_core::badges;
use candid_core::types::{DbId, Timestamp};
use candid_db::models::photo::CreatePhoto;
use candid_db::models::session::CreateSession;
use candid_db::models::trade::CreateTrade;
use candid_db::repositories::{PhotoRepo, SessionRepo, StatsRepo, TradeRepo};
use sqlx::SqlitePool;

const ALICE: DbId = 1;
const BOB: DbId = 2;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn now() -> Timestamp {
    chrono::Utc::now()
}

async fn seed_session(pool: &SqlitePool, name: &str) -> DbId {
    SessionRepo::create(
        pool,
        &CreateSession {
            name: name.to_string(),
            host_id: ALICE,
            reveal_time: None,
        },
        now(),
    )
    .await
    .unwrap()
    .id
}

async fn seed_photo(pool: &SqlitePool, session_id: DbId, owner: DbId, blob: &str) -> DbId {
    PhotoRepo::create(
        pool,
        &CreatePhoto {
            session_id,
            owner_id: owner,
            blob_ref: blob.to_string(),
            file_size: None,
            width: None,
            height: None,
        },
        now(),
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Test: capture bookkeeping
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_record_capture_creates_then_increments(pool: SqlitePool) {
    let s1 = seed_session(&pool, "First").await;
    let s2 = seed_session(&pool, "Second").await;

    assert!(StatsRepo::find_by_user(&pool, ALICE).await.unwrap().is_none());

    seed_photo(&pool, s1, ALICE, "p1").await;
    StatsRepo::record_capture(&pool, ALICE, now()).await.unwrap();

    let stats = StatsRepo::find_by_user(&pool, ALICE).await.unwrap().unwrap();
    assert_eq!(stats.total_photos, 1);
    assert_eq!(stats.sessions_attended, 1);
    assert_eq!(stats.total_trades, 0);

    seed_photo(&pool, s2, ALICE, "p2").await;
    StatsRepo::record_capture(&pool, ALICE, now()).await.unwrap();

    let stats = StatsRepo::find_by_user(&pool, ALICE).await.unwrap().unwrap();
    assert_eq!(stats.total_photos, 2);
    assert_eq!(stats.sessions_attended, 2, "distinct sessions recomputed");
}

// ---------------------------------------------------------------------------
// Test: settlement bookkeeping touches both parties
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_record_settlement_updates_both_parties(pool: SqlitePool) {
    StatsRepo::record_settlement(&pool, ALICE, BOB, 1, 2, now())
        .await
        .unwrap();

    let alice = StatsRepo::find_by_user(&pool, ALICE).await.unwrap().unwrap();
    assert_eq!(alice.total_trades, 1);
    assert_eq!(alice.photos_received, 1);

    let bob = StatsRepo::find_by_user(&pool, BOB).await.unwrap().unwrap();
    assert_eq!(bob.total_trades, 1);
    assert_eq!(bob.photos_received, 2);
}

// ---------------------------------------------------------------------------
// Test: refresh_all repairs drifted counters
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_all_recomputes_from_tables(pool: SqlitePool) {
    let session_id = seed_session(&pool, "Drift").await;
    let a1 = seed_photo(&pool, session_id, ALICE, "a1").await;
    let b1 = seed_photo(&pool, session_id, BOB, "b1").await;

    let trade = TradeRepo::create(
        &pool,
        &CreateTrade {
            session_id,
            from_user_id: ALICE,
            to_user_id: BOB,
            offered_photo_ids: vec![a1],
            requested_photo_ids: vec![b1],
        },
        now(),
    )
    .await
    .unwrap();
    TradeRepo::settle(&pool, trade.id, now()).await.unwrap();

    // Plant a drifted row for Alice and none of the incremental updates.
    StatsRepo::ensure_exists(&pool, ALICE, now()).await.unwrap();
    sqlx::query("UPDATE user_stats SET total_photos = 99, total_trades = 99 WHERE user_id = ?")
        .bind(ALICE)
        .execute(&pool)
        .await
        .unwrap();
    StatsRepo::ensure_exists(&pool, BOB, now()).await.unwrap();

    let refreshed = StatsRepo::refresh_all(&pool).await.unwrap();
    assert_eq!(refreshed, 2);

    let alice = StatsRepo::find_by_user(&pool, ALICE).await.unwrap().unwrap();
    assert_eq!(alice.total_photos, 1, "recomputed from captured photos");
    assert_eq!(alice.total_trades, 1, "recomputed from accepted trades");
    assert_eq!(alice.sessions_attended, 1);
    assert_eq!(alice.photos_received, 1);

    let bob = StatsRepo::find_by_user(&pool, BOB).await.unwrap().unwrap();
    assert_eq!(bob.total_photos, 1);
    assert_eq!(bob.photos_received, 1);

    // Running it again changes nothing.
    StatsRepo::refresh_all(&pool).await.unwrap();
    let alice_again = StatsRepo::find_by_user(&pool, ALICE).await.unwrap().unwrap();
    assert_eq!(alice_again.total_photos, alice.total_photos);
    assert_eq!(alice_again.total_trades, alice.total_trades);
}

// ---------------------------------------------------------------------------
// Test: badge awards are idempotent
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_award_badges_skips_already_held(pool: SqlitePool) {
    let spec = badges::find(badges::SHARP_SHOOTER).unwrap();

    let first = StatsRepo::award_badges(&pool, ALICE, &[spec], now())
        .await
        .unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].badge_id, badges::SHARP_SHOOTER);
    assert_eq!(first[0].name, "Sharp Shooter");

    let second = StatsRepo::award_badges(&pool, ALICE, &[spec], now())
        .await
        .unwrap();
    assert!(second.is_empty(), "re-award returns nothing new");

    let held = StatsRepo::badges_for_user(&pool, ALICE).await.unwrap();
    assert_eq!(held.len(), 1, "no duplicate rows");
}

// ---------------------------------------------------------------------------
// Test: badge inputs reflect live rows
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_badge_inputs_from_live_rows(pool: SqlitePool) {
    let s1 = seed_session(&pool, "Busy").await;
    let s2 = seed_session(&pool, "Quiet").await;
    for i in 0..4 {
        seed_photo(&pool, s1, ALICE, &format!("s1-{i}")).await;
    }
    seed_photo(&pool, s2, ALICE, "s2-0").await;
    let b1 = seed_photo(&pool, s1, BOB, "b1").await;

    let inputs = StatsRepo::badge_inputs(&pool, ALICE).await.unwrap();
    assert_eq!(inputs.max_photos_in_one_session, 4);
    assert_eq!(inputs.max_trade_count_on_held_photo, 0);
    assert_eq!(inputs.total_trades, 0);

    // One settled trade bumps the accepted-trade count and hands Alice a
    // photo whose trade_count now counts toward Most Wanted.
    let a1 = seed_photo(&pool, s1, ALICE, "a-offer").await;
    let trade = TradeRepo::create(
        &pool,
        &CreateTrade {
            session_id: s1,
            from_user_id: ALICE,
            to_user_id: BOB,
            offered_photo_ids: vec![a1],
            requested_photo_ids: vec![b1],
        },
        now(),
    )
    .await
    .unwrap();
    TradeRepo::settle(&pool, trade.id, now()).await.unwrap();

    let inputs = StatsRepo::badge_inputs(&pool, ALICE).await.unwrap();
    assert_eq!(inputs.max_photos_in_one_session, 5, "offer photo counts too");
    assert_eq!(inputs.max_trade_count_on_held_photo, 1);
    assert_eq!(inputs.total_trades, 1);
}

// ---------------------------------------------------------------------------
// Test: leaderboard ordering
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_leaderboard_orders_by_photos_then_trades(pool: SqlitePool) {
    // Alice: 2 photos, 0 trades. Bob: 2 photos, 1 trade. Carol: 5 photos.
    let carol: DbId = 3;
    for (user, photos, trades) in [(ALICE, 2, 0), (BOB, 2, 1), (carol, 5, 0)] {
        StatsRepo::ensure_exists(&pool, user, now()).await.unwrap();
        sqlx::query("UPDATE user_stats SET total_photos = ?, total_trades = ? WHERE user_id = ?")
            .bind(photos)
            .bind(trades)
            .bind(user)
            .execute(&pool)
            .await
            .unwrap();
    }
    let spec = badges::find(badges::COLLECTOR).unwrap();
    StatsRepo::award_badges(&pool, BOB, &[spec], now()).await.unwrap();

    let board = StatsRepo::leaderboard(&pool).await.unwrap();
    let order: Vec<DbId> = board.iter().map(|e| e.user_id).collect();
    assert_eq!(order, vec![carol, BOB, ALICE], "photos desc, trades break ties");
    assert_eq!(board[1].badges, vec![badges::COLLECTOR.to_string()]);
    assert!(board[0].badges.is_empty());
}
