//! Integration tests for session CRUD and the reveal lifecycle.
//!
//! Exercises `SessionRepo`, `ParticipantRepo`, and `PhotoRepo` against a
//! real database:
//! - Create enrolls the host as first participant
//! - Join is idempotent
//! - Reveal flips the session and all its photos together
//! - A second reveal is a guarded no-op
//! - Visibility listings hide other users' unrevealed photos

use candid_core::session::SessionStatus;
use candid_core::types::{DbId, Timestamp};
use candid_db::models::photo::CreatePhoto;
use candid_db::models::session::CreateSession;
use candid_db::repositories::{ParticipantRepo, PhotoRepo, SessionRepo};
use sqlx::SqlitePool;

const HOST: DbId = 1;
const GUEST: DbId = 2;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn now() -> Timestamp {
    chrono::Utc::now()
}

fn new_session(name: &str) -> CreateSession {
    CreateSession {
        name: name.to_string(),
        host_id: HOST,
        reveal_time: None,
    }
}

fn new_photo(session_id: DbId, owner_id: DbId, blob: &str) -> CreatePhoto {
    CreatePhoto {
        session_id,
        owner_id,
        blob_ref: blob.to_string(),
        file_size: Some(2048),
        width: Some(1280),
        height: Some(960),
    }
}

// ---------------------------------------------------------------------------
// Test: create enrolls the host
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_enrolls_host(pool: SqlitePool) {
    let session = SessionRepo::create(&pool, &new_session("Lake weekend"), now())
        .await
        .unwrap();

    assert!(session.id > 0, "id should be auto-generated");
    assert_eq!(session.status, SessionStatus::Active);
    assert_eq!(session.host_id, HOST);
    assert!(session.reveal_time.is_none());

    let is_member = ParticipantRepo::is_participant(&pool, session.id, HOST)
        .await
        .unwrap();
    assert!(is_member, "host should be auto-enrolled");

    let listed = SessionRepo::list_for_user(&pool, HOST).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].participant_count, 1);
}

// ---------------------------------------------------------------------------
// Test: join is idempotent
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_join_is_idempotent(pool: SqlitePool) {
    let session = SessionRepo::create(&pool, &new_session("Rooftop party"), now())
        .await
        .unwrap();

    let first = ParticipantRepo::join(&pool, session.id, GUEST, now())
        .await
        .unwrap();
    assert!(first, "first join should insert a roster row");

    let second = ParticipantRepo::join(&pool, session.id, GUEST, now())
        .await
        .unwrap();
    assert!(!second, "re-join should be a no-op");

    let roster = ParticipantRepo::list_for_session(&pool, session.id)
        .await
        .unwrap();
    assert_eq!(roster.len(), 2, "host plus one guest");
}

// ---------------------------------------------------------------------------
// Test: reveal flips the session and every photo atomically
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_reveal_flips_session_and_photos(pool: SqlitePool) {
    let session = SessionRepo::create(&pool, &new_session("Hike"), now())
        .await
        .unwrap();
    ParticipantRepo::join(&pool, session.id, GUEST, now())
        .await
        .unwrap();

    for (owner, blob) in [(HOST, "h1"), (HOST, "h2"), (GUEST, "g1")] {
        PhotoRepo::create(&pool, &new_photo(session.id, owner, blob), now())
            .await
            .unwrap();
    }

    let revealed = SessionRepo::reveal(&pool, session.id, now())
        .await
        .unwrap()
        .expect("first reveal should succeed");
    assert_eq!(revealed.status, SessionStatus::Revealed);
    assert!(revealed.reveal_time.is_some(), "reveal_time should be stamped");

    let photos = PhotoRepo::list_by_session(&pool, session.id).await.unwrap();
    assert_eq!(photos.len(), 3);
    assert!(
        photos.iter().all(|p| p.is_revealed),
        "every photo should be revealed with the session"
    );
}

// ---------------------------------------------------------------------------
// Test: second reveal is a guarded no-op
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_second_reveal_matches_nothing(pool: SqlitePool) {
    let session = SessionRepo::create(&pool, &new_session("Dinner"), now())
        .await
        .unwrap();

    let first = SessionRepo::reveal(&pool, session.id, now()).await.unwrap();
    assert!(first.is_some());

    let second = SessionRepo::reveal(&pool, session.id, now()).await.unwrap();
    assert!(second.is_none(), "guard on 'active' should reject a re-reveal");

    // The original reveal_time survives the failed attempt.
    let reloaded = SessionRepo::find_by_id(&pool, session.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.reveal_time, first.unwrap().reveal_time);
}

// ---------------------------------------------------------------------------
// Test: ended sessions cannot be revealed or ended twice
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_end_is_guarded(pool: SqlitePool) {
    let session = SessionRepo::create(&pool, &new_session("Short one"), now())
        .await
        .unwrap();

    assert!(SessionRepo::end(&pool, session.id).await.unwrap());
    assert!(
        !SessionRepo::end(&pool, session.id).await.unwrap(),
        "ending twice should match nothing"
    );
    assert!(
        SessionRepo::reveal(&pool, session.id, now())
            .await
            .unwrap()
            .is_none(),
        "an ended session cannot be revealed"
    );

    let reloaded = SessionRepo::find_by_id(&pool, session.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.status, SessionStatus::Ended);
}

// ---------------------------------------------------------------------------
// Test: visibility listing hides foreign unrevealed photos
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_visibility_before_and_after_reveal(pool: SqlitePool) {
    let session = SessionRepo::create(&pool, &new_session("Gallery night"), now())
        .await
        .unwrap();
    ParticipantRepo::join(&pool, session.id, GUEST, now())
        .await
        .unwrap();

    PhotoRepo::create(&pool, &new_photo(session.id, HOST, "host-shot"), now())
        .await
        .unwrap();
    PhotoRepo::create(&pool, &new_photo(session.id, GUEST, "guest-shot"), now())
        .await
        .unwrap();

    // Before reveal each participant sees only their own capture.
    let host_view = PhotoRepo::list_visible_in_session(&pool, session.id, HOST)
        .await
        .unwrap();
    assert_eq!(host_view.len(), 1);
    assert_eq!(host_view[0].original_owner_id, HOST);

    SessionRepo::reveal(&pool, session.id, now()).await.unwrap();

    let host_view = PhotoRepo::list_visible_in_session(&pool, session.id, HOST)
        .await
        .unwrap();
    assert_eq!(host_view.len(), 2, "reveal exposes everything");
}

// ---------------------------------------------------------------------------
// Test: find on a dangling id
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_find_missing_session(pool: SqlitePool) {
    assert!(SessionRepo::find_by_id(&pool, 42).await.unwrap().is_none());
    assert!(SessionRepo::host_of(&pool, 42).await.unwrap().is_none());
}
