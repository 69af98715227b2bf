//! Photo capture and photo queries.
//!
//! Captured photos stay hidden until the host reveals the session; until
//! then only the capturer sees their own. Ownership never changes here,
//! only through accepted-trade settlement in [`crate::trades`].

use std::collections::HashMap;

use candid_core::error::CoreError;
use candid_core::photo::is_tradable_by;
use candid_core::types::{BlobRef, DbId};
use candid_db::models::photo::{CreatePhoto, Photo};
use candid_db::repositories::{PhotoRepo, SessionRepo, StatsRepo};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::gate;
use crate::identity::IdentityResolver;
use crate::Engine;

/// Optional capture metadata recorded on the photo row.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CaptureMeta {
    pub file_size: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

/// A photo enriched for presentation: its blob URL resolved and the
/// viewer's trade eligibility evaluated.
#[derive(Debug, Clone, Serialize)]
pub struct PhotoWithUrl {
    #[serde(flatten)]
    pub photo: Photo,
    /// `None` when the blob is missing from the store.
    pub url: Option<String>,
    /// Whether the viewer may put this photo in a trade: revealed and held
    /// by someone else.
    pub can_trade: bool,
}

impl Engine {
    // ── Capture ──────────────────────────────────────────────────────

    /// Store photo bytes, returning the ref to pass to [`Engine::capture_photo`].
    pub async fn upload_photo(
        &self,
        identity: &dyn IdentityResolver,
        bytes: &[u8],
    ) -> EngineResult<BlobRef> {
        gate::require_user(identity)?;
        let blob_ref = self.blobs.put(bytes).await?;
        tracing::debug!(%blob_ref, size = bytes.len(), "Photo blob stored");
        Ok(blob_ref)
    }

    /// Capture a photo into an active session.
    ///
    /// The photo starts unrevealed, owned by its capturer, with zero
    /// trades. The capturer's stats are bumped after the insert commits.
    pub async fn capture_photo(
        &self,
        identity: &dyn IdentityResolver,
        session_id: DbId,
        blob_ref: BlobRef,
        meta: CaptureMeta,
    ) -> EngineResult<Photo> {
        let user_id = gate::require_user(identity)?;

        let Some(session) = SessionRepo::find_by_id(&self.pool, session_id).await? else {
            return Err(CoreError::NotFound {
                entity: "session",
                id: session_id,
            }
            .into());
        };
        if !session.status.accepts_captures() {
            return Err(CoreError::SessionNotActive {
                session_id,
                status: session.status.as_str().to_string(),
            }
            .into());
        }
        self.require_participant(session_id, user_id).await?;

        let input = CreatePhoto {
            session_id,
            owner_id: user_id,
            blob_ref,
            file_size: meta.file_size,
            width: meta.width,
            height: meta.height,
        };
        let photo = PhotoRepo::create(&self.pool, &input, Utc::now()).await?;

        // Bookkeeping only; the photo row is already committed.
        StatsRepo::record_capture(&self.pool, user_id, Utc::now()).await?;

        tracing::info!(photo_id = photo.id, session_id, user_id, "Photo captured");
        Ok(photo)
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Photos in a session the viewer may see, each with its URL and trade
    /// eligibility. Unauthenticated callers and non-participants get an
    /// empty list; a dangling session id is `NotFound`.
    pub async fn list_visible_photos(
        &self,
        identity: &dyn IdentityResolver,
        session_id: DbId,
    ) -> EngineResult<Vec<PhotoWithUrl>> {
        let Some(user_id) = identity.current_user_id() else {
            return Ok(Vec::new());
        };
        if SessionRepo::find_by_id(&self.pool, session_id).await?.is_none() {
            return Err(CoreError::NotFound {
                entity: "session",
                id: session_id,
            }
            .into());
        }
        if !self.directory.is_participant(session_id, user_id).await? {
            return Ok(Vec::new());
        }

        let photos = PhotoRepo::list_visible_in_session(&self.pool, session_id, user_id).await?;
        self.enrich_photos(photos, user_id).await
    }

    /// Photos the caller currently holds across all sessions, newest
    /// first. Empty when unauthenticated.
    pub async fn user_gallery(
        &self,
        identity: &dyn IdentityResolver,
    ) -> EngineResult<Vec<PhotoWithUrl>> {
        let Some(user_id) = identity.current_user_id() else {
            return Ok(Vec::new());
        };
        let photos = PhotoRepo::list_owned_by(&self.pool, user_id).await?;
        self.enrich_photos(photos, user_id).await
    }

    // ── View assembly ────────────────────────────────────────────────

    /// Attach blob URLs and per-viewer trade eligibility to photo rows.
    pub(crate) async fn enrich_photos(
        &self,
        photos: Vec<Photo>,
        viewer_id: DbId,
    ) -> EngineResult<Vec<PhotoWithUrl>> {
        let mut enriched = Vec::with_capacity(photos.len());
        for photo in photos {
            let url = self.blobs.url(&photo.blob_ref).await?;
            let can_trade = is_tradable_by(photo.is_revealed, photo.owner_id, viewer_id);
            enriched.push(PhotoWithUrl {
                photo,
                url,
                can_trade,
            });
        }
        Ok(enriched)
    }

    /// Load a photo id list and return views in the same order. Ids that no
    /// longer resolve are skipped.
    pub(crate) async fn photos_in_order(
        &self,
        ids: &[DbId],
        viewer_id: DbId,
    ) -> EngineResult<Vec<PhotoWithUrl>> {
        let photos = PhotoRepo::find_by_ids(&self.pool, ids).await?;
        let mut by_id: HashMap<DbId, Photo> = photos.into_iter().map(|p| (p.id, p)).collect();

        let mut ordered = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(photo) = by_id.remove(id) {
                ordered.push(photo);
            }
        }
        self.enrich_photos(ordered, viewer_id).await
    }
}
