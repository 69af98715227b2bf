//! Trade proposal, response, and trade queries.
//!
//! Proposal validates optimistically: both offer sets must be owned at
//! proposal time, but nothing is locked and a photo may sit in several
//! pending trades at once. Settlement re-validates ownership inside its
//! transaction; the first trade to settle wins and later ones abort with
//! `NotOwner` while staying pending.

use candid_core::error::CoreError;
use candid_core::trade::{validate_offer_sets, validate_parties, TradeStatus};
use candid_core::types::DbId;
use candid_db::models::trade::{CreateTrade, Trade};
use candid_db::repositories::{PhotoRepo, SessionRepo, SettlementOutcome, StatsRepo, TradeRepo};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::gate;
use crate::identity::IdentityResolver;
use crate::photos::PhotoWithUrl;
use crate::Engine;

/// A trade proposal: who it addresses and what changes hands.
#[derive(Debug, Clone, Deserialize)]
pub struct ProposeTrade {
    pub session_id: DbId,
    pub to_user_id: DbId,
    pub offered_photo_ids: Vec<DbId>,
    pub requested_photo_ids: Vec<DbId>,
}

/// A trade enriched for presentation: both photo sets resolved, plus the
/// caller's relationship to the trade.
#[derive(Debug, Clone, Serialize)]
pub struct TradeWithDetails {
    #[serde(flatten)]
    pub trade: Trade,
    pub offered_photos: Vec<PhotoWithUrl>,
    pub requested_photos: Vec<PhotoWithUrl>,
    /// Whether the caller proposed this trade.
    pub is_sent: bool,
    /// Whether the caller may still accept or reject it.
    pub can_respond: bool,
}

impl Engine {
    // ── Proposal ─────────────────────────────────────────────────────

    /// Propose a trade in a revealed session.
    ///
    /// Creates a pending trade and its offer-set rows; no ownership moves
    /// and no stats change until the counterparty accepts. The ownership
    /// check here is advisory, settlement re-checks it.
    pub async fn propose_trade(
        &self,
        identity: &dyn IdentityResolver,
        proposal: ProposeTrade,
    ) -> EngineResult<Trade> {
        let from_user_id = gate::require_user(identity)?;
        let ProposeTrade {
            session_id,
            to_user_id,
            offered_photo_ids,
            requested_photo_ids,
        } = proposal;

        validate_parties(from_user_id, to_user_id)?;
        validate_offer_sets(&offered_photo_ids, &requested_photo_ids)?;

        let Some(session) = SessionRepo::find_by_id(&self.pool, session_id).await? else {
            return Err(CoreError::NotFound {
                entity: "session",
                id: session_id,
            }
            .into());
        };
        if !session.status.accepts_trades() {
            return Err(CoreError::InvalidState(format!(
                "session {session_id} must be revealed to trade (status: {})",
                session.status
            ))
            .into());
        }

        self.check_offer_side(&offered_photo_ids, session_id, from_user_id)
            .await?;
        self.check_offer_side(&requested_photo_ids, session_id, to_user_id)
            .await?;

        let input = CreateTrade {
            session_id,
            from_user_id,
            to_user_id,
            offered_photo_ids,
            requested_photo_ids,
        };
        let trade = TradeRepo::create(&self.pool, &input, Utc::now()).await?;
        tracing::info!(
            trade_id = trade.id,
            session_id,
            from_user_id,
            to_user_id,
            "Trade proposed"
        );
        Ok(trade)
    }

    /// Every photo in one offer side must exist, sit in the trade's
    /// session, and be currently owned by the expected party.
    async fn check_offer_side(
        &self,
        photo_ids: &[DbId],
        session_id: DbId,
        expected_owner_id: DbId,
    ) -> EngineResult<()> {
        let photos = PhotoRepo::find_by_ids(&self.pool, photo_ids).await?;
        for &photo_id in photo_ids {
            let Some(photo) = photos.iter().find(|p| p.id == photo_id) else {
                return Err(CoreError::NotFound {
                    entity: "photo",
                    id: photo_id,
                }
                .into());
            };
            if photo.session_id != session_id {
                return Err(CoreError::Validation(format!(
                    "photo {photo_id} is not part of session {session_id}"
                ))
                .into());
            }
            if photo.owner_id != expected_owner_id {
                return Err(CoreError::NotOwner {
                    photo_id,
                    user_id: expected_owner_id,
                }
                .into());
            }
        }
        Ok(())
    }

    // ── Response ─────────────────────────────────────────────────────

    /// Accept or reject a pending trade. Only the addressed counterparty
    /// may respond.
    ///
    /// Acceptance settles atomically: the status flip, every ownership
    /// swap, the trade-count bumps, and the transfer records commit
    /// together or not at all. A photo that changed hands since proposal
    /// aborts with `NotOwner` and the trade stays pending.
    pub async fn respond_to_trade(
        &self,
        identity: &dyn IdentityResolver,
        trade_id: DbId,
        accept: bool,
    ) -> EngineResult<Trade> {
        let user_id = gate::require_user(identity)?;

        let Some(trade) = TradeRepo::find_by_id(&self.pool, trade_id).await? else {
            return Err(CoreError::NotFound {
                entity: "trade",
                id: trade_id,
            }
            .into());
        };
        if trade.to_user_id != user_id {
            return Err(CoreError::NotAuthorized(format!(
                "user {user_id} is not the responder for trade {trade_id}"
            ))
            .into());
        }
        if trade.status.is_resolved() {
            return Err(CoreError::AlreadyResolved {
                trade_id,
                status: trade.status.as_str().to_string(),
            }
            .into());
        }

        if !accept {
            return match TradeRepo::reject(&self.pool, trade_id).await? {
                Some(rejected) => {
                    tracing::info!(trade_id, user_id, "Trade rejected");
                    Ok(rejected)
                }
                None => self.resolved_meanwhile(trade_id).await,
            };
        }

        match TradeRepo::settle(&self.pool, trade_id, Utc::now()).await? {
            SettlementOutcome::Settled(settled) => {
                StatsRepo::record_settlement(
                    &self.pool,
                    settled.trade.from_user_id,
                    settled.trade.to_user_id,
                    settled.photos_to_proposer,
                    settled.photos_to_responder,
                    Utc::now(),
                )
                .await?;
                tracing::info!(
                    trade_id,
                    from_user_id = settled.trade.from_user_id,
                    to_user_id = settled.trade.to_user_id,
                    photos_exchanged = settled.photos_to_proposer + settled.photos_to_responder,
                    "Trade settled"
                );
                Ok(settled.trade)
            }
            SettlementOutcome::StatusConflict => self.resolved_meanwhile(trade_id).await,
            SettlementOutcome::OwnershipConflict {
                photo_id,
                expected_owner_id,
            } => Err(CoreError::NotOwner {
                photo_id,
                user_id: expected_owner_id,
            }
            .into()),
        }
    }

    /// The guarded update matched nothing: somebody resolved the trade
    /// between our status check and the flip. Re-read for the real status.
    /// Always returns an error.
    async fn resolved_meanwhile(&self, trade_id: DbId) -> EngineResult<Trade> {
        let status = match TradeRepo::find_by_id(&self.pool, trade_id).await? {
            Some(trade) => trade.status.as_str().to_string(),
            None => "missing".to_string(),
        };
        Err(CoreError::AlreadyResolved { trade_id, status }.into())
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Trades the caller sent or received in a session, newest first, with
    /// both photo sets resolved. Empty when unauthenticated.
    pub async fn list_user_trades(
        &self,
        identity: &dyn IdentityResolver,
        session_id: DbId,
    ) -> EngineResult<Vec<TradeWithDetails>> {
        let Some(user_id) = identity.current_user_id() else {
            return Ok(Vec::new());
        };

        let trades = TradeRepo::list_for_user_in_session(&self.pool, session_id, user_id).await?;
        let mut details = Vec::with_capacity(trades.len());
        for trade in trades {
            let (offered_ids, requested_ids) = TradeRepo::offer_sets(&self.pool, trade.id).await?;
            let offered_photos = self.photos_in_order(&offered_ids, user_id).await?;
            let requested_photos = self.photos_in_order(&requested_ids, user_id).await?;
            let is_sent = trade.from_user_id == user_id;
            let can_respond = !is_sent && trade.status == TradeStatus::Pending;
            details.push(TradeWithDetails {
                trade,
                offered_photos,
                requested_photos,
                is_sent,
                can_respond,
            });
        }
        Ok(details)
    }
}
