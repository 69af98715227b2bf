//! Background stats reconciliation.
//!
//! Provides a long-running async function intended to be spawned via
//! `tokio::spawn`. Periodically recomputes every `user_stats` row from the
//! source tables so drifted counters converge. Runs on a fixed interval
//! using `tokio::time::interval` and accepts a [`CancellationToken`] for
//! graceful shutdown.

use std::time::Duration;

use candid_db::repositories::StatsRepo;
use candid_db::DbPool;
use tokio_util::sync::CancellationToken;

/// Run the stats reconciliation loop.
///
/// Refreshes all user stats once per `every`. Runs until `cancel` is
/// triggered.
pub async fn run(pool: DbPool, every: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = every.as_secs(),
        "Stats reconciliation job started"
    );

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Stats reconciliation job stopping");
                break;
            }
            _ = interval.tick() => {
                match StatsRepo::refresh_all(&pool).await {
                    Ok(refreshed) => {
                        tracing::debug!(refreshed, "Stats reconciliation pass complete");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Stats reconciliation pass failed");
                    }
                }
            }
        }
    }
}
