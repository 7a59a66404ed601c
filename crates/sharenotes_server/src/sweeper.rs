//! Periodic removal of expired pastes.

use crate::{AppError, PasteStorage};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Run one sweep and log the outcome.
///
/// # Errors
/// Returns the backend error when the sweep fails.
pub fn run_sweep(storage: &dyn PasteStorage) -> Result<usize, AppError> {
    match storage.cleanup_expired() {
        Ok(0) => {
            tracing::debug!("Expiry sweep found nothing to remove");
            Ok(0)
        }
        Ok(removed) => {
            tracing::info!("Expiry sweep removed {} paste(s)", removed);
            Ok(removed)
        }
        Err(err) => {
            tracing::error!("Expiry sweep failed: {}", err);
            Err(err)
        }
    }
}

/// Sweep `storage` every `period` until the returned task is aborted.
///
/// The first sweep runs one full period after spawning. Failures are
/// logged and the next tick tries again.
pub fn spawn_expiry_sweeper(storage: Arc<dyn PasteStorage>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let storage = storage.clone();
            let sweep = tokio::task::spawn_blocking(move || run_sweep(storage.as_ref()));
            if let Err(err) = sweep.await {
                tracing::error!("Expiry sweep task panicked: {}", err);
            }
        }
    })
}
