//! Background task that purges expired notifications.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::service::NotificationService;

/// Spawns the periodic global expiry sweep.
///
/// The per-user lazy sweep in listing keeps active users clean; this task
/// bounds the backlog left behind by users who never come back. Runs until
/// a message arrives on the shutdown channel.
pub fn spawn_expiry_sweeper(
    service: NotificationService,
    interval_seconds: u64,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_seconds.max(1)));
        // The first tick fires immediately; skip it so startup is quiet.
        ticker.tick().await;

        info!(interval_seconds, "Expiry sweeper started");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(err) = service.clean_expired().await {
                        error!(error = %err, "Expiry sweep failed");
                    }
                }
                _ = shutdown.recv() => {
                    info!("Expiry sweeper stopped");
                    break;
                }
            }
        }
    })
}
