//! The resident retention sweeper.
//!
//! `eventscope watch` keeps one sweep loop alive: a pass at startup, then
//! one per interval. A failing pass is logged and retried on the next
//! tick; the loop itself never exits.

use std::time::Duration;

use eventscope_core::Schedule;

pub async fn watch(mut schedule: Schedule, every: Duration) {
    let mut ticker = tokio::time::interval(every);

    loop {
        // The first tick completes immediately, giving the startup pass
        ticker.tick().await;

        match schedule.sweep() {
            Ok(purged) if !purged.is_empty() => {
                tracing::info!("sweep purged {} expired event(s)", purged.len());
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("sweep failed, retrying next tick: {e}");
            }
        }
    }
}
