use crate::state::messages::RefreshTick;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Periodic reload for `--watch`. Each tick makes the main loop start a new
/// view token and re-request the active view.
pub struct PeriodicRefresher {
    ticks: mpsc::Sender<RefreshTick>,
    period: Duration,
}

impl PeriodicRefresher {
    pub fn new(ticks: mpsc::Sender<RefreshTick>, period: Duration) -> Self {
        Self { ticks, period }
    }

    pub async fn run(self) {
        let mut refresh_interval = interval(self.period);
        // Skip the immediate first tick so startup loading isn't double-triggered.
        refresh_interval.tick().await;

        loop {
            refresh_interval.tick().await;
            if self.ticks.send(RefreshTick).await.is_err() {
                break;
            }
        }
    }
}
