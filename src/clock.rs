use std::time::{Duration, Instant};

use chrono::Local;
use log::info;

const STAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// A wall clock earlier than this is treated as never having been set.
const SYNC_EPOCH_FLOOR: i64 = 24 * 3600;

pub trait Clock {
    fn monotonic(&self) -> Instant;

    /// Formatted local time (day/month/year hour:minute:second), or `None`
    /// while the wall clock has not been synchronized yet.
    fn wall_stamp(&self) -> Option<String>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn monotonic(&self) -> Instant {
        Instant::now()
    }

    fn wall_stamp(&self) -> Option<String> {
        let now = Local::now();
        if now.timestamp() < SYNC_EPOCH_FLOOR {
            return None;
        }
        Some(now.format(STAMP_FORMAT).to_string())
    }
}

/// Startup-only blocking wait for the wall clock. Steady-state code degrades
/// to empty stamps instead of waiting.
pub async fn wait_for_sync(clock: &dyn Clock) {
    loop {
        if clock.wall_stamp().is_some() {
            return;
        }
        info!("Waiting for time sync...");
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
}
