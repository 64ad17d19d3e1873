//! Tick task for time-based updates
//!
//! Advances the shared millisecond counter, which in turn raises the
//! heartbeat flag once per heartbeat period.

use defmt::*;
use embassy_time::{Duration, Instant, Ticker};

use crate::channels::{SIGNALS, TICKS};

/// Tick interval in milliseconds
pub const TICK_INTERVAL_MS: u64 = 1;

/// Tick task - advances the counter by the real time elapsed
#[embassy_executor::task]
pub async fn tick_task() {
    info!("Tick task started");

    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));
    let mut last = Instant::now();

    loop {
        ticker.next().await;

        // Late ticks are caught up rather than dropped
        let elapsed = last.elapsed().as_millis();
        if elapsed == 0 {
            continue;
        }
        last += Duration::from_millis(elapsed);

        TICKS.advance(elapsed as u32, &SIGNALS);
    }
}
