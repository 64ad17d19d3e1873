//! Expander interrupt task
//!
//! The three MCP23S17 INT outputs are mirrored onto one active-high line
//! that stays asserted until the changed port is read. Waiting on the level
//! rather than the edge means a change that arrives while the flag is still
//! pending is never lost.

use defmt::*;
use embassy_rp::gpio::Input;

use crate::channels::SIGNALS;

#[embassy_executor::task]
pub async fn input_irq_task(mut int: Input<'static>) {
    info!("Input interrupt task started");

    loop {
        int.wait_for_high().await;
        trace!("Expander INT asserted");
        SIGNALS.raise_change();

        // Cleared by the next port sample
        int.wait_for_low().await;
    }
}
