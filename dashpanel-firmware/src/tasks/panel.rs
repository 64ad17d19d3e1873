//! Control loop task
//!
//! Owns the `Panel` and polls it forever. Frames are fire-and-forget: a
//! failed pass is logged and the loop carries on with the next one.

use defmt::*;
use embassy_futures::yield_now;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::Delay;

use dashpanel_core::panel::Panel;
use dashpanel_drivers::can::Mcp2515;
use dashpanel_drivers::display::Max7221Chain;
use dashpanel_drivers::expander::Mcp23s17Bank;
use dashpanel_hal_rp2040::{RpOutput, SharedSpiDevice};

use crate::channels::SIGNALS;

/// The board's SPI bus
pub type Bus = Spi<'static, SPI0, Blocking>;

/// One chip select on the board's SPI bus
pub type Device = SharedSpiDevice<'static, Bus>;

/// Panel wired to the board's chips
pub type BoardPanel = Panel<
    Mcp23s17Bank<Device, RpOutput<'static>>,
    Max7221Chain<Device>,
    Mcp2515<Device, Delay>,
    Delay,
>;

#[embassy_executor::task]
pub async fn panel_task(mut panel: BoardPanel) {
    info!("Panel task started");

    loop {
        match panel.poll(&SIGNALS) {
            Ok(Some(report)) => {
                debug!("Pass: {}", report);
                if let Some(policy) = report.special {
                    info!("Sequence sent: {}", policy);
                }
                if report.resynced {
                    debug!("Indicator groups resent");
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Pass failed: {}", e),
        }

        yield_now().await;
    }
}
