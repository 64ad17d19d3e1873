//! Embassy async tasks
//!
//! `tick_task` and `input_irq_task` run on the high-priority interrupt
//! executor so they keep running while the panel task is inside a blocking
//! pacing delay. They communicate only through `crate::channels`.

pub mod input_irq;
pub mod panel;
pub mod tick;

pub use input_irq::input_irq_task;
pub use panel::{panel_task, BoardPanel};
pub use tick::tick_task;
