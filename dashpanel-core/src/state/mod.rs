//! Control loop state machine and keepalive countdown

pub mod events;
pub mod keepalive;
pub mod machine;

pub use events::LoopEvent;
pub use keepalive::Countdown;
pub use machine::LoopState;
