//! Time base and interrupt-shared flags
//!
//! The only state shared between interrupt context and the foreground
//! control loop lives here: two single-bit flags and a millisecond counter.
//! Interrupt handlers are the sole writers; the control loop only reads the
//! counter and drains the flags.

use portable_atomic::{AtomicBool, AtomicU32, Ordering};

/// Monotonic millisecond time source
///
/// Wraps at `u32::MAX`; compare instants with `wrapping_sub`.
pub trait TickClock {
    /// Milliseconds since an arbitrary epoch
    fn now_ms(&self) -> u32;

    /// Milliseconds elapsed since `start`
    fn elapsed_since(&self, start: u32) -> u32 {
        self.now_ms().wrapping_sub(start)
    }
}

/// Wake-up flags raised from interrupt context
#[derive(Debug)]
pub struct PanelSignals {
    /// Input expander reported a pin change
    dirty: AtomicBool,
    /// Heartbeat period elapsed
    heartbeat: AtomicBool,
}

impl Default for PanelSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelSignals {
    /// Create a new, cleared signal pair
    pub const fn new() -> Self {
        Self {
            dirty: AtomicBool::new(false),
            heartbeat: AtomicBool::new(false),
        }
    }

    /// Mark inputs as changed (interrupt side)
    pub fn raise_change(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Mark a heartbeat as due (interrupt side)
    pub fn raise_heartbeat(&self) {
        self.heartbeat.store(true, Ordering::Release);
    }

    /// Consume the change flag, returning whether it was set
    pub fn take_change(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    /// Consume the heartbeat flag, returning whether it was set
    pub fn take_heartbeat(&self) -> bool {
        self.heartbeat.swap(false, Ordering::AcqRel)
    }
}

/// Millisecond counter advanced by a periodic tick
///
/// Also acts as the heartbeat source: every `heartbeat_period_ms` of
/// accumulated ticks it raises the heartbeat flag on the given signals.
#[derive(Debug)]
pub struct TickCounter {
    millis: AtomicU32,
    since_heartbeat: AtomicU32,
    heartbeat_period_ms: AtomicU32,
}

impl TickCounter {
    /// Create a counter that raises a heartbeat every `heartbeat_period_ms`
    pub const fn new(heartbeat_period_ms: u32) -> Self {
        Self {
            millis: AtomicU32::new(0),
            since_heartbeat: AtomicU32::new(0),
            heartbeat_period_ms: AtomicU32::new(heartbeat_period_ms),
        }
    }

    /// Change the heartbeat period (applied from the next tick)
    pub fn set_heartbeat_period(&self, period_ms: u32) {
        self.heartbeat_period_ms
            .store(period_ms.max(1), Ordering::Relaxed);
    }

    /// Advance the counter by one tick of `elapsed_ms` (tick side)
    pub fn advance(&self, elapsed_ms: u32, signals: &PanelSignals) {
        self.millis.fetch_add(elapsed_ms, Ordering::Release);

        let period = self.heartbeat_period_ms.load(Ordering::Relaxed).max(1);
        let since = self
            .since_heartbeat
            .load(Ordering::Relaxed)
            .saturating_add(elapsed_ms);
        if since >= period {
            self.since_heartbeat.store(since - period, Ordering::Relaxed);
            signals.raise_heartbeat();
        } else {
            self.since_heartbeat.store(since, Ordering::Relaxed);
        }
    }
}

impl TickClock for TickCounter {
    fn now_ms(&self) -> u32 {
        self.millis.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_are_consumed_once() {
        let signals = PanelSignals::new();
        assert!(!signals.take_change());

        signals.raise_change();
        assert!(signals.take_change());
        assert!(!signals.take_change());

        signals.raise_heartbeat();
        assert!(signals.take_heartbeat());
        assert!(!signals.take_heartbeat());
    }

    #[test]
    fn test_counter_raises_heartbeat_every_period() {
        let signals = PanelSignals::new();
        let counter = TickCounter::new(1000);

        for _ in 0..999 {
            counter.advance(1, &signals);
        }
        assert!(!signals.take_heartbeat());
        assert_eq!(counter.now_ms(), 999);

        counter.advance(1, &signals);
        assert!(signals.take_heartbeat());

        for _ in 0..1000 {
            counter.advance(1, &signals);
        }
        assert!(signals.take_heartbeat());
        assert_eq!(counter.now_ms(), 2000);
    }

    #[test]
    fn test_coarse_ticks_keep_phase() {
        let signals = PanelSignals::new();
        let counter = TickCounter::new(1000);

        // 300 ms ticks: heartbeats at 1200 (carry 200), 2100 (carry 100)
        for _ in 0..4 {
            counter.advance(300, &signals);
        }
        assert!(signals.take_heartbeat());
        for _ in 0..3 {
            counter.advance(300, &signals);
        }
        assert!(signals.take_heartbeat());
    }

    #[test]
    fn test_huge_tick_saturates() {
        let signals = PanelSignals::new();
        let counter = TickCounter::new(1000);

        counter.advance(500, &signals);
        counter.advance(u32::MAX, &signals);
        assert!(signals.take_heartbeat());

        counter.advance(1, &signals);
        assert!(signals.take_heartbeat());
    }

    #[test]
    fn test_elapsed_wraps() {
        struct Fixed(u32);
        impl TickClock for Fixed {
            fn now_ms(&self) -> u32 {
                self.0
            }
        }

        let clock = Fixed(5);
        assert_eq!(clock.elapsed_since(u32::MAX - 4), 10);
    }
}
