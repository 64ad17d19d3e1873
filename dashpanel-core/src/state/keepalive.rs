//! Keepalive countdown
//!
//! Counts heartbeats since the last switch LED change. Once it reaches the
//! limit the loop wakes on its own and resends every indicator group, in
//! case the cluster missed an update.

/// Heartbeats without a switch change before a resync (cluster-tuned)
pub const DEFAULT_RESYNC_HEARTBEATS: u8 = 4;

/// Heartbeat countdown toward a resync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Countdown {
    count: u8,
    limit: u8,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_RESYNC_HEARTBEATS)
    }
}

impl Countdown {
    pub const fn new(limit: u8) -> Self {
        Self { count: 0, limit }
    }

    /// Count one heartbeat
    pub fn tick(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    /// Whether the limit has been reached
    pub fn elapsed(&self) -> bool {
        self.count >= self.limit
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn count(&self) -> u8 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapses_after_limit() {
        let mut countdown = Countdown::default();
        for _ in 0..3 {
            countdown.tick();
            assert!(!countdown.elapsed());
        }
        countdown.tick();
        assert!(countdown.elapsed());

        countdown.reset();
        assert_eq!(countdown.count(), 0);
        assert!(!countdown.elapsed());
    }

    #[test]
    fn test_saturates() {
        let mut countdown = Countdown::new(2);
        for _ in 0..300 {
            countdown.tick();
        }
        assert_eq!(countdown.count(), u8::MAX);
        assert!(countdown.elapsed());
    }
}
