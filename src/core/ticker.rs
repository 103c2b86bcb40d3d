//! Repeating autoplay timer, driven by the host loop.
//!
//! The ticker does not spawn threads or callbacks. The owner calls
//! [`Ticker::poll`] from its update loop (typically ~60Hz) and gets `true`
//! once per elapsed interval:
//! 1. First poll after arming anchors the ticker at `now`
//! 2. Every later poll fires when `interval` has elapsed since the anchor,
//!    then moves the anchor forward by one interval, so polling jitter does
//!    not accumulate
//!
//! At most one tick fires per poll. A loop that stalls for more than one
//! interval re-anchors at `now`, so it never produces a burst of catch-up
//! steps.

use std::time::{Duration, Instant};

/// Repeating timer for autoplay.
///
/// # Usage
/// ```ignore
/// let mut ticker = Ticker::new(Duration::from_millis(1500));
///
/// // In update loop:
/// if ticker.poll(Instant::now()) {
///     controller.step_forward_automatic();
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    /// Time of last tick (or of arming). None until the first poll.
    anchor: Option<Instant>,
    fired: u64,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        log::trace!("Ticker: armed at {}ms", interval.as_millis());
        Self {
            interval,
            anchor: None,
            fired: 0,
        }
    }

    pub fn from_millis(interval_ms: u64) -> Self {
        Self::new(Duration::from_millis(interval_ms))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of ticks fired since arming
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Check whether a tick is due at `now`.
    /// Returns true at most once per interval.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(anchor) = self.anchor else {
            self.anchor = Some(now);
            return false;
        };

        if now.saturating_duration_since(anchor) >= self.interval {
            let next = anchor + self.interval;
            let behind = now.saturating_duration_since(next) >= self.interval;
            self.anchor = Some(if behind { now } else { next });
            self.fired += 1;
            true
        } else {
            false
        }
    }

    /// Time remaining until the next tick, if anchored
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.anchor
            .map(|anchor| self.interval.saturating_sub(now.saturating_duration_since(anchor)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_poll_only_anchors() {
        let mut ticker = Ticker::from_millis(100);
        let t0 = Instant::now();

        assert!(!ticker.poll(t0));
        assert_eq!(ticker.remaining(t0), Some(Duration::from_millis(100)));
    }

    #[test]
    fn test_fires_once_per_interval() {
        let mut ticker = Ticker::from_millis(100);
        let t0 = Instant::now();
        ticker.poll(t0);

        assert!(!ticker.poll(t0 + Duration::from_millis(99)));
        assert!(ticker.poll(t0 + Duration::from_millis(100)));
        // Anchor moved by one interval, so nothing until another full one
        assert!(!ticker.poll(t0 + Duration::from_millis(150)));
        assert!(ticker.poll(t0 + Duration::from_millis(200)));
        assert_eq!(ticker.fired(), 2);
    }

    #[test]
    fn test_stall_does_not_burst() {
        let mut ticker = Ticker::from_millis(10);
        let t0 = Instant::now();
        ticker.poll(t0);

        let late = t0 + Duration::from_millis(1000);
        assert!(ticker.poll(late));
        assert!(!ticker.poll(late));
        assert_eq!(ticker.fired(), 1);
    }

    #[test]
    fn test_frame_jitter_does_not_drift() {
        let mut ticker = Ticker::from_millis(1500);
        let t0 = Instant::now();
        for ms in (0..=15_016).step_by(16) {
            ticker.poll(t0 + Duration::from_millis(ms));
        }
        // Ticks due at 1500, 3000, ..., 15000; the last lands on the 15008 frame
        assert_eq!(ticker.fired(), 10);
    }
}
