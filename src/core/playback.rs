//! Playback state: current position, play flag, autoplay interval.
//!
//! `is_playing` is not stored; it is the presence of the armed [`Ticker`].
//! The ticker lives in a private `Option`, replaced only through
//! [`PlaybackState::arm`] / [`PlaybackState::disarm`], so two timers can
//! never tick at the same time.

use crate::core::ticker::Ticker;
use log::trace;
use std::time::Instant;

/// Inclusive bounds for the autoplay interval in milliseconds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpeedBounds {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl SpeedBounds {
    /// Build bounds, swapping the ends if given in the wrong order
    pub fn new(a: u64, b: u64) -> Self {
        Self {
            min_ms: a.min(b),
            max_ms: a.max(b),
        }
    }

    pub fn clamp(&self, interval_ms: u64) -> u64 {
        interval_ms.clamp(self.min_ms, self.max_ms)
    }
}

/// Playback state manager (one per controller)
#[derive(Debug)]
pub struct PlaybackState {
    current_index: usize,
    len: usize,
    interval_ms: u64,
    default_interval_ms: u64,
    bounds: SpeedBounds,
    timer: Option<Ticker>,
}

impl PlaybackState {
    /// New state at index 0, paused. `len` must be non-zero.
    pub(crate) fn new(len: usize, default_interval_ms: u64, bounds: SpeedBounds) -> Self {
        debug_assert!(len > 0, "PlaybackState needs at least one time key");
        let default_interval_ms = bounds.clamp(default_interval_ms);
        Self {
            current_index: 0,
            len,
            interval_ms: default_interval_ms,
            default_interval_ms,
            bounds,
            timer: None,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_playing(&self) -> bool {
        self.timer.is_some()
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn default_interval_ms(&self) -> u64 {
        self.default_interval_ms
    }

    pub fn bounds(&self) -> SpeedBounds {
        self.bounds
    }

    /// Move by `delta` positions with wraparound in both directions
    pub(crate) fn step(&mut self, delta: isize) -> usize {
        let len = self.len as isize;
        let next = (self.current_index as isize + delta).rem_euclid(len);
        self.current_index = next as usize;
        self.current_index
    }

    /// Jump to `index`, clamped to [0, len-1]
    pub(crate) fn seek(&mut self, index: i64) -> usize {
        let last = (self.len - 1) as i64;
        self.current_index = index.clamp(0, last) as usize;
        self.current_index
    }

    /// Set interval (clamped). Returns the applied value.
    pub(crate) fn set_interval(&mut self, interval_ms: u64) -> u64 {
        self.interval_ms = self.bounds.clamp(interval_ms);
        self.interval_ms
    }

    pub(crate) fn restore_default_interval(&mut self) {
        self.interval_ms = self.default_interval_ms;
    }

    /// Start a fresh ticker at the current interval.
    /// Any previous ticker is dropped first.
    pub(crate) fn arm(&mut self) {
        self.disarm();
        self.timer = Some(Ticker::from_millis(self.interval_ms));
    }

    /// Stop the ticker. Returns true if one was running.
    pub(crate) fn disarm(&mut self) -> bool {
        let was_armed = self.timer.take().is_some();
        if was_armed {
            trace!("Autoplay timer disarmed");
        }
        was_armed
    }

    /// Poll the armed ticker. False when paused.
    pub(crate) fn poll_timer(&mut self, now: Instant) -> bool {
        self.timer.as_mut().is_some_and(|t| t.poll(now))
    }

    pub fn timer(&self) -> Option<&Ticker> {
        self.timer.as_ref()
    }
}

impl Drop for PlaybackState {
    fn drop(&mut self) {
        self.disarm();
    }
}
