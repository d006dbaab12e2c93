//! Slide timing
//!
//! The engine only streams lines; moving on to the next playlist entry
//! after its display duration is up to the caller. [`SlideTimer`] keeps
//! that bookkeeping out of the control loop.

/// Tracks how long the current entry has been on display
///
/// Time is taken from the caller in microseconds so the timer stays
/// independent of any clock implementation. Paused time does not count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlideTimer {
    started_us: Option<u64>,
    paused_at_us: Option<u64>,
}

impl SlideTimer {
    pub const fn new() -> Self {
        Self {
            started_us: None,
            paused_at_us: None,
        }
    }

    /// Start timing a new entry
    pub fn restart(&mut self, now_us: u64) {
        self.started_us = Some(now_us);
        self.paused_at_us = None;
    }

    /// Stop timing; `is_due` stays false until the next restart
    pub fn stop(&mut self) {
        self.started_us = None;
        self.paused_at_us = None;
    }

    /// Freeze the elapsed time
    pub fn pause(&mut self, now_us: u64) {
        if self.started_us.is_some() && self.paused_at_us.is_none() {
            self.paused_at_us = Some(now_us);
        }
    }

    /// Continue after [`pause`](Self::pause), discounting the paused span
    pub fn resume(&mut self, now_us: u64) {
        if let (Some(started), Some(paused_at)) = (self.started_us, self.paused_at_us.take()) {
            let paused_for = now_us.saturating_sub(paused_at);
            self.started_us = Some(started.saturating_add(paused_for));
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_us.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at_us.is_some()
    }

    /// Display time of the current entry (µs)
    pub fn elapsed_us(&self, now_us: u64) -> u64 {
        match self.started_us {
            Some(started) => self.paused_at_us.unwrap_or(now_us).saturating_sub(started),
            None => 0,
        }
    }

    /// Check if an entry of `duration_ms` has been shown long enough
    ///
    /// A zero duration never expires.
    pub fn is_due(&self, now_us: u64, duration_ms: u32) -> bool {
        if duration_ms == 0 || !self.is_running() || self.is_paused() {
            return false;
        }
        self.elapsed_us(now_us) >= duration_ms as u64 * 1000
    }
}
