//! Time source abstraction
//!
//! The engine stamps every rendered line so callers can measure the
//! actual refresh cadence against the spin speed.

/// Monotonic microsecond clock
pub trait MonotonicClock {
    /// Microseconds since an arbitrary fixed origin; never decreases
    fn now_micros(&self) -> u64;
}

impl<T: MonotonicClock> MonotonicClock for &T {
    fn now_micros(&self) -> u64 {
        (**self).now_micros()
    }
}
