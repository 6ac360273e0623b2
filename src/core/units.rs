//! Clock units for photon timestamps.
//!
//! - [`ClockPeriod`] records the duration of one clock tick in seconds.
//!
//! Notes
//! -----
//! - Estimators work in raw ticks; `ClockPeriod` is only used when a caller
//!   wants delays in physical units (e.g. the millisecond delay histograms).
use crate::core::errors::{RateError, RateResult};

/// Duration of one timestamp clock tick, in seconds.
///
/// Invariant: finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockPeriod {
    seconds: f64,
}

impl ClockPeriod {
    /// Construct a clock period from seconds per tick (e.g. `12.5e-9`).
    ///
    /// # Errors
    /// - [`RateError::InvalidClockPeriod`] if `seconds` is not finite or `<= 0`.
    pub fn new(seconds: f64) -> RateResult<Self> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(RateError::InvalidClockPeriod { value: seconds });
        }
        Ok(ClockPeriod { seconds })
    }

    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    /// Convert a tick count to seconds.
    pub fn ticks_to_seconds(&self, ticks: i64) -> f64 {
        ticks as f64 * self.seconds
    }

    /// Convert a tick count to milliseconds.
    pub fn ticks_to_millis(&self, ticks: i64) -> f64 {
        ticks as f64 * self.seconds * 1e3
    }
}
