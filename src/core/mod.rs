//! core — errors, input guards, and units shared by every estimator.
//!
//! Purpose
//! -------
//! Hold the small pieces the m-tuple and KDE subtrees both depend on: the
//! crate error type, boundary validation, and the clock-period unit.
//!
//! Conventions
//! -----------
//! - Timestamps are `i64` clock ticks, sorted non-decreasing. They are
//!   borrowed, never copied or mutated.
//! - Every public estimator validates its scalar parameters through
//!   [`validation`] before allocating output.

pub mod errors;
pub mod units;
pub mod validation;

pub use self::errors::{RateError, RateResult};
pub use self::units::ClockPeriod;
pub use self::validation::{validate_m, validate_sorted, validate_tau, validate_truncation};
