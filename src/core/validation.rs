//! core::validation — shared input guards for the rate estimators.
//!
//! Purpose
//! -------
//! Centralize the boundary checks every estimator performs before touching
//! its input, so that preconditions are rejected with the same error variant
//! regardless of which entry point was called.
//!
//! Key behaviors
//! -------------
//! - Check scalar parameters (`tau`, `m`, truncation multiple) and map
//!   violations to [`RateError`].
//! - Offer an O(N) monotonicity scan, [`validate_sorted`], that callers and
//!   [`KdeOptions`](crate::kde::KdeOptions) may run before windowed
//!   algorithms whose pointer invariant relies on sorted input.
//!
//! Invariants & assumptions
//! ------------------------
//! - Sortedness is a *precondition*; estimators never check it unless asked.
//!   Skipping the scan on unsorted data yields unspecified (but memory-safe)
//!   output.
//!
//! Testing notes
//! -------------
//! - Unit tests cover each error branch and the success paths.

use crate::core::errors::{RateError, RateResult};

/// Reject a bandwidth that is non-finite or not strictly positive.
pub fn validate_tau(tau: f64) -> RateResult<()> {
    if !tau.is_finite() || tau <= 0.0 {
        return Err(RateError::InvalidBandwidth { tau });
    }
    Ok(())
}

/// Reject an m-tuple size of zero.
pub fn validate_m(m: usize) -> RateResult<()> {
    if m == 0 {
        return Err(RateError::InvalidWindowSize { m });
    }
    Ok(())
}

/// Reject a kernel truncation multiple that is non-finite or not strictly
/// positive.
pub fn validate_truncation(factor: f64) -> RateResult<()> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(RateError::InvalidTruncation { factor });
    }
    Ok(())
}

/// Verify that `ph` is sorted in non-decreasing order.
///
/// Parameters
/// ----------
/// - `ph`: `&[i64]`
///   Photon timestamps in clock ticks.
///
/// Returns
/// -------
/// `RateResult<()>`
///   `Ok(())` when every `ph[i] >= ph[i - 1]`; repeated timestamps are
///   allowed.
///
/// Errors
/// ------
/// - `RateError::UnsortedTimestamps { index, prev, next }`
///   For the first `index` with `ph[index] < ph[index - 1]`.
///
/// Examples
/// --------
/// ```rust
/// # use photon_rates::core::validation::validate_sorted;
/// assert!(validate_sorted(&[0, 5, 5, 9]).is_ok());
/// assert!(validate_sorted(&[0, 5, 4]).is_err());
/// ```
pub fn validate_sorted(ph: &[i64]) -> RateResult<()> {
    match ph.windows(2).position(|pair| pair[1] < pair[0]) {
        Some(pos) => {
            let index = pos + 1;
            tracing::warn!(index, prev = ph[pos], next = ph[index], "timestamps are not sorted");
            Err(RateError::UnsortedTimestamps { index, prev: ph[pos], next: ph[index] })
        }
        None => Ok(()),
    }
}
