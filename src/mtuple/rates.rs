//! Sliding m-tuple rates, delays, and time coordinates.
//!
//! Purpose
//! -------
//! Estimate the local photon rate from every run of `m` consecutive
//! timestamps. Each tuple yields its duration (the m-photon delay), the
//! implied rate `m / delay`, and the tuple midpoint used as the rate's time
//! coordinate.
//!
//! Key behaviors
//! -------------
//! - Array functions ([`mtuple_delays`], [`mtuple_rates`], [`mtuple_rates_t`])
//!   return `N - m + 1` values, or an empty array when `N < m`.
//! - Reductions ([`mtuple_delays_min`], [`mtuple_rates_max`]) return `None`
//!   when no tuple exists, never a silent zero.
//! - [`MTupleRates::compute`] produces all three arrays in a single pass.
//!
//! Invariants & assumptions
//! ------------------------
//! - `ph` is sorted non-decreasing (precondition, not checked here).
//! - `m >= 1`; `m == 0` is rejected with `RateError::InvalidWindowSize`.
//! - `m == 1` is legal but degenerate: every delay is 0 and every rate is
//!   `+inf`.
//! - A zero delay (repeated timestamps) yields `rate = +inf`. That is a valid
//!   value for callers to filter, not an error.
//!
//! Downstream usage
//! ----------------
//! - Burst search compares `rates` against a threshold.
//! - Background estimation histograms `delays` (see
//!   [`delays`](crate::mtuple::delays) for the non-overlapping variant).
use crate::core::{errors::RateResult, validation::validate_m};
use ndarray::Array1;

/// Number of complete m-tuples in a stream of `n` timestamps.
#[inline]
fn tuple_count(n: usize, m: usize) -> usize {
    n.saturating_sub(m - 1)
}

/// MTupleRates — per-tuple delays, rates, and midpoints for one stream.
///
/// Fields
/// ------
/// - `m`: `usize`
///   Tuple size used to build the arrays.
/// - `delays`: `Array1<i64>`
///   `ph[i + m - 1] - ph[i]` in clock ticks.
/// - `rates`: `Array1<f64>`
///   `m / delays[i]` in photons per tick (`+inf` for zero delays).
/// - `time_axis`: `Array1<f64>`
///   `0.5 * (ph[i] + ph[i + m - 1])`.
///
/// Invariants
/// ----------
/// - All three arrays have length `max(N - m + 1, 0)`.
/// - `rates[i] * delays[i] == m` up to floating rounding for every finite
///   rate.
#[derive(Debug, Clone, PartialEq)]
pub struct MTupleRates {
    pub m: usize,
    pub delays: Array1<i64>,
    pub rates: Array1<f64>,
    pub time_axis: Array1<f64>,
}

impl MTupleRates {
    /// Compute delays, rates, and midpoints for every m-tuple of `ph`.
    ///
    /// Errors
    /// ------
    /// - `RateError::InvalidWindowSize` when `m == 0`.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use photon_rates::mtuple::MTupleRates;
    /// let ph = [0_i64, 10, 20, 30, 40, 50];
    /// let out = MTupleRates::compute(&ph, 3).unwrap();
    /// assert_eq!(out.delays.to_vec(), vec![20, 20, 20, 20]);
    /// assert_eq!(out.time_axis.to_vec(), vec![10.0, 20.0, 30.0, 40.0]);
    /// ```
    pub fn compute(ph: &[i64], m: usize) -> RateResult<Self> {
        validate_m(m)?;
        let count = tuple_count(ph.len(), m);
        tracing::debug!(n = ph.len(), m, tuples = count, "computing m-tuple rates");

        let mut delays = Array1::<i64>::zeros(count);
        let mut rates = Array1::<f64>::zeros(count);
        let mut time_axis = Array1::<f64>::zeros(count);
        let m_f = m as f64;
        for i in 0..count {
            let (first, last) = (ph[i], ph[i + m - 1]);
            let delay = last - first;
            delays[i] = delay;
            rates[i] = m_f / delay as f64;
            time_axis[i] = 0.5 * (first as f64 + last as f64);
        }

        Ok(MTupleRates { m, delays, rates, time_axis })
    }

    /// Number of tuples (length of every array).
    pub fn len(&self) -> usize {
        self.delays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delays.is_empty()
    }
}

/// m-photon delays `ph[i + m - 1] - ph[i]`, length `N - m + 1` (empty when
/// `N < m`).
pub fn mtuple_delays(ph: &[i64], m: usize) -> RateResult<Array1<i64>> {
    validate_m(m)?;
    let count = tuple_count(ph.len(), m);
    Ok(Array1::from_iter((0..count).map(|i| ph[i + m - 1] - ph[i])))
}

/// Minimum m-photon delay, or `None` when `ph` holds fewer than `m`
/// timestamps.
pub fn mtuple_delays_min(ph: &[i64], m: usize) -> RateResult<Option<i64>> {
    validate_m(m)?;
    let count = tuple_count(ph.len(), m);
    Ok((0..count).map(|i| ph[i + m - 1] - ph[i]).min())
}

/// m-photon rates `m / (ph[i + m - 1] - ph[i])`, length `N - m + 1`.
///
/// Rates are in photons per clock tick and unnormalized by any clock period.
pub fn mtuple_rates(ph: &[i64], m: usize) -> RateResult<Array1<f64>> {
    validate_m(m)?;
    let count = tuple_count(ph.len(), m);
    let m_f = m as f64;
    Ok(Array1::from_iter((0..count).map(|i| m_f / (ph[i + m - 1] - ph[i]) as f64)))
}

/// Time coordinate of each rate from [`mtuple_rates`]: the tuple midpoint
/// `0.5 * (ph[i] + ph[i + m - 1])`.
pub fn mtuple_rates_t(ph: &[i64], m: usize) -> RateResult<Array1<f64>> {
    validate_m(m)?;
    let count = tuple_count(ph.len(), m);
    Ok(Array1::from_iter((0..count).map(|i| 0.5 * (ph[i] as f64 + ph[i + m - 1] as f64))))
}

/// Maximum m-photon rate, or `None` when `ph` holds fewer than `m`
/// timestamps.
///
/// Computed from the minimum delay, so a zero delay yields `Some(+inf)`.
pub fn mtuple_rates_max(ph: &[i64], m: usize) -> RateResult<Option<f64>> {
    Ok(mtuple_delays_min(ph, m)?.map(|delay| m as f64 / delay as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::RateError;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The evenly spaced reference stream (delays, rates, midpoints).
    // - Output lengths at N = m, N < m, and N = 0.
    // - `None` reductions for insufficient data.
    // - Zero delays producing infinite rates.
    // - Rejection of m = 0 by every entry point.
    //
    // They intentionally DO NOT cover:
    // - Randomized identities (`rates * delays == m`), which live in the
    //   property tests under `tests/`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the concrete scenario of an evenly spaced stream.
    //
    // Given
    // -----
    // - ph = [0, 10, 20, 30, 40, 50], m = 3.
    //
    // Expect
    // ------
    // - 4 tuples with delays 20, rates 3/20 = 0.15, midpoints 10..40.
    fn compute_evenly_spaced_stream_matches_definition() {
        // Arrange
        let ph = [0_i64, 10, 20, 30, 40, 50];

        // Act
        let out = MTupleRates::compute(&ph, 3).expect("m = 3 is valid");

        // Assert
        assert_eq!(out.len(), 4);
        assert_eq!(out.delays.to_vec(), vec![20, 20, 20, 20]);
        for &rate in out.rates.iter() {
            assert_relative_eq!(rate, 0.15, max_relative = 1e-15);
        }
        assert_eq!(out.time_axis.to_vec(), vec![10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    // Purpose
    // -------
    // Ensure that the standalone array functions agree with
    // `MTupleRates::compute` on an irregular stream.
    //
    // Given
    // -----
    // - ph = [3, 4, 9, 11, 30, 31, 32], m = 4.
    //
    // Expect
    // ------
    // - Identical delays, rates, and time axes from both paths.
    fn array_functions_agree_with_compute() {
        // Arrange
        let ph = [3_i64, 4, 9, 11, 30, 31, 32];
        let m = 4;

        // Act
        let all = MTupleRates::compute(&ph, m).unwrap();
        let delays = mtuple_delays(&ph, m).unwrap();
        let rates = mtuple_rates(&ph, m).unwrap();
        let time_axis = mtuple_rates_t(&ph, m).unwrap();

        // Assert
        assert_eq!(delays, all.delays);
        assert_eq!(rates, all.rates);
        assert_eq!(time_axis, all.time_axis);
        assert_eq!(delays.to_vec(), vec![8, 26, 22, 21]);
    }

    #[test]
    // Purpose
    // -------
    // Check the length contract at and below the tuple size.
    //
    // Given
    // -----
    // - Streams of length 0, 2, and 3 with m = 3.
    //
    // Expect
    // ------
    // - Lengths 0, 0, and 1.
    fn lengths_follow_n_minus_m_plus_one() {
        // Act & Assert
        assert_eq!(mtuple_delays(&[], 3).unwrap().len(), 0);
        assert_eq!(mtuple_rates(&[1, 2], 3).unwrap().len(), 0);
        assert_eq!(mtuple_rates_t(&[1, 2, 5], 3).unwrap().len(), 1);
        assert!(MTupleRates::compute(&[1, 2], 3).unwrap().is_empty());
    }

    #[test]
    // Purpose
    // -------
    // Verify that reductions signal "no tuple" with `None` rather than a
    // zero or an error.
    //
    // Given
    // -----
    // - ph = [5, 8] with m = 3, and ph = [] with m = 1.
    //
    // Expect
    // ------
    // - `Ok(None)` for both reductions in both cases.
    fn reductions_return_none_when_insufficient_data() {
        // Act & Assert
        assert_eq!(mtuple_delays_min(&[5, 8], 3), Ok(None));
        assert_eq!(mtuple_rates_max(&[5, 8], 3), Ok(None));
        assert_eq!(mtuple_delays_min(&[], 1), Ok(None));
        assert_eq!(mtuple_rates_max(&[], 1), Ok(None));
    }

    #[test]
    // Purpose
    // -------
    // Check the reductions on a stream with a clear fastest tuple.
    //
    // Given
    // -----
    // - ph = [0, 100, 104, 108, 300], m = 3.
    //
    // Expect
    // ------
    // - Min delay 8 (tuple 100..108) and max rate 3/8.
    fn reductions_pick_fastest_tuple() {
        // Arrange
        let ph = [0_i64, 100, 104, 108, 300];

        // Act
        let min_delay = mtuple_delays_min(&ph, 3).unwrap();
        let max_rate = mtuple_rates_max(&ph, 3).unwrap();

        // Assert
        assert_eq!(min_delay, Some(8));
        assert_relative_eq!(max_rate.unwrap(), 3.0 / 8.0);
    }

    #[test]
    // Purpose
    // -------
    // Ensure repeated timestamps give infinite (not NaN, not error) rates,
    // including the degenerate m = 1 case.
    //
    // Given
    // -----
    // - ph = [1, 5, 5, 9] with m = 2 and m = 1.
    //
    // Expect
    // ------
    // - m = 2: rates [0.5, +inf, 0.5] and max rate +inf.
    // - m = 1: every rate +inf and every delay 0.
    fn zero_delays_yield_infinite_rates() {
        // Arrange
        let ph = [1_i64, 5, 5, 9];

        // Act
        let rates_m2 = mtuple_rates(&ph, 2).unwrap();
        let max_m2 = mtuple_rates_max(&ph, 2).unwrap();
        let out_m1 = MTupleRates::compute(&ph, 1).unwrap();

        // Assert
        assert_relative_eq!(rates_m2[0], 0.5);
        assert!(rates_m2[1].is_infinite() && rates_m2[1] > 0.0);
        assert_relative_eq!(rates_m2[2], 0.5);
        assert_eq!(max_m2, Some(f64::INFINITY));
        assert!(out_m1.delays.iter().all(|&d| d == 0));
        assert!(out_m1.rates.iter().all(|&r| r == f64::INFINITY));
        assert_eq!(out_m1.time_axis.to_vec(), vec![1.0, 5.0, 5.0, 9.0]);
    }

    #[test]
    // Purpose
    // -------
    // Verify that m = 0 is rejected by every entry point.
    //
    // Given
    // -----
    // - A short valid stream and m = 0.
    //
    // Expect
    // ------
    // - `InvalidWindowSize { m: 0 }` everywhere.
    fn zero_window_size_is_rejected() {
        // Arrange
        let ph = [0_i64, 1, 2];
        let expected = RateError::InvalidWindowSize { m: 0 };

        // Act & Assert
        assert_eq!(MTupleRates::compute(&ph, 0).unwrap_err(), expected);
        assert_eq!(mtuple_delays(&ph, 0).unwrap_err(), expected);
        assert_eq!(mtuple_rates(&ph, 0).unwrap_err(), expected);
        assert_eq!(mtuple_rates_t(&ph, 0).unwrap_err(), expected);
        assert_eq!(mtuple_delays_min(&ph, 0).unwrap_err(), expected);
        assert_eq!(mtuple_rates_max(&ph, 0).unwrap_err(), expected);
    }
}
