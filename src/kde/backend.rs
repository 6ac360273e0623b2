//! KDE backends — interchangeable implementations of the same estimator.
//!
//! Purpose
//! -------
//! Put the KDE computation behind a small trait so the fast sliding-window
//! implementation can be checked against a direct O(N²) one, and so callers
//! can select either through [`KdeOptions`](crate::kde::KdeOptions).
//!
//! Key behaviors
//! -------------
//! - [`SlidingWindow`]: two-pointer self-evaluation and binary-search
//!   evaluation at arbitrary times. Default.
//! - [`BruteForce`]: scans every timestamp for every query. Same window
//!   predicates and summation order as [`SlidingWindow`], so on sorted
//!   input the two agree bit for bit.
//! - [`BackendKind`] is the `Copy` selector stored in options;
//!   [`BackendKind::backend`] resolves it to a `'static` trait object.
//!
//! Invariants & assumptions
//! ------------------------
//! - Backends never validate their inputs; `kde::evaluate` runs the sort
//!   check and option validation happens when options are built.
use crate::{
    core::errors::RateResult,
    kde::{
        options::KdeOptions,
        window::{
            KdeSelfRates, in_support, photon_count, search_rates_at, sliding_self_rates,
        },
    },
};
use ndarray::Array1;

/// A KDE implementation.
pub trait KdeBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Rates and photon counts at every timestamp of `ph`.
    fn self_rates(&self, ph: &[i64], opts: &KdeOptions) -> RateResult<KdeSelfRates>;

    /// Rates at each time in `time_axis`, in axis order.
    fn rates_at(&self, ph: &[i64], time_axis: &[f64], opts: &KdeOptions)
    -> RateResult<Array1<f64>>;
}

/// Two-pointer sliding window; amortized O(N + Σ window) for self-evaluation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlidingWindow;

impl KdeBackend for SlidingWindow {
    fn name(&self) -> &'static str {
        "sliding-window"
    }

    fn self_rates(&self, ph: &[i64], opts: &KdeOptions) -> RateResult<KdeSelfRates> {
        sliding_self_rates(ph, 0..ph.len(), opts.kernel(), opts.window_limit(), 0)
    }

    fn rates_at(
        &self, ph: &[i64], time_axis: &[f64], opts: &KdeOptions,
    ) -> RateResult<Array1<f64>> {
        Ok(search_rates_at(ph, time_axis, opts.kernel(), opts.support()))
    }
}

/// Direct O(N · M) evaluation used as a reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForce;

impl KdeBackend for BruteForce {
    fn name(&self) -> &'static str {
        "brute-force"
    }

    fn self_rates(&self, ph: &[i64], opts: &KdeOptions) -> RateResult<KdeSelfRates> {
        let kernel = opts.kernel();
        let limit = opts.window_limit();
        let mut rates = Array1::<f64>::zeros(ph.len());
        let mut nph = Array1::<u16>::zeros(ph.len());

        for (i, &t) in ph.iter().enumerate() {
            let mut count = 0_usize;
            let mut total = 0.0_f64;
            for &x in ph.iter().filter(|&&x| x.abs_diff(t) <= limit) {
                count += 1;
                total += kernel.eval(x.abs_diff(t) as f64);
            }
            nph[i] = photon_count(i, count)?;
            rates[i] = total;
        }

        Ok(KdeSelfRates { rates, nph })
    }

    fn rates_at(
        &self, ph: &[i64], time_axis: &[f64], opts: &KdeOptions,
    ) -> RateResult<Array1<f64>> {
        let kernel = opts.kernel();
        let support = opts.support();
        Ok(Array1::from_iter(time_axis.iter().map(|&t| {
            let (lo, hi) = (t - support, t + support);
            ph.iter()
                .filter(|&&x| in_support(x, lo, hi))
                .map(|&x| kernel.eval(x as f64 - t))
                .sum::<f64>()
        })))
    }
}

/// Selector for a [`KdeBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackendKind {
    #[default]
    SlidingWindow,
    BruteForce,
}

impl BackendKind {
    pub fn backend(&self) -> &'static dyn KdeBackend {
        match self {
            BackendKind::SlidingWindow => &SlidingWindow,
            BackendKind::BruteForce => &BruteForce,
        }
    }
}
