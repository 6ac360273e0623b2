//! KDE options — configuration for kernel rate estimation.
//!
//! Purpose
//! -------
//! Collect the knobs of a KDE rate evaluation in one validated value: the
//! kernel shape, its bandwidth, the truncation multiple, which backend runs
//! the computation, and whether the input's sort order is checked first.
//!
//! Key behaviors
//! -------------
//! - [`KdeOptions::new`] validates `tau` and fills the defaults
//!   (truncation `5 * tau`, sliding-window backend, sort check in debug
//!   builds only).
//! - Builder methods (`with_truncation`, `with_backend`, `with_sort_check`)
//!   return adjusted copies; `with_truncation` re-validates.
//! - [`KdeOptions::window_limit`] converts the truncation radius into an
//!   integer tick bound so window membership is decided without floating
//!   error.
//!
//! Invariants & assumptions
//! ------------------------
//! - `tau` and `truncation` are finite and strictly positive once an
//!   instance exists.
//! - The options carry no data; they are `Copy` and can be shared across
//!   threads for batched evaluation.
use crate::{
    core::{
        errors::RateResult,
        validation::{validate_tau, validate_truncation},
    },
    kde::{
        backend::BackendKind,
        kernel::{KernelShape, KernelWeights},
    },
};

/// Default support multiple for truncated kernels: weights beyond
/// `5 * tau` are dropped.
pub const DEFAULT_TRUNCATION: f64 = 5.0;

/// KdeOptions — validated configuration for one KDE evaluation.
///
/// Fields
/// ------
/// - `shape`: [`KernelShape`]
///   Kernel family.
/// - `tau`: `f64`
///   Bandwidth in clock ticks.
/// - `truncation`: `f64`
///   Window radius as a multiple of `tau`. It bounds both the truncated
///   kernels' support and the self-evaluation window whose population is
///   reported as `nph`. The window never shrinks below the kernel support.
/// - `backend`: [`BackendKind`]
///   Implementation that runs the computation.
/// - `check_sorted`: `bool`
///   Whether to scan the input for sortedness before evaluating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KdeOptions {
    shape: KernelShape,
    tau: f64,
    truncation: f64,
    backend: BackendKind,
    check_sorted: bool,
}

impl KdeOptions {
    /// Construct options for `shape` with bandwidth `tau` and defaults for
    /// everything else.
    ///
    /// Errors
    /// ------
    /// - `RateError::InvalidBandwidth` if `tau` is not finite and positive.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use photon_rates::kde::{KdeOptions, KernelShape, BackendKind};
    /// let opts = KdeOptions::new(KernelShape::Laplace, 10.0)
    ///     .unwrap()
    ///     .with_backend(BackendKind::BruteForce);
    /// assert_eq!(opts.window_limit(), 50);
    /// assert!(KdeOptions::new(KernelShape::Rect, 0.0).is_err());
    /// ```
    pub fn new(shape: KernelShape, tau: f64) -> RateResult<Self> {
        validate_tau(tau)?;
        Ok(KdeOptions {
            shape,
            tau,
            truncation: DEFAULT_TRUNCATION,
            backend: BackendKind::default(),
            check_sorted: cfg!(debug_assertions),
        })
    }

    /// Replace the truncation multiple.
    pub fn with_truncation(mut self, factor: f64) -> RateResult<Self> {
        validate_truncation(factor)?;
        self.truncation = factor;
        Ok(self)
    }

    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Enable or disable the O(N) sortedness scan.
    pub fn with_sort_check(mut self, check: bool) -> Self {
        self.check_sorted = check;
        self
    }

    pub fn shape(&self) -> KernelShape {
        self.shape
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    pub fn truncation(&self) -> f64 {
        self.truncation
    }

    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    pub fn check_sorted(&self) -> bool {
        self.check_sorted
    }

    /// Largest integer tick distance inside the self-evaluation window:
    /// `floor(max(truncation * tau, support()))`.
    ///
    /// The window always covers the kernel support, so a `Rect` kernel with
    /// `truncation < 1` still sees every timestamp within `tau`. For integer
    /// timestamps `|d| <= radius` holds exactly when `|d| <= window_limit()`.
    /// Radii beyond `u64::MAX` saturate.
    pub fn window_limit(&self) -> u64 {
        (self.truncation * self.tau).max(self.support()).floor() as u64
    }

    /// Kernel support radius used by the general (arbitrary query axis)
    /// evaluation.
    pub fn support(&self) -> f64 {
        self.shape.support(self.tau, self.truncation)
    }

    pub fn kernel(&self) -> KernelWeights {
        KernelWeights::new(self.shape, self.tau)
    }
}
