//! kde — kernel-density photon rates.
//!
//! Purpose
//! -------
//! Estimate photon rates as sums of kernel weights (Laplace, Gaussian, or
//! rectangular) centered on each timestamp, either at arbitrary query times
//! or at the timestamps themselves.
//!
//! Key behaviors
//! -------------
//! - [`kernel`]: kernel shapes and precomputed weights.
//! - [`options`]: validated [`KdeOptions`] (bandwidth, truncation, backend,
//!   sort check).
//! - [`window`]: the two-pointer sliding window behind self-evaluation.
//! - [`backend`]: the [`KdeBackend`] trait with sliding-window and
//!   brute-force implementations.
//! - [`evaluate`]: public entry points and per-shape conveniences.
//! - [`chunked`]: overlapping-chunk and multi-stream evaluation, parallel
//!   under the `parallel` feature.
//!
//! Conventions
//! -----------
//! - Timestamps are sorted `i64` clock ticks; `tau` is in ticks.
//! - Rates are unnormalized kernel sums; `nph` counts the timestamps within
//!   the truncation window (`5 * tau` by default).
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests; backend agreement and window
//!   properties are fuzzed in `tests/rate_properties.rs`.

pub mod backend;
pub mod chunked;
pub mod evaluate;
pub mod kernel;
pub mod options;
pub mod window;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::backend::{BackendKind, BruteForce, KdeBackend, SlidingWindow};
pub use self::chunked::{kde_self_batch, kde_self_chunked};
pub use self::evaluate::{
    kde_gaussian, kde_gaussian_self, kde_laplace, kde_laplace_self, kde_rates, kde_rates_at,
    kde_rect, kde_rect_self, kde_self,
};
pub use self::kernel::{KernelShape, KernelWeights};
pub use self::options::{DEFAULT_TRUNCATION, KdeOptions};
pub use self::window::{KdeSelfRates, WindowCursor};

// ---- Prelude (opt-in convenience) -----------------------------------------

pub mod prelude {
    pub use super::{
        BackendKind, KdeOptions, KdeSelfRates, KernelShape, kde_rates, kde_rates_at, kde_self,
        kde_self_chunked,
    };
}
