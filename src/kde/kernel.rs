//! Kernel shapes for KDE photon rates.
//!
//! This module provides:
//! - A `KernelShape` enum with the three supported kernels (Laplace, Gaussian,
//!   rectangular).
//! - Unnormalized weights `K(d; tau)` with `K(0; tau) = 1` for every shape.
//! - The support radius used to truncate each kernel, and the conventional
//!   divisor callers apply to turn a raw weight sum into events per tick.
//!
//! Conventions:
//! - `d` is a time difference in clock ticks; kernels are symmetric in `d`.
//! - Estimators in this crate never divide by [`KernelShape::rate_divisor`];
//!   the raw weight sum is the output contract.
use crate::core::errors::RateError;
use std::{fmt, str::FromStr};

/// KDE kernel family.
///
/// - `Laplace`: symmetric exponential `exp(-|d| / tau)`; truncated at a
///   multiple of `tau` (5 by default).
/// - `Gaussian`: `exp(-d² / (2 tau²))`; truncated like `Laplace`.
/// - `Rect`: `1` for `|d| <= tau`, `0` otherwise; exact support `tau`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelShape {
    Laplace,
    Gaussian,
    Rect,
}

impl KernelShape {
    /// Evaluate the kernel weight at time difference `delta`.
    ///
    /// # Arguments
    /// - `delta`: time difference in ticks.
    /// - `tau`: bandwidth in ticks, assumed `> 0`.
    ///
    /// # Returns
    /// Unnormalized weight in `[0, 1]`, equal to `1` at `delta = 0`.
    pub fn weight(&self, delta: f64, tau: f64) -> f64 {
        KernelWeights::new(*self, tau).eval(delta)
    }

    /// Radius beyond which the kernel is treated as zero.
    ///
    /// `Laplace` and `Gaussian` use `truncation * tau`; `Rect` uses `tau`.
    pub fn support(&self, tau: f64, truncation: f64) -> f64 {
        match self {
            KernelShape::Laplace | KernelShape::Gaussian => truncation * tau,
            KernelShape::Rect => tau,
        }
    }

    /// Conventional divisor converting a raw weight sum into events per
    /// tick: `2 tau` (Laplace), `2.5 tau` (Gaussian), `tau` (Rect).
    pub fn rate_divisor(&self, tau: f64) -> f64 {
        match self {
            KernelShape::Laplace => 2.0 * tau,
            KernelShape::Gaussian => 2.5 * tau,
            KernelShape::Rect => tau,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            KernelShape::Laplace => "laplace",
            KernelShape::Gaussian => "gaussian",
            KernelShape::Rect => "rect",
        }
    }
}

impl fmt::Display for KernelShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KernelShape {
    type Err = RateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "laplace" | "exponential" | "exp" => Ok(KernelShape::Laplace),
            "gaussian" | "gauss" => Ok(KernelShape::Gaussian),
            "rect" | "rectangular" | "box" => Ok(KernelShape::Rect),
            other => Err(RateError::UnknownKernel { name: other.to_string() }),
        }
    }
}

/// Kernel bound to a bandwidth.
///
/// Both KDE backends evaluate through this type, so their sums agree term
/// by term. Distances are divided by `tau` per term, so `K(0) = 1` holds
/// for every finite positive `tau`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelWeights {
    shape: KernelShape,
    tau: f64,
}

impl KernelWeights {
    pub fn new(shape: KernelShape, tau: f64) -> Self {
        KernelWeights { shape, tau }
    }

    pub fn shape(&self) -> KernelShape {
        self.shape
    }

    #[inline]
    pub fn eval(&self, delta: f64) -> f64 {
        match self.shape {
            KernelShape::Laplace => (-delta.abs() / self.tau).exp(),
            KernelShape::Gaussian => (-0.5 * (delta / self.tau).powi(2)).exp(),
            KernelShape::Rect => {
                if delta.abs() <= self.tau {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}
