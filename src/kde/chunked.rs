//! Chunked and batched KDE self-evaluation.
//!
//! Purpose
//! -------
//! Split long streams into independently computable pieces and evaluate
//! many streams at once. With the `parallel` feature the pieces run on the
//! rayon thread pool; without it they run in order on the calling thread.
//!
//! Key behaviors
//! -------------
//! - [`kde_self_chunked`] partitions the query indices into runs of
//!   `chunk_len`, extends each run's data slice by the window radius on both
//!   sides, and runs the sliding window on each slice. Because every window
//!   lies inside its extended slice, the concatenated output equals
//!   [`kde_self`] exactly.
//! - [`kde_self_batch`] maps [`kde_self`] over independent streams and keeps
//!   their order.
//!
//! Invariants & assumptions
//! ------------------------
//! - Chunked evaluation always uses the sliding window, whatever backend the
//!   options name; batch evaluation honors the selected backend.
//! - Errors carry indices into the full stream. When several chunks fail,
//!   which error is returned is unspecified under `parallel`.
//! - Unsorted input with the sort check disabled gives unspecified output,
//!   as for [`kde_self`], but never panics.
use crate::{
    core::{
        errors::{RateError, RateResult},
        validation::validate_sorted,
    },
    kde::{
        evaluate::kde_self,
        options::KdeOptions,
        window::{KdeSelfRates, sliding_self_rates},
    },
};
use ndarray::Array1;
use std::ops::Range;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Query index runs of length `chunk_len` (the last may be shorter).
fn query_chunks(n: usize, chunk_len: usize) -> Vec<Range<usize>> {
    (0..n).step_by(chunk_len).map(|start| start..(start + chunk_len).min(n)).collect()
}

/// Data range whose timestamps can fall in the window of any query in
/// `queries`.
///
/// The range always contains `queries`; on unsorted input the binary
/// searches are meaningless, and the clamp keeps the slice in bounds.
fn extended_slice(ph: &[i64], queries: &Range<usize>, limit: u64) -> Range<usize> {
    let lo_t = ph[queries.start].saturating_sub_unsigned(limit);
    let hi_t = ph[queries.end - 1].saturating_add_unsigned(limit);
    let lo = ph.partition_point(|&x| x < lo_t).min(queries.start);
    let hi = ph.partition_point(|&x| x <= hi_t).max(queries.end);
    lo..hi
}

fn run_chunk(ph: &[i64], queries: Range<usize>, opts: &KdeOptions) -> RateResult<KdeSelfRates> {
    let limit = opts.window_limit();
    let data = extended_slice(ph, &queries, limit);
    let local = (queries.start - data.start)..(queries.end - data.start);
    sliding_self_rates(&ph[data.clone()], local, opts.kernel(), limit, data.start)
}

/// Self-evaluation over overlapping chunks of `chunk_len` query indices.
///
/// Errors
/// ------
/// - `RateError::InvalidChunkLength` if `chunk_len == 0`.
/// - Any error [`kde_self`] can return.
pub fn kde_self_chunked(
    ph: &[i64], opts: &KdeOptions, chunk_len: usize,
) -> RateResult<KdeSelfRates> {
    if chunk_len == 0 {
        return Err(RateError::InvalidChunkLength);
    }
    if opts.check_sorted() {
        validate_sorted(ph)?;
    }
    let chunks = query_chunks(ph.len(), chunk_len);
    tracing::debug!(
        n = ph.len(),
        chunks = chunks.len(),
        tau = opts.tau(),
        shape = %opts.shape(),
        "chunked kde self-evaluation"
    );

    #[cfg(feature = "parallel")]
    let parts: Vec<KdeSelfRates> =
        chunks.into_par_iter().map(|q| run_chunk(ph, q, opts)).collect::<RateResult<_>>()?;
    #[cfg(not(feature = "parallel"))]
    let parts: Vec<KdeSelfRates> =
        chunks.into_iter().map(|q| run_chunk(ph, q, opts)).collect::<RateResult<_>>()?;

    Ok(KdeSelfRates {
        rates: Array1::from_iter(parts.iter().flat_map(|p| p.rates.iter().copied())),
        nph: Array1::from_iter(parts.iter().flat_map(|p| p.nph.iter().copied())),
    })
}

/// Self-evaluation of several independent streams with shared options.
pub fn kde_self_batch(streams: &[&[i64]], opts: &KdeOptions) -> RateResult<Vec<KdeSelfRates>> {
    tracing::debug!(streams = streams.len(), "batched kde self-evaluation");

    #[cfg(feature = "parallel")]
    let out = streams.par_iter().map(|ph| kde_self(ph, opts)).collect();
    #[cfg(not(feature = "parallel"))]
    let out = streams.iter().map(|ph| kde_self(ph, opts)).collect();

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kde::kernel::KernelShape;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Chunk partitioning and slice extension.
    // - Exact equality of chunked and unchunked output for chunk lengths
    //   smaller than, equal to, and larger than the stream.
    // - Global indices in chunked overflow errors.
    // - Order preservation in batch evaluation.
    // - Rayon-backed chunk and batch paths on a multi-threaded pool (run
    //   with `cargo test --features parallel`).
    // -------------------------------------------------------------------------

    fn clustered_stream() -> Vec<i64> {
        // Bursts of 8 photons 1 tick apart every 37 ticks, with a gap.
        (0..20_i64)
            .filter(|b| *b != 7)
            .flat_map(|b| (0..8_i64).map(move |k| b * 37 + k))
            .collect()
    }

    #[test]
    // Purpose
    // -------
    // Verify chunk boundaries and extended data slices.
    //
    // Given
    // -----
    // - n = 10, chunk_len = 4; ph = [0, 10, 20, ..., 90], limit = 15.
    //
    // Expect
    // ------
    // - Chunks 0..4, 4..8, 8..10.
    // - Queries 4..8 (t in [40, 70]) need data 3..9 (t in [30, 80]).
    fn chunks_and_extended_slices() {
        // Arrange
        let ph: Vec<i64> = (0..10).map(|k| k * 10).collect();

        // Act
        let chunks = query_chunks(10, 4);
        let data = extended_slice(&ph, &(4..8), 15);

        // Assert
        assert_eq!(chunks, vec![0..4, 4..8, 8..10]);
        assert_eq!(data, 3..9);
    }

    #[test]
    // Purpose
    // -------
    // Ensure chunked evaluation reproduces the unchunked result exactly.
    //
    // Given
    // -----
    // - A clustered stream, tau = 3, each shape, chunk lengths 1, 5, 64,
    //   and one longer than the stream.
    //
    // Expect
    // ------
    // - Identical `KdeSelfRates`.
    fn chunked_matches_unchunked() {
        // Arrange
        let ph = clustered_stream();

        for shape in [KernelShape::Laplace, KernelShape::Gaussian, KernelShape::Rect] {
            let opts = KdeOptions::new(shape, 3.0).unwrap();
            let whole = kde_self(&ph, &opts).unwrap();

            for chunk_len in [1, 5, 64, ph.len() + 3] {
                // Act
                let chunked = kde_self_chunked(&ph, &opts, chunk_len).unwrap();

                // Assert
                assert_eq!(chunked, whole, "shape {shape}, chunk_len {chunk_len}");
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Check argument validation and the empty stream.
    //
    // Expect
    // ------
    // - chunk_len = 0 is rejected; an empty stream yields empty output.
    fn chunked_rejects_zero_length_and_accepts_empty() {
        // Arrange
        let opts = KdeOptions::new(KernelShape::Laplace, 1.0).unwrap();

        // Act & Assert
        assert_eq!(kde_self_chunked(&[1, 2], &opts, 0), Err(RateError::InvalidChunkLength));
        assert!(kde_self_chunked(&[], &opts, 8).unwrap().is_empty());
    }

    #[test]
    // Purpose
    // -------
    // Ensure unsorted input with the sort check disabled returns a result
    // of the right length instead of panicking, and that the check rejects
    // it when enabled.
    //
    // Given
    // -----
    // - ph = [100, 0, 50, 1, 200], chunk lengths 1 and 2.
    //
    // Expect
    // ------
    // - Ok with 5 rates and 5 counts when unchecked.
    // - `UnsortedTimestamps { index: 1, .. }` when checked.
    fn chunked_unsorted_input_does_not_panic() {
        // Arrange
        let ph = [100_i64, 0, 50, 1, 200];
        let opts = KdeOptions::new(KernelShape::Laplace, 2.0).unwrap();

        for chunk_len in [1, 2] {
            // Act
            let unchecked = kde_self_chunked(&ph, &opts.with_sort_check(false), chunk_len);
            let checked = kde_self_chunked(&ph, &opts.with_sort_check(true), chunk_len);

            // Assert
            let out = unchecked.unwrap();
            assert_eq!(out.rates.len(), 5);
            assert_eq!(out.nph.len(), 5);
            assert!(matches!(checked, Err(RateError::UnsortedTimestamps { index: 1, .. })));
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that a chunked overflow reports the index in the full stream.
    //
    // Given
    // -----
    // - 100 well-separated timestamps followed by 70_000 duplicates;
    //   chunk_len = 50.
    //
    // Expect
    // ------
    // - `CountOverflow` with `count == 70_000` at an index inside the
    //   duplicate run (exactly 100 when chunks run sequentially).
    fn chunked_overflow_reports_global_index() {
        // Arrange
        let mut ph: Vec<i64> = (0..100).map(|k| k * 1_000).collect();
        ph.extend(std::iter::repeat_n(1_000_000_i64, 70_000));
        let opts = KdeOptions::new(KernelShape::Laplace, 1.0).unwrap();

        // Act
        let result = kde_self_chunked(&ph, &opts, 50);

        // Assert
        match result {
            Err(RateError::CountOverflow { index, count }) => {
                assert_eq!(count, 70_000);
                assert!(index >= 100 && (index - 100) % 50 == 0, "index {index}");
                #[cfg(not(feature = "parallel"))]
                assert_eq!(index, 100);
            }
            other => panic!("expected CountOverflow, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure batch evaluation returns one result per stream in input order.
    //
    // Given
    // -----
    // - Streams [], [5], and a clustered stream.
    //
    // Expect
    // ------
    // - Each result equals `kde_self` on that stream.
    fn batch_preserves_stream_order() {
        // Arrange
        let clustered = clustered_stream();
        let streams: Vec<&[i64]> = vec![&[], &[5], &clustered];
        let opts = KdeOptions::new(KernelShape::Gaussian, 2.0).unwrap();

        // Act
        let out = kde_self_batch(&streams, &opts).unwrap();

        // Assert
        assert_eq!(out.len(), 3);
        for (ph, res) in streams.iter().zip(&out) {
            assert_eq!(res, &kde_self(ph, &opts).unwrap());
        }
    }

    #[cfg(feature = "parallel")]
    #[test]
    // Purpose
    // -------
    // Ensure the rayon paths reassemble chunks and batch results in input
    // order when work is spread across several threads.
    //
    // Given
    // -----
    // - A 4-thread pool, a clustered stream, chunk lengths 1 and 7.
    // - A batch of the stream, its mirror, and a single timestamp.
    //
    // Expect
    // ------
    // - Chunked output equals `kde_self`; batch output equals `kde_self`
    //   per stream.
    fn parallel_pool_preserves_order() {
        // Arrange
        let pool = rayon::ThreadPoolBuilder::new().num_threads(4).build().unwrap();
        let ph = clustered_stream();
        let mirrored: Vec<i64> = ph.iter().rev().map(|&x| -x).collect();
        let streams: Vec<&[i64]> = vec![&ph, &mirrored, &[9]];
        let opts = KdeOptions::new(KernelShape::Laplace, 4.0).unwrap();
        let whole = kde_self(&ph, &opts).unwrap();

        // Act
        let (chunked_1, chunked_7, batch) = pool.install(|| {
            (
                kde_self_chunked(&ph, &opts, 1).unwrap(),
                kde_self_chunked(&ph, &opts, 7).unwrap(),
                kde_self_batch(&streams, &opts).unwrap(),
            )
        });

        // Assert
        assert_eq!(chunked_1, whole);
        assert_eq!(chunked_7, whole);
        assert_eq!(batch.len(), 3);
        for (stream, res) in streams.iter().zip(&batch) {
            assert_eq!(res, &kde_self(stream, &opts).unwrap());
        }
    }
}
