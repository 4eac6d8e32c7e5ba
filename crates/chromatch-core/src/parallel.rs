//! Sequential/parallel dispatch for per-pixel work
//!
//! Both helpers split the data into fixed-size blocks that do not depend on
//! the thread count. Reductions merge block partials in block order and
//! mappings write disjoint output blocks, so the parallel path produces the
//! same result as the sequential one, bit for bit.

use rayon::prelude::*;

/// Default minimum pixel count before the parallel mode fans out
pub const PARALLEL_THRESHOLD: usize = 30_000;

/// Execution mode for the accumulator and the applier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parallelism {
    /// Single-threaded (default)
    #[default]
    Sequential,

    /// Spread blocks over the rayon pool once the image has at least
    /// `min_pixels` pixels; smaller images run sequentially
    Parallel { min_pixels: usize },
}

impl Parallelism {
    /// Parallel mode with the default threshold
    pub fn parallel() -> Self {
        Self::Parallel {
            min_pixels: PARALLEL_THRESHOLD,
        }
    }

    pub fn from_flag(parallel: bool, min_pixels: usize) -> Self {
        if parallel {
            Self::Parallel { min_pixels }
        } else {
            Self::Sequential
        }
    }

    /// Whether an image of `pixel_count` pixels should use the rayon pool.
    pub fn fans_out(&self, pixel_count: usize) -> bool {
        match *self {
            Self::Sequential => false,
            Self::Parallel { min_pixels } => pixel_count >= min_pixels,
        }
    }
}

/// Fold each of `block_count` blocks from a fresh accumulator, then merge the
/// block partials left to right in block order.
///
/// `fold_block` receives the block index and decides which data it covers.
pub(crate) fn ordered_block_reduce<A, I, F, M>(
    block_count: usize,
    fan_out: bool,
    init: I,
    fold_block: F,
    merge: M,
) -> A
where
    A: Send,
    I: Fn() -> A + Sync,
    F: Fn(A, usize) -> A + Sync,
    M: Fn(A, A) -> A,
{
    let partials: Vec<A> = if fan_out {
        (0..block_count)
            .into_par_iter()
            .map(|index| fold_block(init(), index))
            .collect()
    } else {
        (0..block_count)
            .map(|index| fold_block(init(), index))
            .collect()
    };

    partials.into_iter().fold(init(), merge)
}

/// Run `f` over matching blocks of `input` and `output`.
///
/// Both slices are cut into blocks of `block_len` elements, so they must
/// share the same layout.
pub(crate) fn for_each_block_pair<T, U, F>(
    input: &[T],
    output: &mut [U],
    block_len: usize,
    fan_out: bool,
    f: F,
) where
    T: Sync,
    U: Send,
    F: Fn(&[T], &mut [U]) + Sync,
{
    if fan_out {
        output
            .par_chunks_mut(block_len)
            .zip(input.par_chunks(block_len))
            .for_each(|(out_block, in_block)| f(in_block, out_block));
    } else {
        for (out_block, in_block) in output.chunks_mut(block_len).zip(input.chunks(block_len)) {
            f(in_block, out_block);
        }
    }
}
