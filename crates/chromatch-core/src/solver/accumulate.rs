//! Streaming accumulation of normal-equation statistics.

use crate::error::{ImageRole, ValidationError};
use crate::models::{ColorSample, PixelBuffer};
use crate::parallel::{ordered_block_reduce, Parallelism};

/// Pixels per reduction block. Fixed so the merge order never depends on
/// the thread count.
pub const ACCUMULATION_BLOCK_PIXELS: usize = 4096;

/// Everything the solver needs, in constant space
///
/// * `gram` is `sum s * s^T` over source samples, shared by all channels
/// * `cross[c]` is `sum t_c * s`, the right-hand side for output channel `c`
/// * `target_energy[c]` is `sum t_c^2`, used only for residual reporting
///
/// Statistics from disjoint pixel sets combine with `merge`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SufficientStatistics {
    gram: [[f64; 3]; 3],
    cross: [[f64; 3]; 3],
    target_energy: [f64; 3],
    samples: u64,
}

impl SufficientStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one correspondence.
    #[inline]
    pub fn push(&mut self, source: ColorSample, target: ColorSample) {
        let s = source.0;
        let t = target.0;
        for i in 0..3 {
            for j in 0..3 {
                self.gram[i][j] += s[i] * s[j];
            }
        }
        for c in 0..3 {
            for j in 0..3 {
                self.cross[c][j] += t[c] * s[j];
            }
            self.target_energy[c] += t[c] * t[c];
        }
        self.samples += 1;
    }

    /// Element-wise sum with statistics from another pixel set.
    pub fn merge(mut self, other: Self) -> Self {
        for i in 0..3 {
            for j in 0..3 {
                self.gram[i][j] += other.gram[i][j];
                self.cross[i][j] += other.cross[i][j];
            }
            self.target_energy[i] += other.target_energy[i];
        }
        self.samples += other.samples;
        self
    }

    pub fn gram(&self) -> &[[f64; 3]; 3] {
        &self.gram
    }

    /// Right-hand side `b_c` for output channel `channel`.
    pub fn cross(&self, channel: usize) -> [f64; 3] {
        self.cross[channel]
    }

    pub fn target_energy(&self) -> [f64; 3] {
        self.target_energy
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples == 0
    }

    /// Accumulate interleaved RGB slices of equal length.
    fn fold_block(mut self, start: &[u8], target: &[u8]) -> Self {
        for (s, t) in start.chunks_exact(3).zip(target.chunks_exact(3)) {
            self.push(ColorSample::from_bytes(s), ColorSample::from_bytes(t));
        }
        self
    }
}

/// Check that two buffers can be paired pixel for pixel.
///
/// Order of checks: malformed start, malformed target, width/height
/// mismatch, then channel counts (start first).
pub fn validate_pair(start: &PixelBuffer, target: &PixelBuffer) -> Result<(), ValidationError> {
    start.validate(ImageRole::Start)?;
    target.validate(ImageRole::Target)?;

    if start.dimensions() != target.dimensions() {
        return Err(ValidationError::DimensionMismatch {
            start: start.dimensions(),
            target: target.dimensions(),
        });
    }

    start.validate_rgb(ImageRole::Start)?;
    target.validate_rgb(ImageRole::Target)?;
    Ok(())
}

/// Single-threaded accumulation over all pixel pairs.
pub fn accumulate(
    start: &PixelBuffer,
    target: &PixelBuffer,
) -> Result<SufficientStatistics, ValidationError> {
    accumulate_with(start, target, Parallelism::Sequential)
}

/// Accumulate over all pixel pairs with the requested execution mode.
///
/// Both buffers are validated before any pixel is read. The result is
/// identical for every mode and thread count.
pub fn accumulate_with(
    start: &PixelBuffer,
    target: &PixelBuffer,
    parallelism: Parallelism,
) -> Result<SufficientStatistics, ValidationError> {
    validate_pair(start, target)?;

    let pixel_count = start.pixel_count();
    let fan_out = parallelism.fans_out(pixel_count);
    let block_len = ACCUMULATION_BLOCK_PIXELS * 3;
    let start_data = start.data();
    let target_data = target.data();

    // Both layouts are identical, so a block covers the same byte range in
    // the start and target buffers.
    let stats = ordered_block_reduce(
        start_data.len().div_ceil(block_len),
        fan_out,
        SufficientStatistics::new,
        |acc, index| {
            let begin = index * block_len;
            let end = (begin + block_len).min(start_data.len());
            acc.fold_block(&start_data[begin..end], &target_data[begin..end])
        },
        SufficientStatistics::merge,
    );

    log::debug!(
        "Accumulated {} correspondences ({} mode)",
        stats.samples(),
        if fan_out { "parallel" } else { "sequential" }
    );
    Ok(stats)
}
