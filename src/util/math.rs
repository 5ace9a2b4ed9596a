//! Numeric helpers shared by the comparator and the post-processor.

/// Per-step relaxation factor applied to the similarity threshold.
pub(crate) const COARSE_RELAXATION: f64 = 0.9275;

/// Similarity ratio `min(a, b) / max(a, b)` of two non-negative sums.
///
/// Two zero sums are identical and score `1.0`; a zero against a non-zero sum
/// scores `0.0`.
#[inline]
pub(crate) fn ratio(a: u32, b: u32) -> f32 {
    let (lo, hi) = if a > b { (b, a) } else { (a, b) };
    if hi == 0 {
        return 1.0;
    }
    lo as f32 / hi as f32
}

/// Threshold applied at a pyramid level whose scale divider is `step`.
///
/// The finest level (`step == 1`) uses the threshold unmodified.
pub(crate) fn relaxed_threshold(threshold: f32, step: usize) -> f32 {
    if step <= 1 {
        return threshold;
    }
    let exp = i32::try_from(step).unwrap_or(i32::MAX);
    threshold * COARSE_RELAXATION.powi(exp) as f32
}

/// Overlap threshold used by one step of the near-match merge ramp.
pub(crate) fn merge_threshold(base: f32, scale_divider: usize) -> f32 {
    let exponent = (scale_divider as f64).powf(0.25);
    (base as f64).powf(exponent) as f32
}
