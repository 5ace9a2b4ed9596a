//! Candidate comparator: scores one window placement against the target.
//!
//! Three terms are averaged into a similarity in `[0, 1]`:
//!
//! - column sums: for each target column, the `VSum` of the source column
//!   against the target's `VSum` at row 0;
//! - row sums: for each target row, the `HSum` of the source row against the
//!   target's `HSum` at column 0;
//! - gradients: `Diff` cells sampled every `step` cells in both axes.
//!
//! Every comparison is the per-channel ratio `min / max` (see
//! `util::math::ratio` for the zero-sum rule). The gradient term gets more
//! weight as `step` shrinks, because only the finest level samples every
//! gradient cell.

use crate::aggregate::{AggregateGrid, RgbWeight, WindowSize};
use crate::image::Rect;
use crate::search::Match;
use crate::util::math::{ratio, relaxed_threshold};

#[inline]
fn channel_ratios(a: RgbWeight, b: RgbWeight) -> f32 {
    ratio(a.r, b.r) + ratio(a.g, b.g) + ratio(a.b, b.b)
}

/// Computes the similarity of the source window anchored at `(x, y)`.
///
/// `step` is the scale divider of the level (1 at full resolution). The target
/// grid must hold the target's layers for `window` with its anchors at row 0
/// and column 0.
///
/// # Panics
///
/// Panics if the window anchored at `(x, y)` does not fit inside either grid.
pub fn similarity_at(
    source: &AggregateGrid,
    target: &AggregateGrid,
    x: usize,
    y: usize,
    window: WindowSize,
    step: usize,
) -> f32 {
    let step = step.max(1);

    let mut column_total = 0.0f32;
    for col in 0..window.width {
        column_total += channel_ratios(source.vsum_cell(x + col, y), target.vsum_cell(col, 0));
    }
    let avg_columns = column_total / (3 * window.width) as f32;

    let mut row_total = 0.0f32;
    for row in 0..window.height {
        row_total += channel_ratios(source.hsum_cell(x, y + row), target.hsum_cell(0, row));
    }
    let avg_rows = row_total / (3 * window.height) as f32;

    let mut diff_total = 0.0f32;
    let mut sampled = 0usize;
    for col in (0..window.width.saturating_sub(1)).step_by(step) {
        let src_column = source.diff_column(x + col);
        let tgt_column = target.diff_column(col);
        for row in (0..window.height.saturating_sub(1)).step_by(step) {
            diff_total += channel_ratios(src_column[y + row], tgt_column[row]);
            sampled += 1;
        }
    }

    if sampled == 0 {
        return (avg_columns + avg_rows) / 2.0;
    }
    let avg_diff = diff_total / (3 * sampled) as f32;
    let step_f = step as f32;
    ((avg_columns + avg_rows) * step_f + avg_diff) / (2.0 * step_f + 1.0)
}

/// Compares one placement and returns a match if it clears the threshold.
///
/// The threshold is relaxed by `0.9275^step` on coarse levels (`step > 1`),
/// where downsampling blurs the detail that separates true matches.
pub fn compare(
    source: &AggregateGrid,
    target: &AggregateGrid,
    position: (usize, usize),
    window: WindowSize,
    step: usize,
    threshold: f32,
) -> Option<Match> {
    let (x, y) = position;
    let similarity = similarity_at(source, target, x, y, window, step);
    if similarity < relaxed_threshold(threshold, step) {
        return None;
    }
    Some(Match {
        zone: Rect::new(x, y, window.width, window.height),
        similarity,
    })
}
