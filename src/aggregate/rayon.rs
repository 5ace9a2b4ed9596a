//! Rayon-parallel aggregate build (feature-gated).
//!
//! Rows of the HSum layer and columns of the VSum/Diff layers are handed to
//! workers as disjoint `&mut` chunks; each worker runs the same sequential
//! per-line kernel as the scalar driver.

use crate::aggregate::scalar::{diff_column, hsum_row, vsum_column};
use crate::aggregate::{AggregateGrid, WindowSize};
use crate::image::{RasterView, Rect};
use rayon::prelude::*;

/// Builds all three layers over one region using the rayon thread pool.
pub(crate) fn build_region_par(
    raster: RasterView<'_>,
    grid: &mut AggregateGrid,
    window: WindowSize,
    region: &Rect,
) {
    let (left, right) = (region.x, region.right());
    let (top, bottom) = (region.y, region.bottom());
    let grid_width = grid.width;
    let grid_height = grid.height;

    grid.hsum[top * grid_width..bottom * grid_width]
        .par_chunks_mut(grid_width)
        .enumerate()
        .for_each(|(offset, row)| {
            hsum_row(raster.pixel_row(top + offset), row, left, right, window.width);
        });

    grid.vsum[left * grid_height..right * grid_height]
        .par_chunks_mut(grid_height)
        .enumerate()
        .for_each(|(offset, column)| {
            vsum_column(raster, left + offset, top, bottom, window.height, column);
        });

    grid.diff[left * grid_height..(right - 1) * grid_height]
        .par_chunks_mut(grid_height)
        .enumerate()
        .for_each(|(offset, column)| {
            diff_column(raster, left + offset, top, bottom, column);
        });
}
