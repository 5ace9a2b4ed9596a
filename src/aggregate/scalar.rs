//! Per-line aggregate kernels and the sequential build driver.

use crate::aggregate::{AggregateGrid, RgbWeight, WindowSize};
use crate::image::{RasterView, Rect, CHANNELS};

#[inline]
fn pixel(row: &[u8], x: usize) -> &[u8] {
    &row[x * CHANNELS..(x + 1) * CHANNELS]
}

/// Fills the HSum anchors `[left, right - win]` of one grid row.
///
/// `pixels` is the full raster row and `out` the full grid row.
pub(crate) fn hsum_row(
    pixels: &[u8],
    out: &mut [RgbWeight],
    left: usize,
    right: usize,
    win: usize,
) {
    let mut acc = RgbWeight::default();
    for x in left..left + win {
        acc.add_pixel(pixel(pixels, x));
    }
    out[left] = acc;
    for x in left + 1..=right - win {
        acc = acc.slide(pixel(pixels, x - 1), pixel(pixels, x - 1 + win));
        out[x] = acc;
    }
}

/// Fills the VSum anchors `[top, bottom - win]` of grid column `x`.
///
/// `out` is the full grid column.
pub(crate) fn vsum_column(
    raster: RasterView<'_>,
    x: usize,
    top: usize,
    bottom: usize,
    win: usize,
    out: &mut [RgbWeight],
) {
    let at = |y: usize| pixel(raster.pixel_row(y), x);
    let mut acc = RgbWeight::default();
    for y in top..top + win {
        acc.add_pixel(at(y));
    }
    out[top] = acc;
    for y in top + 1..=bottom - win {
        acc = acc.slide(at(y - 1), at(y - 1 + win));
        out[y] = acc;
    }
}

/// Fills the Diff cells `[top, bottom - 1)` of grid column `x`.
pub(crate) fn diff_column(
    raster: RasterView<'_>,
    x: usize,
    top: usize,
    bottom: usize,
    out: &mut [RgbWeight],
) {
    for y in top..bottom.saturating_sub(1) {
        let row = raster.pixel_row(y);
        let below = raster.pixel_row(y + 1);
        out[y] = RgbWeight::gradient(pixel(row, x), pixel(row, x + 1), pixel(below, x));
    }
}

/// Builds all three layers over one region on the calling thread.
pub(crate) fn build_region(
    raster: RasterView<'_>,
    grid: &mut AggregateGrid,
    window: WindowSize,
    region: &Rect,
) {
    let (left, right) = (region.x, region.right());
    let (top, bottom) = (region.y, region.bottom());
    let grid_width = grid.width;
    let grid_height = grid.height;

    let rows = &mut grid.hsum[top * grid_width..bottom * grid_width];
    for (offset, row) in rows.chunks_mut(grid_width).enumerate() {
        let y = top + offset;
        hsum_row(raster.pixel_row(y), row, left, right, window.width);
    }

    let columns = &mut grid.vsum[left * grid_height..right * grid_height];
    for (offset, column) in columns.chunks_mut(grid_height).enumerate() {
        vsum_column(raster, left + offset, top, bottom, window.height, column);
    }

    let diff_right = right - 1;
    let columns = &mut grid.diff[left * grid_height..diff_right * grid_height];
    for (offset, column) in columns.chunks_mut(grid_height).enumerate() {
        diff_column(raster, left + offset, top, bottom, column);
    }
}
