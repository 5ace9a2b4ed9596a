//! Per-pixel aggregate layers used by the comparator.
//!
//! For one raster and one window (target) size, three RGB layers are built:
//!
//! - `HSum`: sum over the `window.width` pixels starting at the cell, moving
//!   right. Stored row-major.
//! - `VSum`: sum over the `window.height` pixels starting at the cell, moving
//!   down. Stored column-major.
//! - `Diff`: `|p - right| + |p - below| + 1` per channel. Stored
//!   column-major.
//!
//! Sums are produced by sliding-window recurrences
//! (`next = prev - leaving + entering`), so each row or column costs one full
//! window plus O(1) per shift. The storage order gives every row (HSum) or
//! column (VSum, Diff) its own contiguous slice, which lets the parallel
//! driver hand disjoint `&mut` chunks to workers without locking.
//!
//! Only the cells covered by the requested regions are written. Which cells
//! are valid depends on the region:
//!
//! - HSum: rows `[top, bottom)`, anchors `x ∈ [left, right - window.width]`.
//! - VSum: columns `[left, right)`, anchors `y ∈ [top, bottom - window.height]`.
//! - Diff: `x ∈ [left, right - 1)`, `y ∈ [top, bottom - 1)`.

use crate::image::{RasterView, Rect};
use crate::util::{RasterFindError, RasterFindResult};

#[cfg(feature = "rayon")]
pub(crate) mod rayon;
pub(crate) mod scalar;

/// Accumulated `(r, g, b)` weights of one aggregate cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RgbWeight {
    pub r: u32,
    pub g: u32,
    pub b: u32,
}

impl RgbWeight {
    /// Creates a weight triple.
    pub const fn new(r: u32, g: u32, b: u32) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub(crate) fn add_pixel(&mut self, px: &[u8]) {
        self.r += u32::from(px[0]);
        self.g += u32::from(px[1]);
        self.b += u32::from(px[2]);
    }

    /// Shifts a window sum by one pixel.
    #[inline]
    pub(crate) fn slide(self, leaving: &[u8], entering: &[u8]) -> Self {
        Self {
            r: self.r - u32::from(leaving[0]) + u32::from(entering[0]),
            g: self.g - u32::from(leaving[1]) + u32::from(entering[1]),
            b: self.b - u32::from(leaving[2]) + u32::from(entering[2]),
        }
    }

    /// Two-neighbour gradient magnitude, offset by one.
    #[inline]
    pub(crate) fn gradient(px: &[u8], right: &[u8], below: &[u8]) -> Self {
        let channel = |c: usize| {
            u32::from(px[c].abs_diff(right[c])) + u32::from(px[c].abs_diff(below[c])) + 1
        };
        Self {
            r: channel(0),
            g: channel(1),
            b: channel(2),
        }
    }
}

/// Width and height of the sliding window (the target size at a level).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowSize {
    pub width: usize,
    pub height: usize,
}

impl WindowSize {
    /// Creates a window size.
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Number of pixels covered by the window.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Last valid window anchor inside `region`, if the window fits.
    pub fn last_anchor(&self, region: &Rect) -> Option<(usize, usize)> {
        if self.width == 0
            || self.height == 0
            || region.width < self.width
            || region.height < self.height
        {
            return None;
        }
        Some((region.right() - self.width, region.bottom() - self.height))
    }
}

/// Aggregate layers for one raster, reused across pyramid levels.
#[derive(Clone, Debug, Default)]
pub struct AggregateGrid {
    width: usize,
    height: usize,
    hsum: Vec<RgbWeight>,
    vsum: Vec<RgbWeight>,
    diff: Vec<RgbWeight>,
}

impl AggregateGrid {
    /// Allocates a zeroed grid of `width` x `height` cells.
    pub fn new(width: usize, height: usize) -> RasterFindResult<Self> {
        let mut grid = Self::default();
        grid.ensure_size(width, height)?;
        Ok(grid)
    }

    /// Resizes the grid if its dimensions differ.
    ///
    /// Returns `true` when the layers were reallocated. Existing cells are
    /// otherwise kept as-is; callers only read cells they rebuilt.
    pub fn ensure_size(&mut self, width: usize, height: usize) -> RasterFindResult<bool> {
        if width == self.width && height == self.height && !self.hsum.is_empty() {
            return Ok(false);
        }
        let cells = width
            .checked_mul(height)
            .filter(|&cells| cells > 0)
            .ok_or(RasterFindError::InvalidDimensions { width, height })?;
        self.width = width;
        self.height = height;
        self.hsum = vec![RgbWeight::default(); cells];
        self.vsum = vec![RgbWeight::default(); cells];
        self.diff = vec![RgbWeight::default(); cells];
        Ok(true)
    }

    /// Returns the grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Horizontal window sum anchored at `(x, y)`.
    pub fn hsum(&self, x: usize, y: usize) -> Option<RgbWeight> {
        self.in_bounds(x, y).then(|| self.hsum[y * self.width + x])
    }

    /// Vertical window sum anchored at `(x, y)`.
    pub fn vsum(&self, x: usize, y: usize) -> Option<RgbWeight> {
        self.in_bounds(x, y).then(|| self.vsum[x * self.height + y])
    }

    /// Gradient cell at `(x, y)`.
    pub fn diff(&self, x: usize, y: usize) -> Option<RgbWeight> {
        self.in_bounds(x, y).then(|| self.diff[x * self.height + y])
    }

    #[inline]
    pub(crate) fn hsum_cell(&self, x: usize, y: usize) -> RgbWeight {
        self.hsum[y * self.width + x]
    }

    #[inline]
    pub(crate) fn vsum_cell(&self, x: usize, y: usize) -> RgbWeight {
        self.vsum[x * self.height + y]
    }

    #[inline]
    pub(crate) fn diff_column(&self, x: usize) -> &[RgbWeight] {
        &self.diff[x * self.height..(x + 1) * self.height]
    }

    fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }
}

/// Rebuilds the aggregate layers of `grid` over `regions`.
///
/// Each region must lie inside both the raster and the grid and be at least as
/// large as `window`; cells outside the regions are left untouched. Regions
/// may overlap: every cell value depends only on the raster and the window, so
/// overlapping writes agree.
///
/// With `parallel` (and the `rayon` feature) rows and columns are distributed
/// across worker threads; the slide along each row/column stays sequential.
pub fn build_aggregates(
    raster: RasterView<'_>,
    grid: &mut AggregateGrid,
    window: WindowSize,
    regions: &[Rect],
    parallel: bool,
) -> RasterFindResult<()> {
    if raster.width() > grid.width() || raster.height() > grid.height() {
        return Err(RasterFindError::RoiOutOfBounds {
            x: 0,
            y: 0,
            width: raster.width(),
            height: raster.height(),
            img_width: grid.width(),
            img_height: grid.height(),
        });
    }
    let bounds = raster.bounds();
    for region in regions {
        if !bounds.contains(region) || window.last_anchor(region).is_none() {
            return Err(RasterFindError::RoiOutOfBounds {
                x: region.x,
                y: region.y,
                width: region.width,
                height: region.height,
                img_width: raster.width(),
                img_height: raster.height(),
            });
        }
    }

    #[cfg(feature = "rayon")]
    {
        if parallel {
            for region in regions {
                self::rayon::build_region_par(raster, grid, window, region);
            }
            return Ok(());
        }
    }
    #[cfg(not(feature = "rayon"))]
    let _ = parallel;

    for region in regions {
        scalar::build_region(raster, grid, window, region);
    }
    Ok(())
}
