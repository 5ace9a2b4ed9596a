//! RGB raster views, owned rasters and resampling collaborators.
//!
//! `RasterView` is a borrowed 2D view into a byte buffer of packed RGB
//! triples. The stride counts bytes between the starts of consecutive rows, so
//! a stride larger than `3 * width` represents padded rows (as produced by
//! most capture APIs). ROI views are zero-copy and retain the original stride.

use crate::util::{RasterFindError, RasterFindResult};

#[cfg(feature = "image-io")]
pub mod io;
mod raster;
mod rect;
pub mod resample;

pub use raster::Raster;
pub use rect::Rect;

/// Number of interleaved channels per pixel.
pub const CHANNELS: usize = 3;

/// Borrowed RGB raster view with an explicit byte stride.
#[derive(Copy, Clone, Debug)]
pub struct RasterView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> RasterView<'a> {
    /// Creates a tightly packed view with `stride == 3 * width`.
    pub fn from_slice(data: &'a [u8], width: usize, height: usize) -> RasterFindResult<Self> {
        let stride = width
            .checked_mul(CHANNELS)
            .ok_or(RasterFindError::InvalidDimensions { width, height })?;
        Self::new(data, width, height, stride)
    }

    /// Creates a view with an explicit stride in bytes.
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        stride: usize,
    ) -> RasterFindResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(RasterFindError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in bytes between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the full extent of the view as a rectangle at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Returns the RGB triple at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y
            .checked_mul(self.stride)?
            .checked_add(x.checked_mul(CHANNELS)?)?;
        let px = self.data.get(idx..idx + CHANNELS)?;
        Some([px[0], px[1], px[2]])
    }

    /// Returns the packed bytes of row `y` (`3 * width` long).
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width * CHANNELS)?;
        self.data.get(start..end)
    }

    /// Row access for callers that already proved `y < height`.
    #[inline]
    pub(crate) fn pixel_row(&self, y: usize) -> &'a [u8] {
        let start = y * self.stride;
        &self.data[start..start + self.width * CHANNELS]
    }

    /// Returns a zero-copy view of `rect`.
    pub fn roi(&self, rect: Rect) -> RasterFindResult<RasterView<'a>> {
        if rect.is_empty() {
            return Err(RasterFindError::InvalidDimensions {
                width: rect.width,
                height: rect.height,
            });
        }
        let out_of_bounds = RasterFindError::RoiOutOfBounds {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            img_width: self.width,
            img_height: self.height,
        };
        let fits = rect
            .x
            .checked_add(rect.width)
            .zip(rect.y.checked_add(rect.height))
            .is_some_and(|(r, b)| r <= self.width && b <= self.height);
        if !fits {
            return Err(out_of_bounds);
        }

        let start = rect.y * self.stride + rect.x * CHANNELS;
        let data = self.data.get(start..).ok_or(out_of_bounds)?;
        RasterView::new(data, rect.width, rect.height, self.stride)
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> RasterFindResult<usize> {
    if width == 0 || height == 0 {
        return Err(RasterFindError::InvalidDimensions { width, height });
    }
    let row_bytes = width
        .checked_mul(CHANNELS)
        .ok_or(RasterFindError::InvalidDimensions { width, height })?;
    if stride < row_bytes {
        return Err(RasterFindError::InvalidStride { width, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(row_bytes))
        .ok_or(RasterFindError::InvalidDimensions { width, height })
}
