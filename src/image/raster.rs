//! Owned, tightly packed RGB rasters.

use crate::image::{RasterView, CHANNELS};
use crate::util::{RasterFindError, RasterFindResult};

/// Owned contiguous RGB raster (`stride == 3 * width`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl Raster {
    /// Wraps a packed RGB buffer of exactly `3 * width * height` bytes.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> RasterFindResult<Self> {
        let needed = packed_len(width, height)?;
        if data.len() < needed {
            return Err(RasterFindError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(RasterFindError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates a raster filled with a single colour.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> RasterFindResult<Self> {
        Self::from_fn(width, height, |_, _| rgb)
    }

    /// Creates a raster by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> RasterFindResult<Self>
    where
        F: FnMut(usize, usize) -> [u8; 3],
    {
        let needed = packed_len(width, height)?;
        let mut data = Vec::with_capacity(needed);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self::new(data, width, height)
    }

    /// Copies a (possibly strided) view into a packed raster.
    pub fn from_view(view: RasterView<'_>) -> RasterFindResult<Self> {
        let width = view.width();
        let height = view.height();
        let mut data = Vec::with_capacity(packed_len(width, height)?);
        for y in 0..height {
            let row = view.row(y).ok_or(RasterFindError::BufferTooSmall {
                needed: y * view.stride() + width * CHANNELS,
                got: view.as_slice().len(),
            })?;
            data.extend_from_slice(row);
        }
        Self::new(data, width, height)
    }

    /// Returns a borrowed view of the raster.
    pub fn view(&self) -> RasterView<'_> {
        RasterView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width * CHANNELS,
        }
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the packed RGB bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the raster and returns its packed RGB bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Copies `src` into this raster with its top-left corner at `(x, y)`.
    pub fn paste(&mut self, src: RasterView<'_>, x: usize, y: usize) -> RasterFindResult<()> {
        let fits = x
            .checked_add(src.width())
            .zip(y.checked_add(src.height()))
            .is_some_and(|(r, b)| r <= self.width && b <= self.height);
        if !fits {
            return Err(RasterFindError::RoiOutOfBounds {
                x,
                y,
                width: src.width(),
                height: src.height(),
                img_width: self.width,
                img_height: self.height,
            });
        }

        let row_bytes = src.width() * CHANNELS;
        let stride = self.width * CHANNELS;
        for row in 0..src.height() {
            let start = (y + row) * stride + x * CHANNELS;
            self.data[start..start + row_bytes].copy_from_slice(src.pixel_row(row));
        }
        Ok(())
    }
}

fn packed_len(width: usize, height: usize) -> RasterFindResult<usize> {
    if width == 0 || height == 0 {
        return Err(RasterFindError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(CHANNELS))
        .ok_or(RasterFindError::InvalidDimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::Raster;
    use crate::util::RasterFindError;

    #[test]
    fn from_fn_writes_rows_in_order() {
        let raster = Raster::from_fn(2, 2, |x, y| [x as u8, y as u8, 9]).unwrap();
        assert_eq!(raster.data(), &[0, 0, 9, 1, 0, 9, 0, 1, 9, 1, 1, 9]);
    }

    #[test]
    fn paste_rejects_overflowing_placement() {
        let mut dst = Raster::filled(4, 4, [0, 0, 0]).unwrap();
        let src = Raster::filled(2, 2, [1, 2, 3]).unwrap();
        let err = dst.paste(src.view(), 3, 0).unwrap_err();
        assert!(matches!(err, RasterFindError::RoiOutOfBounds { .. }));

        dst.paste(src.view(), 2, 2).unwrap();
        assert_eq!(dst.view().get(3, 3), Some([1, 2, 3]));
        assert_eq!(dst.view().get(1, 1), Some([0, 0, 0]));
    }
}
