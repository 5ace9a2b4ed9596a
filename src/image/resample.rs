//! Resampling collaborators used to produce each pyramid level.
//!
//! The search never interpolates pixels itself: every level asks a
//! [`Resampler`] for the source and target at `size / scale_divider`.
//! [`BicubicResampler`] is the default and uses Catmull-Rom filtering from the
//! `image` crate. [`AreaResampler`] is a deterministic box filter that averages
//! every source pixel falling into a destination cell and rounds to nearest:
//! `dst = (sum + n / 2) / n`.

use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::image::{Raster, RasterView, CHANNELS};
use crate::util::{RasterFindError, RasterFindResult};

/// Produces a resized copy of a raster.
pub trait Resampler: Send + Sync {
    /// Resizes `src` to exactly `width` x `height` pixels.
    fn resize(&self, src: RasterView<'_>, width: usize, height: usize)
        -> RasterFindResult<Raster>;
}

/// High-quality bicubic (Catmull-Rom) resampling.
#[derive(Clone, Copy, Debug, Default)]
pub struct BicubicResampler;

/// Area-averaging resampling with integer rounding.
#[derive(Clone, Copy, Debug, Default)]
pub struct AreaResampler;

impl Resampler for BicubicResampler {
    fn resize(
        &self,
        src: RasterView<'_>,
        width: usize,
        height: usize,
    ) -> RasterFindResult<Raster> {
        check_output(width, height)?;
        let packed = Raster::from_view(src)?;
        let buffer = RgbImage::from_raw(
            to_u32(src.width())?,
            to_u32(src.height())?,
            packed.into_vec(),
        )
        .ok_or_else(|| RasterFindError::Resample {
            reason: "source buffer does not match its dimensions".to_string(),
        })?;
        let resized = imageops::resize(
            &buffer,
            to_u32(width)?,
            to_u32(height)?,
            FilterType::CatmullRom,
        );
        let out = Raster::new(resized.into_raw(), width, height)?;
        Ok(out)
    }
}

impl Resampler for AreaResampler {
    fn resize(
        &self,
        src: RasterView<'_>,
        width: usize,
        height: usize,
    ) -> RasterFindResult<Raster> {
        check_output(width, height)?;
        let src_width = src.width();
        let src_height = src.height();
        let mut data = Vec::with_capacity(width * height * CHANNELS);

        for dy in 0..height {
            let (y0, y1) = span(dy, height, src_height);
            for dx in 0..width {
                let (x0, x1) = span(dx, width, src_width);
                let mut acc = [0u64; CHANNELS];
                for y in y0..y1 {
                    let row = src.pixel_row(y);
                    for px in row[x0 * CHANNELS..x1 * CHANNELS].chunks_exact(CHANNELS) {
                        acc[0] += u64::from(px[0]);
                        acc[1] += u64::from(px[1]);
                        acc[2] += u64::from(px[2]);
                    }
                }
                let n = ((y1 - y0) * (x1 - x0)) as u64;
                for sum in acc {
                    data.push(((sum + n / 2) / n) as u8);
                }
            }
        }

        Raster::new(data, width, height)
    }
}

/// Source index range `[start, end)` covered by destination cell `i`.
fn span(i: usize, dst_len: usize, src_len: usize) -> (usize, usize) {
    let start = i * src_len / dst_len;
    let end = ((i + 1) * src_len / dst_len).max(start + 1);
    (start, end.min(src_len))
}

fn check_output(width: usize, height: usize) -> RasterFindResult<()> {
    if width == 0 || height == 0 {
        return Err(RasterFindError::InvalidDimensions { width, height });
    }
    Ok(())
}

fn to_u32(value: usize) -> RasterFindResult<u32> {
    u32::try_from(value).map_err(|_| RasterFindError::Resample {
        reason: format!("dimension {value} does not fit in u32"),
    })
}
