//! Convenience helpers for loading rasters via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::{Raster, RasterView};
use crate::util::{RasterFindError, RasterFindResult};
use std::path::Path;

/// Creates a borrowed view from an RGB image buffer.
pub fn view_from_rgb_image(img: &image::RgbImage) -> RasterFindResult<RasterView<'_>> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    RasterView::from_slice(img.as_raw(), width, height)
}

/// Creates an owned raster from an RGB image buffer.
pub fn raster_from_rgb_image(img: &image::RgbImage) -> RasterFindResult<Raster> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    Raster::new(img.as_raw().clone(), width, height)
}

/// Creates an owned raster from a dynamic image, dropping any alpha channel.
pub fn raster_from_dynamic_image(img: &image::DynamicImage) -> RasterFindResult<Raster> {
    let rgb = img.to_rgb8();
    raster_from_rgb_image(&rgb)
}

/// Loads an image from disk and converts it to an RGB raster.
pub fn load_rgb_raster<P: AsRef<Path>>(path: P) -> RasterFindResult<Raster> {
    let img = image::open(path).map_err(|err| RasterFindError::ImageIo {
        reason: err.to_string(),
    })?;
    raster_from_dynamic_image(&img)
}
