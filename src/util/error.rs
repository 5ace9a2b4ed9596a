//! Error types for rasterfind.

use thiserror::Error;

/// Result alias for rasterfind operations.
pub type RasterFindResult<T> = std::result::Result<T, RasterFindError>;

/// Errors that can occur when building rasters or running a search.
///
/// Precondition violations are reported before any computation starts, so a
/// failed call never leaves partial results behind.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RasterFindError {
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Width or height is zero or overflows the addressable size.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is shorter than one row of pixels.
    #[error("invalid stride {stride} for width {width} (needs at least 3 bytes per pixel)")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer is shorter than the described raster.
    #[error("buffer too small: needed {needed} bytes, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A rectangle does not fit inside the raster it refers to.
    #[error(
        "region {width}x{height} at ({x}, {y}) is out of bounds for {img_width}x{img_height}"
    )]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// `find` was called before `set_source`.
    #[error("source raster not specified")]
    SourceNotSet,
    /// The source exceeds the configured maximum working size.
    #[error("source {width}x{height} exceeds the maximum working size {max_width}x{max_height}")]
    SourceTooLarge {
        width: usize,
        height: usize,
        max_width: usize,
        max_height: usize,
    },
    /// The target exceeds the configured maximum working size.
    #[error("target {width}x{height} exceeds the maximum working size {max_width}x{max_height}")]
    TargetTooLarge {
        width: usize,
        height: usize,
        max_width: usize,
        max_height: usize,
    },
    /// The target is wider or taller than the source.
    #[error("target {target_width}x{target_height} is larger than source {source_width}x{source_height}")]
    TargetLargerThanSource {
        target_width: usize,
        target_height: usize,
        source_width: usize,
        source_height: usize,
    },
    /// A resampler failed or returned a raster of the wrong size.
    #[error("resampling failed: {reason}")]
    Resample { reason: String },
    /// Image decoding failed (feature `image-io`).
    #[error("image io failed: {reason}")]
    ImageIo { reason: String },
}
