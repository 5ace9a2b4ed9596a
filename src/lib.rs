//! RasterFind locates an RGB template inside a larger RGB raster.
//!
//! The search runs coarse-to-fine over a power-of-two pyramid. Each level
//! compares sliding-window row and column sums plus a sampled gradient map,
//! and only the neighbourhoods of the previous level's matches are searched at
//! the next finer scale. Parallelism is available through the `rayon` feature
//! (enabled by default).
//!
//! ```no_run
//! use rasterfind::{Finder, Raster};
//!
//! # fn main() -> rasterfind::RasterFindResult<()> {
//! let source = Raster::filled(640, 480, [0, 0, 0])?;
//! let target = Raster::filled(32, 32, [255, 0, 0])?;
//! let mut finder = Finder::new();
//! finder.set_source(source)?;
//! for found in finder.find(target.view(), 0.95)? {
//!     println!("{:?} {:.3}", found.zone, found.similarity);
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
mod candidate;
pub mod image;
pub mod lowlevel;
pub mod search;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use self::image::io;
pub use self::image::resample::{AreaResampler, BicubicResampler, Resampler};
pub use self::image::{Raster, RasterView, Rect};
pub use search::{Finder, FinderConfig, LevelReport, Match, SearchReport};
pub use util::{RasterFindError, RasterFindResult};
