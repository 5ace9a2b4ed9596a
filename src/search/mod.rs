//! Multi-resolution search for a target raster inside a source raster.
//!
//! [`Finder`] owns the source, the working grids and the result of the last
//! search. A call to [`Finder::find`] validates the target, then walks the
//! pyramid from the coarsest searchable scale down to full resolution:
//!
//! 1. resample source and target to `size / scale_divider`;
//! 2. rebuild the aggregate layers over the candidate regions;
//! 3. score every window position inside those regions;
//! 4. filter weak hits, then merge (coarse levels) or normalize (finest).
//!
//! Matches of one level become the candidate regions of the next; a level
//! without matches ends the search with an empty result.

pub mod compare;
pub(crate) mod context;
pub(crate) mod pyramid;
pub(crate) mod scan;

pub use context::SearchContext;
pub use pyramid::{candidate_regions, MIN_LEVEL_AREA};

use crate::image::resample::{BicubicResampler, Resampler};
use crate::image::{Raster, RasterView, Rect};
use crate::trace::trace_span;
use crate::util::{RasterFindError, RasterFindResult};

use self::pyramid::{run_search, SearchInputs};

/// A located occurrence of the target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match {
    /// Zone in source pixel coordinates.
    pub zone: Rect,
    /// Similarity in `[0, 1]`; `1.0` is a perfect statistical match.
    pub similarity: f32,
}

/// Configuration for a [`Finder`].
#[derive(Clone, Debug)]
pub struct FinderConfig {
    /// Maximum accepted source width.
    pub max_source_width: usize,
    /// Maximum accepted source height.
    pub max_source_height: usize,
    /// Maximum accepted target width.
    pub max_target_width: usize,
    /// Maximum accepted target height.
    pub max_target_height: usize,
    /// Enables rayon-based parallelism when the feature is available.
    pub parallel: bool,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            max_source_width: 2560,
            max_source_height: 2560,
            max_target_width: 256,
            max_target_height: 256,
            parallel: true,
        }
    }
}

/// Statistics of one searched pyramid level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelReport {
    /// Power-of-two downscale factor of the level.
    pub scale_divider: usize,
    /// Source size at this level.
    pub source_size: (usize, usize),
    /// Target (window) size at this level.
    pub window_size: (usize, usize),
    /// Number of candidate regions scanned.
    pub regions: usize,
    /// Comparator hits before post-processing.
    pub raw_hits: usize,
    /// Matches left after filtering and merging.
    pub kept: usize,
}

/// Per-level statistics of the last search, coarsest level first.
///
/// Levels that were never reached because a coarser level came up empty are
/// absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchReport {
    levels: Vec<LevelReport>,
}

impl SearchReport {
    /// Searched levels in execution order (coarsest first).
    pub fn levels(&self) -> &[LevelReport] {
        &self.levels
    }

    /// Whether the search stopped before reaching full resolution.
    pub fn pruned(&self) -> bool {
        self.levels
            .last()
            .map_or(true, |level| level.scale_divider != 1 || level.kept == 0)
    }
}

/// Template finder over RGB rasters.
///
/// The resampler produces the downscaled rasters of every coarse level; it
/// defaults to [`BicubicResampler`].
#[derive(Debug)]
pub struct Finder<R = BicubicResampler> {
    config: FinderConfig,
    resampler: R,
    source: Option<Raster>,
    ctx: SearchContext,
    last_matches: Vec<Match>,
    last_report: SearchReport,
}

impl Default for Finder<BicubicResampler> {
    fn default() -> Self {
        Self::new()
    }
}

impl Finder<BicubicResampler> {
    /// Creates a finder with the default configuration and bicubic resampling.
    pub fn new() -> Self {
        Self::with_resampler(BicubicResampler)
    }
}

impl<R: Resampler> Finder<R> {
    /// Creates a finder that resamples levels with `resampler`.
    pub fn with_resampler(resampler: R) -> Self {
        Self {
            config: FinderConfig::default(),
            resampler,
            source: None,
            ctx: SearchContext::new(),
            last_matches: Vec::new(),
            last_report: SearchReport::default(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: FinderConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Returns the current source, if one was set.
    pub fn source(&self) -> Option<&Raster> {
        self.source.as_ref()
    }

    /// Sets the raster searched by subsequent [`Self::find`] calls.
    ///
    /// The previous result is discarded.
    pub fn set_source(&mut self, source: Raster) -> RasterFindResult<()> {
        validate_source(&self.config, &source)?;
        self.source = Some(source);
        self.clear_result();
        Ok(())
    }

    /// Finds occurrences of `target` in the source.
    ///
    /// Returns the matches whose similarity reaches `threshold` at full
    /// resolution, strongest first. The result is also kept for
    /// [`Self::last_matches`]; it is cleared first, so a failed call leaves
    /// nothing behind.
    pub fn find(
        &mut self,
        target: RasterView<'_>,
        threshold: f32,
    ) -> RasterFindResult<Vec<Match>> {
        self.clear_result();

        let source = self.source.as_ref().ok_or(RasterFindError::SourceNotSet)?;
        // The configuration may have changed since the source was set.
        validate_source(&self.config, source)?;
        validate_target(&self.config, source, target)?;
        if !threshold.is_finite() {
            return Err(RasterFindError::InvalidInput("threshold must be finite"));
        }

        let _span = trace_span!(
            "find",
            source_width = source.width(),
            source_height = source.height(),
            target_width = target.width(),
            target_height = target.height(),
            threshold = threshold
        )
        .entered();

        let inputs = SearchInputs {
            source: source.view(),
            target,
            threshold,
            parallel: self.config.parallel,
            resampler: &self.resampler,
        };
        let mut report = SearchReport::default();
        let matches = run_search(&mut self.ctx, &inputs, &mut report)?;

        self.last_matches = matches.clone();
        self.last_report = report;
        Ok(matches)
    }

    /// Matches of the last successful search.
    pub fn last_matches(&self) -> &[Match] {
        &self.last_matches
    }

    /// Level statistics of the last successful search.
    pub fn last_report(&self) -> &SearchReport {
        &self.last_report
    }

    fn clear_result(&mut self) {
        self.last_matches.clear();
        self.last_report = SearchReport::default();
    }
}

fn validate_source(config: &FinderConfig, source: &Raster) -> RasterFindResult<()> {
    if source.width() > config.max_source_width || source.height() > config.max_source_height {
        return Err(RasterFindError::SourceTooLarge {
            width: source.width(),
            height: source.height(),
            max_width: config.max_source_width,
            max_height: config.max_source_height,
        });
    }
    Ok(())
}

fn validate_target(
    config: &FinderConfig,
    source: &Raster,
    target: RasterView<'_>,
) -> RasterFindResult<()> {
    if target.width() > source.width() || target.height() > source.height() {
        return Err(RasterFindError::TargetLargerThanSource {
            target_width: target.width(),
            target_height: target.height(),
            source_width: source.width(),
            source_height: source.height(),
        });
    }
    if target.width() > config.max_target_width || target.height() > config.max_target_height {
        return Err(RasterFindError::TargetTooLarge {
            width: target.width(),
            height: target.height(),
            max_width: config.max_target_width,
            max_height: config.max_target_height,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Finder, FinderConfig, SearchReport};
    use crate::image::Raster;
    use crate::util::RasterFindError;

    #[test]
    fn default_config_matches_working_limits() {
        let cfg = FinderConfig::default();
        assert_eq!((cfg.max_source_width, cfg.max_source_height), (2560, 2560));
        assert_eq!((cfg.max_target_width, cfg.max_target_height), (256, 256));
        assert!(cfg.parallel);
    }

    #[test]
    fn empty_report_counts_as_pruned() {
        assert!(SearchReport::default().pruned());
    }

    #[test]
    fn oversized_source_is_rejected() {
        let mut finder = Finder::new().with_config(FinderConfig {
            max_source_width: 16,
            ..FinderConfig::default()
        });
        let source = Raster::filled(17, 8, [0, 0, 0]).unwrap();
        let err = finder.set_source(source).unwrap_err();
        assert!(matches!(err, RasterFindError::SourceTooLarge { .. }));
        assert!(finder.source().is_none());
    }

    #[test]
    fn find_rechecks_source_against_replaced_config() {
        let mut finder = Finder::new();
        finder
            .set_source(Raster::filled(200, 160, [0, 0, 0]).unwrap())
            .unwrap();
        let mut finder = finder.with_config(FinderConfig {
            max_source_width: 100,
            ..FinderConfig::default()
        });
        let target = Raster::filled(20, 20, [9, 9, 9]).unwrap();
        assert_eq!(
            finder.find(target.view(), 0.95).unwrap_err(),
            RasterFindError::SourceTooLarge {
                width: 200,
                height: 160,
                max_width: 100,
                max_height: 2560,
            }
        );
        assert!(finder.last_matches().is_empty());
    }
}
