//! Coarse-to-fine recursion over power-of-two scale dividers.
//!
//! The recursion descends until the target would shrink below
//! [`MIN_LEVEL_AREA`] pixels; that level is the base case and seeds the next
//! finer one with the whole source. Every searched level narrows the regions
//! of the level above it, and a level without matches prunes the rest of the
//! search.

use crate::aggregate::{build_aggregates, WindowSize};
use crate::candidate::filter::filter_worst_matches;
use crate::candidate::merge::{merge_near_matches, normalize_matches};
use crate::image::resample::Resampler;
use crate::image::{Raster, RasterView, Rect};
use crate::search::context::SearchContext;
use crate::search::scan::scan_regions;
use crate::search::{LevelReport, Match, SearchReport};
use crate::trace::{trace_debug, trace_event, trace_span};
use crate::util::{RasterFindError, RasterFindResult};

/// Smallest target area (in pixels) a level is searched at.
pub const MIN_LEVEL_AREA: usize = 100;

/// Outcome of one level of the recursion.
#[derive(Debug)]
enum LevelState {
    /// No candidate survived; finer levels are skipped.
    Pruned,
    /// Coarsest feasible level: no candidates yet, search everything.
    Initial,
    /// Candidates found at this level, in its coordinates.
    Sequent(Vec<Match>),
}

/// Borrowed inputs shared by every level of one search.
pub(crate) struct SearchInputs<'a, R: ?Sized> {
    pub source: RasterView<'a>,
    pub target: RasterView<'a>,
    pub threshold: f32,
    pub parallel: bool,
    pub resampler: &'a R,
}

/// Runs the full pyramid search and returns the matches at full resolution.
pub(crate) fn run_search<R: Resampler + ?Sized>(
    ctx: &mut SearchContext,
    inputs: &SearchInputs<'_, R>,
    report: &mut SearchReport,
) -> RasterFindResult<Vec<Match>> {
    ctx.prepare(
        (inputs.source.width(), inputs.source.height()),
        (inputs.target.width(), inputs.target.height()),
    )?;
    match search_level(ctx, inputs, 1, report)? {
        LevelState::Sequent(matches) => Ok(matches),
        LevelState::Pruned | LevelState::Initial => Ok(Vec::new()),
    }
}

fn search_level<R: Resampler + ?Sized>(
    ctx: &mut SearchContext,
    inputs: &SearchInputs<'_, R>,
    scale_divider: usize,
    report: &mut SearchReport,
) -> RasterFindResult<LevelState> {
    let window = WindowSize::new(
        inputs.target.width() / scale_divider,
        inputs.target.height() / scale_divider,
    );
    if window.area() < MIN_LEVEL_AREA {
        return Ok(LevelState::Initial);
    }

    let prior = match search_level(ctx, inputs, scale_divider * 2, report)? {
        LevelState::Pruned => return Ok(LevelState::Pruned),
        state => state,
    };

    let source_size = (
        inputs.source.width() / scale_divider,
        inputs.source.height() / scale_divider,
    );
    let (scaled_source, scaled_target) = if scale_divider == 1 {
        (None, None)
    } else {
        (
            Some(resample(inputs.resampler, inputs.source, source_size)?),
            Some(resample(
                inputs.resampler,
                inputs.target,
                (window.width, window.height),
            )?),
        )
    };
    let source = scaled_source.as_ref().map_or(inputs.source, Raster::view);
    let target = scaled_target.as_ref().map_or(inputs.target, Raster::view);

    let bounds = source.bounds();
    let regions = match &prior {
        LevelState::Sequent(previous) => candidate_regions(previous, bounds, window),
        _ => vec![bounds],
    };

    let _span = trace_span!(
        "search_level",
        scale_divider = scale_divider,
        regions = regions.len()
    )
    .entered();

    let (source_grid, target_grid) = ctx.grids_mut();
    build_aggregates(source, source_grid, window, &regions, inputs.parallel)?;
    build_aggregates(
        target,
        target_grid,
        window,
        &[target.bounds()],
        inputs.parallel,
    )?;

    let mut matches = scan_regions(
        ctx.source_grid(),
        ctx.target_grid(),
        &regions,
        window,
        scale_divider,
        inputs.threshold,
        inputs.parallel,
    );
    let raw_hits = matches.len();

    if !matches.is_empty() {
        filter_worst_matches(&mut matches, scale_divider);
    }
    if scale_divider > 1 {
        merge_near_matches(&mut matches, scale_divider);
    } else {
        normalize_matches(&mut matches);
    }

    trace_event!(
        "level_candidates",
        scale_divider = scale_divider,
        raw = raw_hits,
        kept = matches.len()
    );
    report.levels.push(LevelReport {
        scale_divider,
        source_size,
        window_size: (window.width, window.height),
        regions: regions.len(),
        raw_hits,
        kept: matches.len(),
    });

    if matches.is_empty() {
        trace_event!("level_pruned", scale_divider = scale_divider);
        Ok(LevelState::Pruned)
    } else {
        Ok(LevelState::Sequent(matches))
    }
}

/// Maps the previous level's matches to search regions at this level.
///
/// Each zone is grown by one pixel on every side, doubled into this level's
/// coordinates and clipped to `bounds`. Regions the window does not fit into
/// are dropped.
pub fn candidate_regions(previous: &[Match], bounds: Rect, window: WindowSize) -> Vec<Rect> {
    let mut regions = Vec::with_capacity(previous.len());
    for found in previous {
        let Some(region) = found.zone.expand(1).scale(2).intersect(&bounds) else {
            continue;
        };
        if window.last_anchor(&region).is_none() {
            trace_debug!("region_dropped", x = region.x, y = region.y);
            continue;
        }
        regions.push(region);
    }
    regions
}

fn resample<R: Resampler + ?Sized>(
    resampler: &R,
    view: RasterView<'_>,
    size: (usize, usize),
) -> RasterFindResult<Raster> {
    let (width, height) = size;
    let out = resampler.resize(view, width, height)?;
    if out.width() != width || out.height() != height {
        return Err(RasterFindError::Resample {
            reason: format!(
                "expected {width}x{height} output, got {}x{}",
                out.width(),
                out.height()
            ),
        });
    }
    Ok(out)
}
