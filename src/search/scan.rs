//! Dense comparator scan over candidate regions.

use crate::aggregate::{AggregateGrid, WindowSize};
use crate::image::Rect;
use crate::search::compare::compare;
use crate::search::Match;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Evaluates every window anchor of every region and collects the hits.
///
/// Anchors run over `x ∈ [left, right - window.width]` and
/// `y ∈ [top, bottom - window.height]`; regions the window does not fit into
/// contribute nothing.
pub(crate) fn scan_regions(
    source: &AggregateGrid,
    target: &AggregateGrid,
    regions: &[Rect],
    window: WindowSize,
    step: usize,
    threshold: f32,
    parallel: bool,
) -> Vec<Match> {
    #[cfg(feature = "rayon")]
    {
        if parallel {
            return scan_regions_par(source, target, regions, window, step, threshold);
        }
    }
    #[cfg(not(feature = "rayon"))]
    let _ = parallel;

    let mut out = Vec::new();
    for region in regions {
        let Some((x1, y1)) = window.last_anchor(region) else {
            continue;
        };
        for y in region.y..=y1 {
            for x in region.x..=x1 {
                if let Some(found) = compare(source, target, (x, y), window, step, threshold) {
                    out.push(found);
                }
            }
        }
    }
    out
}

/// Region- and row-parallel scan.
///
/// Each worker scores all anchors of one row of one region; hits are gathered
/// by rayon's ordered collect.
#[cfg(feature = "rayon")]
fn scan_regions_par(
    source: &AggregateGrid,
    target: &AggregateGrid,
    regions: &[Rect],
    window: WindowSize,
    step: usize,
    threshold: f32,
) -> Vec<Match> {
    regions
        .par_iter()
        .filter_map(|region| window.last_anchor(region).map(|last| (*region, last)))
        .flat_map(|(region, (x1, y1))| {
            (region.y..=y1).into_par_iter().flat_map_iter(move |y| {
                (region.x..=x1).filter_map(move |x| {
                    compare(source, target, (x, y), window, step, threshold)
                })
            })
        })
        .collect()
}
