//! Reusable working buffers of one search.

use crate::aggregate::AggregateGrid;
use crate::util::RasterFindResult;

/// Aggregate grids for the source and the target.
///
/// Grids are sized for the full-resolution inputs and reused by every pyramid
/// level, since scaled rasters are never larger. A `Finder` keeps one context
/// across calls so repeated searches with the same sizes do not reallocate.
#[derive(Clone, Debug, Default)]
pub struct SearchContext {
    source: AggregateGrid,
    target: AggregateGrid,
}

impl SearchContext {
    /// Creates an empty context; grids are allocated by [`Self::prepare`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sizes both grids for a source and a target of the given dimensions.
    pub fn prepare(
        &mut self,
        source: (usize, usize),
        target: (usize, usize),
    ) -> RasterFindResult<()> {
        self.source.ensure_size(source.0, source.1)?;
        self.target.ensure_size(target.0, target.1)?;
        Ok(())
    }

    /// Source aggregate grid.
    pub fn source_grid(&self) -> &AggregateGrid {
        &self.source
    }

    /// Target aggregate grid.
    pub fn target_grid(&self) -> &AggregateGrid {
        &self.target
    }

    pub(crate) fn grids_mut(&mut self) -> (&mut AggregateGrid, &mut AggregateGrid) {
        (&mut self.source, &mut self.target)
    }
}
