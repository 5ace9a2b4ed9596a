//! Low-level building blocks for custom search pipelines.
//!
//! These expose the aggregate builder, the comparator and the match
//! post-processing steps used by [`crate::Finder`]. Most users should prefer
//! the high-level `Finder` API.

pub use crate::aggregate::{build_aggregates, AggregateGrid, RgbWeight, WindowSize};
pub use crate::candidate::filter::filter_worst_matches;
pub use crate::candidate::merge::{
    merge_near_matches, normalize_matches, overlap_ratio, NORMALIZE_OVERLAP,
};
pub use crate::search::compare::{compare, similarity_at};
pub use crate::search::{candidate_regions, SearchContext, MIN_LEVEL_AREA};
