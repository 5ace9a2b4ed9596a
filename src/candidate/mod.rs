//! Match post-processing between and after pyramid levels.
//!
//! Includes the adaptive weak-match filter and the overlap-driven merge and
//! normalization passes.

pub(crate) mod filter;
pub(crate) mod merge;
