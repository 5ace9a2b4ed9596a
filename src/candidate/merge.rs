//! Overlap-driven consolidation of matches.

use crate::candidate::filter::sort_matches_desc;
use crate::image::Rect;
use crate::search::Match;
use crate::util::math::merge_threshold;

/// Overlap above which the finest level keeps only the stronger match.
pub const NORMALIZE_OVERLAP: f32 = 0.325;
/// Merge ramp bases, in hundredths: `0.90, 0.91, ..., 0.99`.
const MERGE_RAMP: std::ops::RangeInclusive<u16> = 90..=99;

/// Intersection area over the smaller zone's area.
///
/// Symmetric in its arguments; `0.0` when either zone is empty.
pub fn overlap_ratio(a: &Rect, b: &Rect) -> f32 {
    let smaller = a.area().min(b.area());
    if smaller == 0 {
        return 0.0;
    }
    let shared = a.intersect(b).map_or(0, |r| r.area());
    shared as f32 / smaller as f32
}

/// Merges clusters of overlapping matches on a coarse level.
///
/// Runs ten passes with the overlap threshold `base ^ (scale_divider ^ 0.25)`
/// for `base` rising from 0.90 to 0.99. Each merge replaces the earlier match
/// of a pair by the union of both zones and the higher similarity.
pub fn merge_near_matches(matches: &mut Vec<Match>, scale_divider: usize) {
    for hundredths in MERGE_RAMP {
        let base = f32::from(hundredths) / 100.0;
        merge_pass(matches, merge_threshold(base, scale_divider));
    }
}

fn merge_pass(matches: &mut Vec<Match>, threshold: f32) {
    let mut n = 0;
    while n < matches.len() {
        let mut m = matches.len() - 1;
        while m > n {
            if overlap_ratio(&matches[n].zone, &matches[m].zone) > threshold {
                let other = matches.remove(m);
                let kept = &mut matches[n];
                kept.zone = kept.zone.union(&other.zone);
                kept.similarity = kept.similarity.max(other.similarity);
            }
            m -= 1;
        }
        n += 1;
    }
}

/// Final deduplication at full resolution.
///
/// Of any two matches overlapping by more than [`NORMALIZE_OVERLAP`] only the
/// more similar one survives, with its own zone unchanged. On equal similarity
/// the match that sorts first survives: smaller `y`, then smaller `x`. The
/// result is sorted by descending similarity and normalizing it again changes
/// nothing.
pub fn normalize_matches(matches: &mut Vec<Match>) {
    sort_matches_desc(matches);
    let mut kept: Vec<Match> = Vec::with_capacity(matches.len());

    'outer: for candidate in matches.iter().copied() {
        for strong in kept.iter() {
            if overlap_ratio(&candidate.zone, &strong.zone) > NORMALIZE_OVERLAP {
                continue 'outer;
            }
        }
        kept.push(candidate);
    }

    *matches = kept;
}

#[cfg(test)]
mod tests {
    use super::{merge_near_matches, normalize_matches, overlap_ratio};
    use crate::image::Rect;
    use crate::search::Match;

    fn m(x: usize, y: usize, size: usize, similarity: f32) -> Match {
        Match {
            zone: Rect::new(x, y, size, size),
            similarity,
        }
    }

    #[test]
    fn overlap_uses_smaller_area() {
        let big = Rect::new(0, 0, 10, 10);
        let small = Rect::new(2, 2, 4, 4);
        assert_eq!(overlap_ratio(&big, &small), 1.0);
        assert_eq!(overlap_ratio(&big, &Rect::new(20, 20, 4, 4)), 0.0);
        assert_eq!(overlap_ratio(&big, &Rect::new(0, 0, 0, 4)), 0.0);
    }

    #[test]
    fn near_duplicates_merge_into_union() {
        let mut list = vec![m(10, 10, 32, 0.97), m(12, 10, 32, 0.99)];
        merge_near_matches(&mut list, 2);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].zone, Rect::new(10, 10, 34, 32));
        assert_eq!(list[0].similarity, 0.99);
    }

    #[test]
    fn loose_overlap_is_not_merged() {
        // Half of each zone is shared: below 0.90^(2^0.25).
        let mut list = vec![m(0, 0, 16, 0.9), m(8, 0, 16, 0.9)];
        merge_near_matches(&mut list, 2);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn merge_chains_through_earlier_match() {
        let mut list = vec![m(0, 0, 40, 0.9), m(1, 0, 40, 0.8), m(2, 0, 40, 0.95)];
        merge_near_matches(&mut list, 4);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].zone, Rect::new(0, 0, 42, 40));
        assert_eq!(list[0].similarity, 0.95);
    }

    #[test]
    fn normalize_keeps_stronger_zone() {
        let mut list = vec![m(0, 0, 20, 0.96), m(5, 5, 20, 0.99), m(60, 0, 20, 0.97)];
        normalize_matches(&mut list);
        assert_eq!(list, vec![m(5, 5, 20, 0.99), m(60, 0, 20, 0.97)]);
    }

    #[test]
    fn normalize_tie_keeps_top_left_zone() {
        let mut list = vec![m(22, 0, 20, 0.9), m(20, 0, 20, 0.9)];
        normalize_matches(&mut list);
        assert_eq!(list, vec![m(20, 0, 20, 0.9)]);

        let mut list = vec![m(0, 3, 20, 0.9), m(4, 1, 20, 0.9)];
        normalize_matches(&mut list);
        assert_eq!(list, vec![m(4, 1, 20, 0.9)]);
    }
}
