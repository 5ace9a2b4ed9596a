//! Adaptive removal of weak candidates.

use std::cmp::Ordering;

use crate::search::Match;

/// Candidate count per unit of scale divider above which the median rule
/// applies.
const CROWD_PER_SCALE: usize = 64;
/// Median weight of the crowded cutoff `(best + 2.75 * median) / 3.75`.
const CROWD_MEDIAN_WEIGHT: f32 = 2.75;
/// Best weight of the sparse cutoff `(1.25 * best + worst) / 2.25`.
const SPARSE_BEST_WEIGHT: f32 = 1.25;

fn match_cmp_desc(a: &Match, b: &Match) -> Ordering {
    b.similarity
        .total_cmp(&a.similarity)
        .then_with(|| a.zone.y.cmp(&b.zone.y))
        .then_with(|| a.zone.x.cmp(&b.zone.x))
        .then_with(|| a.zone.height.cmp(&b.zone.height))
        .then_with(|| a.zone.width.cmp(&b.zone.width))
}

/// Sorts matches by descending similarity with deterministic tie-breaking.
pub(crate) fn sort_matches_desc(matches: &mut [Match]) {
    matches.sort_by(match_cmp_desc);
}

/// Drops weak matches relative to the best one; leaves the list sorted.
///
/// With more than `64 * scale_divider` candidates the cutoff leans on the
/// median, `(best + 2.75 * median) / 3.75`, which tolerates the crowd of weak
/// hits expected at coarse levels. Otherwise the stricter
/// `(1.25 * best + worst) / 2.25` applies.
pub fn filter_worst_matches(matches: &mut Vec<Match>, scale_divider: usize) {
    if matches.is_empty() {
        return;
    }
    sort_matches_desc(matches);

    let best = matches[0].similarity;
    let count = matches.len();
    let cutoff = if count > CROWD_PER_SCALE * scale_divider {
        let median = matches[count / 2].similarity;
        (best + median * CROWD_MEDIAN_WEIGHT) / (1.0 + CROWD_MEDIAN_WEIGHT)
    } else {
        let worst = matches[count - 1].similarity;
        (best * SPARSE_BEST_WEIGHT + worst) / (SPARSE_BEST_WEIGHT + 1.0)
    };
    // The best match survives rounding in the weighted mean.
    let cutoff = cutoff.min(best);
    matches.retain(|m| m.similarity >= cutoff);
}

#[cfg(test)]
mod tests {
    use super::{filter_worst_matches, sort_matches_desc};
    use crate::image::Rect;
    use crate::search::Match;

    fn m(x: usize, similarity: f32) -> Match {
        Match {
            zone: Rect::new(x, 0, 4, 4),
            similarity,
        }
    }

    #[test]
    fn sort_breaks_ties_by_position() {
        let mut list = vec![m(5, 0.5), m(1, 0.5), m(3, 0.9)];
        sort_matches_desc(&mut list);
        let xs: Vec<usize> = list.iter().map(|m| m.zone.x).collect();
        assert_eq!(xs, vec![3, 1, 5]);
    }

    #[test]
    fn sparse_rule_uses_best_and_worst() {
        let mut list = vec![m(0, 0.6), m(1, 0.9), m(2, 0.8), m(3, 0.7)];
        filter_worst_matches(&mut list, 1);
        // cutoff = (1.25 * 0.9 + 0.6) / 2.25 = 0.7667
        let xs: Vec<usize> = list.iter().map(|m| m.zone.x).collect();
        assert_eq!(xs, vec![1, 2]);
    }

    #[test]
    fn crowded_rule_uses_median() {
        let mut list: Vec<Match> = (0..130)
            .map(|i| m(i, if i == 0 { 1.0 } else { 0.5 + (i % 2) as f32 * 0.1 }))
            .collect();
        filter_worst_matches(&mut list, 2);
        // 130 > 128; median is 0.6, cutoff = (1.0 + 2.75 * 0.6) / 3.75 = 0.7067.
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].zone.x, 0);
    }

    #[test]
    fn single_match_survives() {
        let mut list = vec![m(0, 0.96)];
        filter_worst_matches(&mut list, 1);
        assert_eq!(list.len(), 1);
    }
}
