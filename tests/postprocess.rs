use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rasterfind::lowlevel::{
    filter_worst_matches, merge_near_matches, normalize_matches, overlap_ratio,
};
use rasterfind::{Match, Rect};

fn random_matches(rng: &mut StdRng, count: usize) -> Vec<Match> {
    (0..count)
        .map(|_| Match {
            zone: Rect::new(
                rng.random_range(0..200),
                rng.random_range(0..200),
                rng.random_range(10..=40),
                rng.random_range(10..=40),
            ),
            similarity: rng.random_range(0.5..=1.0),
        })
        .collect()
}

#[test]
fn overlap_ratio_is_symmetric() {
    let mut rng = StdRng::seed_from_u64(1);
    let list = random_matches(&mut rng, 60);
    for a in &list {
        for b in &list {
            let ab = overlap_ratio(&a.zone, &b.zone);
            assert_eq!(ab, overlap_ratio(&b.zone, &a.zone));
            assert!((0.0..=1.0).contains(&ab));
        }
    }
}

#[test]
fn normalize_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..20 {
        let mut list = random_matches(&mut rng, 80);
        normalize_matches(&mut list);
        let once = list.clone();
        normalize_matches(&mut list);
        assert_eq!(list, once);
    }
}

#[test]
fn normalize_leaves_no_heavy_overlap() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut list = random_matches(&mut rng, 120);
    normalize_matches(&mut list);
    for (i, a) in list.iter().enumerate() {
        for b in &list[i + 1..] {
            assert!(overlap_ratio(&a.zone, &b.zone) <= 0.325);
        }
    }
}

#[test]
fn detections_two_pixels_apart_become_one() {
    let twin = |x: usize, similarity: f32| Match {
        zone: Rect::new(x, 40, 30, 24),
        similarity,
    };

    let mut coarse = vec![twin(20, 0.93), twin(22, 0.94)];
    merge_near_matches(&mut coarse, 2);
    assert_eq!(coarse.len(), 1);
    assert_eq!(coarse[0].zone, Rect::new(20, 40, 32, 24));
    assert_eq!(coarse[0].similarity, 0.94);

    let mut fine = vec![twin(20, 0.97), twin(22, 0.99)];
    normalize_matches(&mut fine);
    assert_eq!(fine, vec![twin(22, 0.99)]);
}

#[test]
fn merge_never_increases_count_and_keeps_best_similarity() {
    let mut rng = StdRng::seed_from_u64(4);
    for scale in [2, 4, 8] {
        let mut list = random_matches(&mut rng, 50);
        let best = list
            .iter()
            .map(|m| m.similarity)
            .fold(f32::MIN, f32::max);
        merge_near_matches(&mut list, scale);
        assert!(list.len() <= 50);
        let merged_best = list
            .iter()
            .map(|m| m.similarity)
            .fold(f32::MIN, f32::max);
        assert_eq!(merged_best, best);
    }
}

#[test]
fn filter_keeps_strongest_first() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut list = random_matches(&mut rng, 300);
    let best = list
        .iter()
        .map(|m| m.similarity)
        .fold(f32::MIN, f32::max);
    filter_worst_matches(&mut list, 1);
    assert!(!list.is_empty() && list.len() < 300);
    assert_eq!(list[0].similarity, best);
    assert!(list.windows(2).all(|w| w[0].similarity >= w[1].similarity));
}
