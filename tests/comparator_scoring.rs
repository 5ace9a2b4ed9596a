use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rasterfind::lowlevel::{build_aggregates, compare, similarity_at, AggregateGrid, WindowSize};
use rasterfind::{Raster, Rect};

fn build(raster: &Raster, window: WindowSize) -> AggregateGrid {
    let mut grid = AggregateGrid::new(raster.width(), raster.height()).unwrap();
    build_aggregates(raster.view(), &mut grid, window, &[raster.view().bounds()], false).unwrap();
    grid
}

#[test]
fn similarity_stays_within_unit_interval() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..20 {
        let source = Raster::from_fn(48, 36, |_, _| {
            [
                rng.random_range(1..=255),
                rng.random_range(1..=255),
                rng.random_range(1..=255),
            ]
        })
        .unwrap();
        let target = Raster::from_fn(12, 10, |_, _| {
            [
                rng.random_range(1..=255),
                rng.random_range(1..=255),
                rng.random_range(1..=255),
            ]
        })
        .unwrap();
        let window = WindowSize::new(12, 10);
        let src = build(&source, window);
        let tgt = build(&target, window);
        let step = 1 << rng.random_range(0..3);
        for y in 0..=36 - 10 {
            for x in 0..=48 - 12 {
                let score = similarity_at(&src, &tgt, x, y, window, step);
                assert!(score > 0.0 && score <= 1.0, "score {score} at ({x}, {y})");
            }
        }
    }
}

#[test]
fn exact_copy_scores_one_at_every_step() {
    let mut rng = StdRng::seed_from_u64(9);
    let source = Raster::from_fn(40, 30, |_, _| {
        [
            rng.random_range(0..=255),
            rng.random_range(0..=255),
            rng.random_range(0..=255),
        ]
    })
    .unwrap();
    let zone = Rect::new(13, 7, 15, 11);
    let target = Raster::from_view(source.view().roi(zone).unwrap()).unwrap();
    let window = WindowSize::new(zone.width, zone.height);
    let src = build(&source, window);
    let tgt = build(&target, window);

    for step in [1, 2, 4, 8] {
        let found = compare(&src, &tgt, (zone.x, zone.y), window, step, 0.999).unwrap();
        assert_eq!(found.zone, zone);
        assert_eq!(found.similarity, 1.0);
    }
}

#[test]
fn zero_sums_follow_degenerate_rules() {
    let window = WindowSize::new(10, 10);
    let black = build(&Raster::filled(20, 20, [0, 0, 0]).unwrap(), window);
    let black_target = build(&Raster::filled(10, 10, [0, 0, 0]).unwrap(), window);
    let grey_target = build(&Raster::filled(10, 10, [90, 90, 90]).unwrap(), window);

    // 0 / 0 scores as identical.
    assert_eq!(similarity_at(&black, &black_target, 5, 5, window, 1), 1.0);
    // x / 0 scores as a total mismatch; only the flat gradients agree.
    let score = similarity_at(&black, &grey_target, 5, 5, window, 1);
    assert!((score - 1.0 / 3.0).abs() < 1e-6);
    assert!(score.is_finite());
}

#[test]
fn threshold_rejects_weak_placement() {
    let source = Raster::from_fn(30, 30, |x, y| [(x * 8) as u8, (y * 8) as u8, 128]).unwrap();
    let target = Raster::filled(10, 10, [200, 10, 10]).unwrap();
    let window = WindowSize::new(10, 10);
    let src = build(&source, window);
    let tgt = build(&target, window);
    assert!(compare(&src, &tgt, (0, 0), window, 1, 0.95).is_none());
}
