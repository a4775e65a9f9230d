use proptest::prelude::*;
use savanna::core::{EntityId, Vec2};
use savanna::spatial::SparseHashGrid;

fn point() -> impl Strategy<Value = (f32, f32)> {
    (-200.0f32..1200.0, -200.0f32..1200.0)
}

fn bodies() -> impl Strategy<Value = Vec<((f32, f32), f32)>> {
    prop::collection::vec((point(), 0.0f32..40.0), 0..80)
}

fn brute_force(bodies: &[(Vec2, f32)], center: Vec2, radius: f32) -> Vec<EntityId> {
    bodies
        .iter()
        .enumerate()
        .filter(|(_, (pos, r))| {
            let limit = radius + r;
            center.distance_squared(pos) <= limit * limit
        })
        .map(|(i, _)| EntityId(i as u32 + 1))
        .collect()
}

fn build(raw: &[((f32, f32), f32)]) -> (SparseHashGrid, Vec<(Vec2, f32)>) {
    let mut grid = SparseHashGrid::new(32.0);
    let bodies: Vec<(Vec2, f32)> = raw.iter().map(|&((x, y), r)| (Vec2::new(x, y), r)).collect();
    for (i, &(pos, r)) in bodies.iter().enumerate() {
        grid.update(EntityId(i as u32 + 1), pos, r);
    }
    (grid, bodies)
}

proptest! {
    #[test]
    fn radius_query_matches_brute_force(raw in bodies(), (cx, cy) in point(), radius in 0.0f32..300.0) {
        let (grid, bodies) = build(&raw);
        let center = Vec2::new(cx, cy);
        prop_assert_eq!(grid.query_radius(center, radius), brute_force(&bodies, center, radius));
    }

    #[test]
    fn radius_query_sound_after_moves(
        raw in bodies(),
        moves in prop::collection::vec((any::<usize>(), point()), 0..40),
        (cx, cy) in point(),
        radius in 0.0f32..300.0,
    ) {
        let (mut grid, mut bodies) = build(&raw);
        if !bodies.is_empty() {
            for (i, (x, y)) in moves {
                let i = i % bodies.len();
                bodies[i].0 = Vec2::new(x, y);
                grid.update(EntityId(i as u32 + 1), bodies[i].0, bodies[i].1);
            }
        }
        let center = Vec2::new(cx, cy);
        prop_assert_eq!(grid.query_radius(center, radius), brute_force(&bodies, center, radius));
        prop_assert_eq!(grid.len(), bodies.len());
    }

    #[test]
    fn nearest_is_closest_centre(raw in bodies(), (cx, cy) in point(), radius in 0.0f32..400.0) {
        let (grid, bodies) = build(&raw);
        let center = Vec2::new(cx, cy);
        let max_sq = radius * radius;

        let expected = bodies
            .iter()
            .enumerate()
            .map(|(i, (pos, _))| (center.distance_squared(pos), i))
            .filter(|&(d, _)| d <= max_sq)
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, i)| EntityId(i as u32 + 1));

        prop_assert_eq!(grid.query_nearest(center, radius), expected);
    }

    #[test]
    fn removed_entities_never_returned(raw in bodies(), drop_every in 1usize..5) {
        let (mut grid, bodies) = build(&raw);
        for i in (0..bodies.len()).step_by(drop_every) {
            prop_assert!(grid.remove(EntityId(i as u32 + 1)));
        }
        let everything = grid.query_radius(Vec2::new(500.0, 500.0), 5000.0);
        for id in everything {
            prop_assert!((id.0 as usize - 1) % drop_every != 0);
        }
    }
}
