use glam::Vec3;
use lantern_core::collision::{resolve_pair, SpatialHash};
use lantern_core::pool::LanternPool;
use lantern_core::{Camera, LanternGeometry, LanternInstance, SimParams, VisibleVolume};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

const RADIUS: f32 = 0.35;
const RESTITUTION: f32 = 0.3;

fn lanterns(states: &[(Vec3, Vec3)]) -> Vec<LanternInstance> {
    let params = SimParams::default();
    let volume = VisibleVolume::from_camera(&Camera::hero(2.0), &params.bounds);
    let mut pool = LanternPool::new(Arc::new(LanternGeometry::build(&params.shape)));
    let mut rng = StdRng::seed_from_u64(21);
    states
        .iter()
        .map(|&(position, velocity)| {
            let i = pool.spawn(true, &params, &volume, &mut rng);
            let mut lantern = pool.lanterns()[i].clone();
            lantern.position = position;
            lantern.velocity = velocity;
            lantern
        })
        .collect()
}

fn hash() -> SpatialHash {
    SpatialHash::new(RADIUS * 2.5)
}

#[test]
fn head_on_pair_separates_with_restitution() {
    let mut ls = lanterns(&[
        (Vec3::new(0.0, 5.0, 0.0), Vec3::X),
        (Vec3::new(0.5, 5.0, 0.0), Vec3::NEG_X),
    ]);
    let pairs = hash().resolve(&mut ls, RADIUS, RESTITUTION);
    assert_eq!(pairs, 1);

    let separation = ls[0].position.distance(ls[1].position);
    assert!((separation - 2.0 * RADIUS).abs() < 1e-5, "separation {separation}");
    assert!((ls[0].position.x + 0.1).abs() < 1e-5);
    assert!((ls[1].position.x - 0.6).abs() < 1e-5);

    assert!((ls[0].velocity.x + 0.3).abs() < 1e-5);
    assert!((ls[1].velocity.x - 0.3).abs() < 1e-5);
    let momentum = ls[0].velocity + ls[1].velocity;
    assert!(momentum.length() < 1e-5);
}

#[test]
fn pairs_in_neighbouring_cells_are_found() {
    let mut ls = lanterns(&[
        (Vec3::new(-0.1, 5.0, 0.0), Vec3::X),
        (Vec3::new(0.4, 5.0, 0.0), Vec3::NEG_X),
    ]);
    let mut grid = hash();
    grid.rebuild(&ls);
    assert_ne!(grid.cell_of(ls[0].position), grid.cell_of(ls[1].position));

    assert_eq!(grid.resolve(&mut ls, RADIUS, RESTITUTION), 1);
    assert!((ls[0].position.distance(ls[1].position) - 0.7).abs() < 1e-5);
    assert!((ls[0].velocity.x + 0.3).abs() < 1e-5);
}

#[test]
fn separating_pair_is_pushed_apart_without_impulse() {
    let mut ls = lanterns(&[
        (Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_X),
        (Vec3::new(0.5, 5.0, 0.0), Vec3::X),
    ]);
    assert_eq!(hash().resolve(&mut ls, RADIUS, RESTITUTION), 1);
    assert_eq!(ls[0].velocity, Vec3::NEG_X);
    assert_eq!(ls[1].velocity, Vec3::X);
    assert!(ls[0].position.distance(ls[1].position) >= 0.7 - 1e-5);
}

#[test]
fn distant_and_coincident_pairs_are_ignored() {
    let mut far = lanterns(&[
        (Vec3::new(0.0, 5.0, 0.0), Vec3::X),
        (Vec3::new(0.71, 5.0, 0.0), Vec3::NEG_X),
    ]);
    assert_eq!(hash().resolve(&mut far, RADIUS, RESTITUTION), 0);

    let mut same = lanterns(&[
        (Vec3::new(1.0, 5.0, 1.0), Vec3::X),
        (Vec3::new(1.0, 5.0, 1.0), Vec3::NEG_X),
    ]);
    assert_eq!(hash().resolve(&mut same, RADIUS, RESTITUTION), 0);
    assert_eq!(same[0].position, same[1].position);
}

#[test]
fn non_finite_positions_do_not_poison_neighbours() {
    let mut ls = lanterns(&[
        (Vec3::new(f32::NAN, 5.0, 0.0), Vec3::ZERO),
        (Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO),
    ]);
    let (a, b) = ls.split_at_mut(1);
    assert!(!resolve_pair(&mut a[0], &mut b[0], 0.7, 0.49, RESTITUTION));
    assert!(b[0].position.is_finite());
}

#[test]
fn every_lantern_lands_in_exactly_one_cell() {
    let states: Vec<_> = (0..40)
        .map(|i| (Vec3::new(i as f32 * 0.37 - 7.0, (i % 5) as f32, -(i as f32) * 0.2), Vec3::ZERO))
        .collect();
    let ls = lanterns(&states);
    let mut grid = hash();
    grid.rebuild(&ls);
    let mut seen = vec![0; ls.len()];
    for l in &ls {
        for &i in grid.bucket(grid.cell_of(l.position)) {
            seen[i] += 1;
        }
    }
    // each index is counted once per lantern sharing its cell
    for (i, l) in ls.iter().enumerate() {
        let bucket = grid.bucket(grid.cell_of(l.position));
        assert!(bucket.contains(&i));
        assert_eq!(seen[i], bucket.len());
    }
}
