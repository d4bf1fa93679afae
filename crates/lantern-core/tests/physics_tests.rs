use glam::Vec3;
use lantern_core::params::PhysicsParams;
use lantern_core::physics::{bounce_depth, clamp_dt, integrate, update_buoyancy, StepContext};
use lantern_core::pool::LanternPool;
use lantern_core::{Camera, LanternGeometry, LanternInstance, SimParams, VisibleVolume};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

fn setup() -> (SimParams, VisibleVolume, LanternInstance) {
    let params = SimParams::default();
    let volume = VisibleVolume::from_camera(&Camera::hero(2.0), &params.bounds);
    let mut pool = LanternPool::new(Arc::new(LanternGeometry::build(&params.shape)));
    let mut rng = StdRng::seed_from_u64(7);
    pool.spawn(true, &params, &volume, &mut rng);
    let mut lantern = pool.lanterns()[0].clone();
    lantern.position = Vec3::new(0.0, 5.0, 0.0);
    lantern.velocity = Vec3::ZERO;
    (params, volume, lantern)
}

fn in_band(volume: &VisibleVolume, p: Vec3) -> bool {
    p.is_finite()
        && p.y >= volume.y_off_bottom
        && p.y <= volume.y_spawn_top
        && p.x >= -volume.x_off
        && p.x <= volume.x_off
}

#[test]
fn dt_is_capped_and_garbage_falls_back() {
    let physics = PhysicsParams::default();
    assert_eq!(clamp_dt(0.016, &physics), 0.016);
    assert_eq!(clamp_dt(2.0, &physics), 0.05);
    assert_eq!(clamp_dt(f32::NAN, &physics), 0.016);
    assert_eq!(clamp_dt(-1.0, &physics), 0.016);
    assert_eq!(clamp_dt(0.0, &physics), 0.016);
}

#[test]
fn buoyancy_stays_in_unit_range_for_arbitrary_inputs() {
    let (params, volume, mut lantern) = setup();
    let mut rng = StdRng::seed_from_u64(42);
    for i in 0..5000 {
        lantern.hovered = rng.gen_bool(0.3);
        lantern.position.y = rng.gen_range(-10.0..20.0);
        let dt = match i % 97 {
            0 => f32::NAN,
            1 => f32::INFINITY,
            2 => -0.5,
            _ => rng.gen_range(0.0..1.5),
        };
        update_buoyancy(&mut lantern, dt, &params.physics, &volume, &mut rng);
        assert!(
            (0.0..=1.0).contains(&lantern.buoyancy),
            "step {i}: buoyancy {}",
            lantern.buoyancy
        );
    }
}

#[test]
fn hover_lights_quickly_and_decay_follows() {
    let (params, volume, mut lantern) = setup();
    let mut rng = StdRng::seed_from_u64(3);
    lantern.buoyancy = 0.0;
    lantern.hovered = true;
    update_buoyancy(&mut lantern, 0.016, &params.physics, &volume, &mut rng);
    assert_eq!(lantern.buoyancy, 1.0);

    lantern.hovered = false;
    update_buoyancy(&mut lantern, 0.1, &params.physics, &volume, &mut rng);
    let expected = 1.0 - lantern.decay_rate * 0.1;
    assert!((lantern.buoyancy - expected).abs() < 1e-6);
}

#[test]
fn spontaneous_ignition_only_below_ceiling() {
    let (mut params, volume, mut lantern) = setup();
    params.physics.random_light_rate = 1.0e6;
    let mut rng = StdRng::seed_from_u64(9);

    lantern.buoyancy = 0.0;
    lantern.position.y = volume.y_visible_max;
    update_buoyancy(&mut lantern, 0.016, &params.physics, &volume, &mut rng);
    assert_eq!(lantern.buoyancy, 0.0);

    lantern.position.y = volume.y_visible_min;
    update_buoyancy(&mut lantern, 0.016, &params.physics, &volume, &mut rng);
    assert_eq!(lantern.buoyancy, 1.0);
}

#[test]
fn depth_bounce_clamps_and_reflects() {
    let (params, volume, mut lantern) = setup();
    let mut rng = StdRng::seed_from_u64(11);
    lantern.position.z = volume.z_max - 0.01;
    lantern.velocity.z = 2.0;
    let ctx = StepContext {
        dt: 0.05,
        time: 0.0,
        physics: &params.physics,
        volume: &volume,
    };
    integrate(&mut lantern, &ctx, &mut rng);
    assert_eq!(lantern.position.z, volume.z_max);
    assert!(lantern.velocity.z < 0.0);

    integrate(&mut lantern, &ctx, &mut rng);
    assert!(lantern.position.z <= volume.z_max);
}

#[test]
fn depth_bounce_is_damped() {
    let (_, volume, mut lantern) = setup();
    lantern.position.z = volume.z_min - 1.0;
    lantern.velocity.z = -1.0;
    bounce_depth(&mut lantern, &volume, 0.6);
    assert_eq!(lantern.position.z, volume.z_min);
    assert!((lantern.velocity.z - 0.6).abs() < 1e-6);
}

#[test]
fn escaped_lanterns_are_recycled_into_the_band() {
    let (params, volume, template) = setup();
    let mut rng = StdRng::seed_from_u64(5);
    let ctx = StepContext {
        dt: 0.016,
        time: 1.0,
        physics: &params.physics,
        volume: &volume,
    };
    let escapes = [
        Vec3::new(0.0, volume.y_off_bottom - 1.0, 0.0),
        Vec3::new(0.0, volume.y_spawn_top + 1.0, 0.0),
        Vec3::new(volume.x_off + 1.0, 5.0, 0.0),
        Vec3::new(-volume.x_off - 1.0, 5.0, 0.0),
        Vec3::new(f32::NAN, 5.0, 0.0),
        Vec3::new(0.0, f32::INFINITY, 0.0),
    ];
    for p in escapes {
        let mut lantern = template.clone();
        lantern.position = p;
        lantern.hovered = true;
        let outcome = integrate(&mut lantern, &ctx, &mut rng);
        assert!(outcome.recycled, "{p:?} was not recycled");
        assert!(in_band(&volume, lantern.position));
        assert!(lantern.position.y >= volume.y_respawn_min);
        assert!(!lantern.hovered);
        assert_eq!(lantern.last_brightness_step, None);
    }
}

#[test]
fn non_finite_velocity_is_zeroed_before_integration() {
    let (params, volume, mut lantern) = setup();
    let mut rng = StdRng::seed_from_u64(13);
    lantern.velocity = Vec3::new(f32::NAN, 0.0, 0.0);
    let ctx = StepContext {
        dt: 0.016,
        time: 0.0,
        physics: &params.physics,
        volume: &volume,
    };
    let before = lantern.position;
    let outcome = integrate(&mut lantern, &ctx, &mut rng);
    assert!(outcome.sanitized);
    assert!(!outcome.recycled);
    assert!(lantern.velocity.is_finite());
    assert_eq!(lantern.position, before);
}

#[test]
fn vertical_speed_is_clamped() {
    let (params, volume, mut lantern) = setup();
    let mut rng = StdRng::seed_from_u64(17);
    lantern.velocity.y = 50.0;
    let ctx = StepContext {
        dt: 0.016,
        time: 0.0,
        physics: &params.physics,
        volume: &volume,
    };
    integrate(&mut lantern, &ctx, &mut rng);
    assert!(lantern.velocity.y <= params.physics.max_vertical_speed);
}
