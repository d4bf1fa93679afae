use glam::{Vec2, Vec3};
use lantern_core::{CollisionCadence, FrameStats, SimError, SimParams, Simulation};

fn sim(width: f32, height: f32) -> Simulation {
    Simulation::new(SimParams::default(), width, height, 1234).unwrap()
}

/// Park every lantern on a sparse grid, at rest, so only the chosen ones touch.
fn park(sim: &mut Simulation) {
    for (i, l) in sim.lanterns_mut().iter_mut().enumerate() {
        l.position = Vec3::new(-8.0 + (i % 16) as f32, 1.0 + (i / 16) as f32 * 1.5, -4.0);
        l.velocity = Vec3::ZERO;
        l.buoyancy = 0.5;
        l.hovered = false;
    }
}

#[test]
fn population_scales_with_area_within_bounds() {
    assert_eq!(sim(800.0, 400.0).lanterns().len(), 210);
    assert_eq!(sim(100.0, 100.0).lanterns().len(), 35);
    assert_eq!(sim(4000.0, 2000.0).lanterns().len(), 210);
    assert_eq!(sim(400.0, 400.0).lanterns().len(), 105);
}

#[test]
fn degenerate_viewports_are_rejected() {
    let err = Simulation::new(SimParams::default(), 0.0, 400.0, 1).err();
    assert!(matches!(err, Some(SimError::DegenerateViewport { .. })));

    let mut s = sim(800.0, 400.0);
    let before = *s.volume();
    assert!(s.resize(f32::NAN, 300.0).is_err());
    assert_eq!(*s.volume(), before);
}

#[test]
fn resize_widens_the_visible_band() {
    let mut s = sim(800.0, 400.0);
    let narrow = s.volume().x_visible;
    s.resize(1600.0, 400.0).unwrap();
    assert!((s.volume().x_visible - narrow * 2.0).abs() < 1e-4);
    assert_eq!(s.size(), (1600.0, 400.0));
}

#[test]
fn lanterns_spawn_inside_the_volume() {
    let s = sim(800.0, 400.0);
    let v = *s.volume();
    for l in s.lanterns() {
        assert!(l.position.y >= v.y_off_bottom && l.position.y <= v.y_spawn_top);
        assert!(l.position.x.abs() <= v.x_visible);
        assert!(l.position.z >= v.z_min && l.position.z <= v.z_max);
        assert!((0.0..=1.0).contains(&l.buoyancy));
    }
}

#[test]
fn first_tick_colors_every_lantern() {
    let mut s = sim(400.0, 400.0);
    let stats = s.tick(0.016);
    assert_eq!(stats.recolored, s.lanterns().len());
}

#[test]
fn long_runs_never_leak_lanterns() {
    let mut s = sim(640.0, 360.0);
    let margin = 1.0;
    for frame in 0..1200 {
        let dt = if frame % 400 == 0 { 1.0 } else { 0.016 };
        s.tick(dt);
        let v = *s.volume();
        for l in s.lanterns() {
            let p = l.position;
            assert!(p.is_finite() && l.velocity.is_finite(), "frame {frame}");
            assert!(p.y >= v.y_off_bottom - margin && p.y <= v.y_spawn_top + margin);
            assert!(p.x.abs() <= v.x_off + margin);
            assert!(p.z >= v.z_min - margin && p.z <= v.z_max + margin);
            assert!((0.0..=1.0).contains(&l.buoyancy));
        }
    }
    assert!(s.elapsed() > 0.0);
}

#[test]
fn pause_freezes_state_but_ticks_keep_returning() {
    let mut s = sim(400.0, 400.0);
    s.tick(0.016);
    assert!(s.toggle_pause());

    let snapshot: Vec<_> = s
        .lanterns()
        .iter()
        .map(|l| (l.position, l.buoyancy, l.colors.clone()))
        .collect();
    let elapsed = s.elapsed();
    for _ in 0..20 {
        assert_eq!(s.tick(0.016), FrameStats::default());
    }
    let after: Vec<_> = s
        .lanterns()
        .iter()
        .map(|l| (l.position, l.buoyancy, l.colors.clone()))
        .collect();
    assert_eq!(snapshot, after);
    assert_eq!(s.elapsed(), elapsed);

    assert!(!s.toggle_pause());
    s.tick(0.016);
    assert!(s.elapsed() > elapsed);
    assert_ne!(s.lanterns()[0].position, snapshot[0].0);
}

#[test]
fn collisions_run_on_alternate_frames_by_default() {
    let mut s = sim(100.0, 100.0);
    assert_eq!(s.params().collision.cadence, CollisionCadence::EveryOtherFrame);
    park(&mut s);
    s.lanterns_mut()[0].position = Vec3::new(0.0, 5.0, 0.0);
    s.lanterns_mut()[1].position = Vec3::new(0.3, 5.0, 0.0);

    assert_eq!(s.tick(0.016).collision_pairs, 0);
    assert!(s.lanterns()[0].position.distance(s.lanterns()[1].position) < 0.5);
    assert_eq!(s.tick(0.016).collision_pairs, 1);
    assert!(s.lanterns()[0].position.distance(s.lanterns()[1].position) >= 0.7 - 1e-4);
}

#[test]
fn every_frame_cadence_resolves_immediately() {
    let mut params = SimParams::default();
    params.collision.cadence = CollisionCadence::EveryFrame;
    let mut s = Simulation::new(params, 100.0, 100.0, 5).unwrap();
    park(&mut s);
    s.lanterns_mut()[2].position = Vec3::new(0.0, 5.0, 0.0);
    s.lanterns_mut()[3].position = Vec3::new(0.0, 5.2, 0.0);
    assert_eq!(s.tick(0.016).collision_pairs, 1);
}

#[test]
fn hover_lights_the_lantern_under_the_pointer() {
    let mut s = sim(800.0, 400.0);
    park(&mut s);
    s.lanterns_mut()[0].position = Vec3::new(0.0, 5.0, 0.0);
    let target = s.camera().project_ndc(Vec3::new(0.0, 5.0, 0.0));

    assert!(s.pointer_move(target, 0.0));
    assert!(s.lanterns()[0].hovered);
    assert!(!s.lanterns()[5].hovered);

    s.tick(0.016);
    assert_eq!(s.lanterns()[0].buoyancy, 1.0);
    assert!((s.lanterns()[0].emissive_intensity - 1.1).abs() < 1e-6);

    s.pointer_leave();
    assert!(s.lanterns().iter().all(|l| !l.hovered));
}

#[test]
fn pointer_moves_are_throttled() {
    let mut s = sim(800.0, 400.0);
    park(&mut s);
    s.lanterns_mut()[0].position = Vec3::new(0.0, 5.0, 0.0);
    let target = s.camera().project_ndc(Vec3::new(0.0, 5.0, 0.0));

    assert!(s.pointer_move(target, 100.0));
    assert!(s.lanterns()[0].hovered);
    // too soon: flags untouched
    assert!(!s.pointer_move(Vec2::new(5.0, 5.0), 110.0));
    assert!(s.lanterns()[0].hovered);
    // next evaluation clears everything before re-scanning
    assert!(s.pointer_move(Vec2::new(5.0, 5.0), 131.0));
    assert!(s.lanterns().iter().all(|l| !l.hovered));
}

#[test]
fn dirty_colors_drain_once() {
    let mut s = sim(100.0, 100.0);
    let count = s.lanterns().len();
    let vertex_floats = s.geometry().vertex_count() * 3;

    let mut seen = Vec::new();
    let drained = s.drain_dirty_colors(|i, colors| {
        assert_eq!(colors.len(), vertex_floats);
        seen.push(i);
    });
    assert_eq!(drained, count);
    assert_eq!(seen, (0..count).collect::<Vec<_>>());
    assert_eq!(s.drain_dirty_colors(|_, _| {}), 0);

    s.tick(0.016);
    assert_eq!(s.drain_dirty_colors(|_, _| {}), count);
}

#[test]
fn same_seed_same_world() {
    let a = sim(800.0, 400.0);
    let b = sim(800.0, 400.0);
    for (x, y) in a.lanterns().iter().zip(b.lanterns()) {
        assert_eq!(x.position, y.position);
        assert_eq!(x.pattern, y.pattern);
    }
}

#[test]
fn model_matrix_places_the_lantern() {
    let mut s = sim(100.0, 100.0);
    let l = &mut s.lanterns_mut()[0];
    l.position = Vec3::new(1.0, 2.0, 3.0);
    l.rotation_y = std::f32::consts::FRAC_PI_2;
    let m = l.model_matrix();
    assert!(m.transform_point3(Vec3::ZERO).abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-6));
    assert!(m.transform_vector3(Vec3::X).abs_diff_eq(Vec3::NEG_Z, 1e-6));
}
