//! Per-frame integration of a single lantern.

use crate::camera::VisibleVolume;
use crate::lantern::LanternInstance;
use crate::params::PhysicsParams;
use crate::pool;
use glam::Vec3;
use rand::Rng;

/// Inputs shared by every lantern in one frame.
pub struct StepContext<'a> {
    pub dt: f32,
    /// Simulation clock in seconds, drives the wobble.
    pub time: f32,
    pub physics: &'a PhysicsParams,
    pub volume: &'a VisibleVolume,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub recycled: bool,
    /// Non-finite state was found and replaced.
    pub sanitized: bool,
}

/// Frame time in seconds, capped so a resumed tab does not explode the state.
pub fn clamp_dt(raw: f32, physics: &PhysicsParams) -> f32 {
    if raw.is_finite() && raw > 0.0 {
        raw.min(physics.max_dt)
    } else {
        physics.fallback_dt
    }
}

/// Hover lifts buoyancy quickly; otherwise it decays at the lantern's own rate.
/// Unlit lanterns low in the view may ignite spontaneously.
pub fn update_buoyancy<R: Rng + ?Sized>(
    lantern: &mut LanternInstance,
    dt: f32,
    physics: &PhysicsParams,
    volume: &VisibleVolume,
    rng: &mut R,
) {
    let mut b = if lantern.buoyancy.is_finite() {
        lantern.buoyancy
    } else {
        0.0
    };
    if lantern.hovered {
        b += physics.rise_rate * dt;
    } else if b > 0.0 {
        b -= lantern.decay_rate * dt;
    }
    if !lantern.hovered
        && b <= physics.ignite_threshold
        && lantern.position.y < volume.y_visible_max * physics.ignite_ceiling_fraction
        && rng.gen::<f32>() < physics.random_light_rate * dt
    {
        b = 1.0;
    }
    lantern.buoyancy = if b.is_finite() { b.clamp(0.0, 1.0) } else { 0.0 };
}

/// Advance one lantern by `ctx.dt`: forces, drag, integration, spin, depth
/// bounce and the recycle check.
pub fn integrate<R: Rng + ?Sized>(
    lantern: &mut LanternInstance,
    ctx: &StepContext<'_>,
    rng: &mut R,
) -> StepOutcome {
    let physics = ctx.physics;
    let dt = ctx.dt;
    let mut outcome = StepOutcome::default();

    update_buoyancy(lantern, dt, physics, ctx.volume, rng);

    let v = &mut lantern.velocity;
    v.y += (physics.gravity + physics.lift_strength * lantern.buoyancy) * dt;

    let (wobble_x, wobble_z) = lantern.wobble.force(ctx.time);
    v.x += wobble_x * dt;
    v.z += wobble_z * dt;

    v.x *= physics.horizontal_drag;
    v.y *= physics.vertical_drag;
    v.z *= physics.horizontal_drag;
    v.y = v.y.clamp(-physics.max_vertical_speed, physics.max_vertical_speed);

    if !v.is_finite() {
        *v = Vec3::ZERO;
        outcome.sanitized = true;
    }
    lantern.position += *v * dt;

    lantern.rotation_y += lantern.angular_velocity_y * dt;
    if !lantern.rotation_y.is_finite() {
        lantern.rotation_y = 0.0;
        outcome.sanitized = true;
    }

    bounce_depth(lantern, ctx.volume, physics.depth_bounce_damping);

    if ctx.volume.should_recycle(lantern.position) {
        if !lantern.position.is_finite() {
            outcome.sanitized = true;
        }
        pool::reset(lantern, false, ctx.volume, rng);
        outcome.recycled = true;
    }
    outcome
}

/// Clamp depth into the volume and reflect the depth velocity, damped.
pub fn bounce_depth(lantern: &mut LanternInstance, volume: &VisibleVolume, damping: f32) {
    let p = &mut lantern.position;
    let v = &mut lantern.velocity;
    if p.z < volume.z_min {
        p.z = volume.z_min;
        v.z = v.z.abs() * damping;
    } else if p.z > volume.z_max {
        p.z = volume.z_max;
        v.z = -v.z.abs() * damping;
    }
}
