//! Lantern pool: spawning, resetting and recycling in place.
//!
//! The pool is filled once at start-up. Recycling overwrites an instance's
//! kinematic state without reallocating its colour buffers.

use crate::camera::VisibleVolume;
use crate::geometry::LanternGeometry;
use crate::lantern::{LanternInstance, Wobble};
use crate::params::SimParams;
use crate::pattern::{random_base_color, Pattern, PatternKind};
use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;
use std::sync::Arc;

pub struct LanternPool {
    geometry: Arc<LanternGeometry>,
    lanterns: Vec<LanternInstance>,
}

impl LanternPool {
    pub fn new(geometry: Arc<LanternGeometry>) -> Self {
        Self {
            geometry,
            lanterns: Vec::new(),
        }
    }

    pub fn populate<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        params: &SimParams,
        volume: &VisibleVolume,
        rng: &mut R,
    ) {
        self.lanterns.reserve(count);
        for _ in 0..count {
            self.spawn(true, params, volume, rng);
        }
    }

    /// Create one lantern with a fresh pattern and kinematic state; returns its index.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        initial: bool,
        params: &SimParams,
        volume: &VisibleVolume,
        rng: &mut R,
    ) -> usize {
        let physics = &params.physics;
        let pattern = Pattern::new(PatternKind::random(rng), random_base_color(rng));
        let base_colors = pattern.base_colors(&self.geometry);
        let mut lantern = LanternInstance {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            rotation_y: 0.0,
            angular_velocity_y: spread(rng, 0.6),
            buoyancy: 0.0,
            decay_rate: physics.decay_rate
                * uniform(rng, physics.decay_scale_min, physics.decay_scale_max),
            wobble: Wobble {
                amp_x: uniform(rng, 0.4, 1.0),
                amp_z: uniform(rng, 0.3, 0.8),
                speed_x: uniform(rng, 0.4, 1.0),
                speed_z: uniform(rng, 0.4, 1.0),
                phase_x: rng.gen::<f32>() * TAU,
                phase_z: rng.gen::<f32>() * TAU,
            },
            hovered: false,
            pattern,
            colors: base_colors.clone(),
            base_colors,
            last_brightness_step: None,
            colors_dirty: true,
            emissive_intensity: params.look.emissive_base,
        };
        reset(&mut lantern, initial, volume, rng);
        self.lanterns.push(lantern);
        self.lanterns.len() - 1
    }

    pub fn geometry(&self) -> &Arc<LanternGeometry> {
        &self.geometry
    }

    pub fn lanterns(&self) -> &[LanternInstance] {
        &self.lanterns
    }

    pub fn lanterns_mut(&mut self) -> &mut [LanternInstance] {
        &mut self.lanterns
    }

    pub fn len(&self) -> usize {
        self.lanterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanterns.is_empty()
    }
}

/// Place a lantern at a random spot and give it fresh kinematic state.
///
/// Initial lanterns are scattered over the whole vertical band; recycled ones
/// enter from just above the visible top so they stream in like the rest.
pub fn reset<R: Rng + ?Sized>(
    lantern: &mut LanternInstance,
    initial: bool,
    volume: &VisibleVolume,
    rng: &mut R,
) {
    let y_min = if initial {
        volume.y_off_bottom
    } else {
        volume.y_respawn_min
    };
    lantern.position = Vec3::new(
        spread(rng, volume.x_visible * 2.0),
        uniform(rng, y_min, volume.y_spawn_top),
        uniform(rng, volume.z_min, volume.z_max),
    );
    lantern.velocity = Vec3::new(spread(rng, 0.6), uniform(rng, -0.9, -0.1), spread(rng, 0.6));
    lantern.buoyancy = rng.gen::<f32>() * rng.gen::<f32>() * 0.4;
    lantern.hovered = false;
    lantern.last_brightness_step = None;
}

/// Uniform in `[lo, hi)`, or `lo` when the range is empty.
#[inline]
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        lo + (hi - lo) * rng.gen::<f32>()
    } else {
        lo
    }
}

/// Uniform in `[-range / 2, range / 2)`.
#[inline]
fn spread<R: Rng + ?Sized>(rng: &mut R, range: f32) -> f32 {
    range * (rng.gen::<f32>() - 0.5)
}
