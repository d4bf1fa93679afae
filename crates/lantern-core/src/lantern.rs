//! A single simulated lantern and its colour state.

use crate::color::Hsl;
use crate::pattern::Pattern;
use glam::{Mat4, Vec3};

/// Lateral oscillation, fixed at spawn.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Wobble {
    pub amp_x: f32,
    pub amp_z: f32,
    pub speed_x: f32,
    pub speed_z: f32,
    pub phase_x: f32,
    pub phase_z: f32,
}

impl Wobble {
    /// Lateral forcing (x, z) at simulation time `t` seconds.
    #[inline]
    pub fn force(&self, t: f32) -> (f32, f32) {
        (
            (t * self.speed_x + self.phase_x).sin() * self.amp_x,
            (t * self.speed_z + self.phase_z).cos() * self.amp_z,
        )
    }
}

#[derive(Clone, Debug)]
pub struct LanternInstance {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Rotation about the vertical axis, radians.
    pub rotation_y: f32,
    pub angular_velocity_y: f32,
    /// Lit intensity, always within `[0, 1]`.
    pub buoyancy: f32,
    pub decay_rate: f32,
    pub wobble: Wobble,
    /// Written by the interaction layer, read by the integrator.
    pub hovered: bool,
    pub pattern: Pattern,
    /// Unlit pattern colours, `vertex_count * 3` floats. Never mutated after spawn.
    pub base_colors: Vec<f32>,
    /// Displayed colours, same layout as `base_colors`.
    pub colors: Vec<f32>,
    /// Last applied brightness step; `None` forces the next recolor.
    pub last_brightness_step: Option<u32>,
    /// Set whenever `colors` changed and the renderer has not picked it up.
    pub colors_dirty: bool,
    pub emissive_intensity: f32,
}

impl LanternInstance {
    /// Quantized brightness for the current buoyancy.
    #[inline]
    pub fn brightness_step(&self, steps: u32) -> u32 {
        (self.buoyancy.clamp(0.0, 1.0) * steps as f32).floor() as u32
    }

    /// Recompute `colors` if the brightness step changed since the last call.
    ///
    /// Each vertex starts from its base colour; lit lanterns gain lightness
    /// towards the bottom of the body (`1 - height`), as if a flame sat at the
    /// base. Returns whether the buffer was rewritten.
    pub fn refresh_colors(&mut self, steps: u32, lightness_gain: f32, height_factor: &[f32]) -> bool {
        let step = self.brightness_step(steps);
        if self.last_brightness_step == Some(step) {
            return false;
        }
        self.last_brightness_step = Some(step);

        let lit = step as f32 / steps.max(1) as f32;
        for ((out, base), h) in self
            .colors
            .chunks_exact_mut(3)
            .zip(self.base_colors.chunks_exact(3))
            .zip(height_factor)
        {
            if step == 0 {
                out.copy_from_slice(base);
                continue;
            }
            let mut hsl = Hsl::from_linear(Vec3::from_slice(base));
            hsl.l = (hsl.l + lightness_gain * lit * (1.0 - h)).min(1.0);
            out.copy_from_slice(&hsl.to_linear().to_array());
        }
        self.colors_dirty = true;
        true
    }

    /// Local-to-world transform: spin about Y, then translate.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_rotation_y(self.rotation_y)
    }

    #[inline]
    pub fn update_emissive(&mut self, base: f32, gain: f32) {
        self.emissive_intensity = base + gain * self.buoyancy;
    }
}
