//! Camera and the visible volume derived from it.
//!
//! The visible volume drives every spawn and recycle decision, so it is
//! recomputed whenever the container aspect changes.

use crate::constants::*;
use crate::params::BoundsParams;
use glam::{Mat4, Vec2, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Fixed hero camera looking straight down -Z at the lantern field.
    pub fn hero(aspect: f32) -> Self {
        Self {
            eye: Vec3::from(CAMERA_EYE),
            target: Vec3::from(CAMERA_TARGET),
            up: Vec3::Y,
            aspect: sanitize_aspect(aspect),
            fovy_radians: CAMERA_FOV_Y_DEG.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = sanitize_aspect(aspect);
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a world-space point to normalized device coordinates (x, y in -1..1).
    pub fn project_ndc(&self, world: Vec3) -> Vec2 {
        self.view_proj().project_point3(world).truncate()
    }
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

/// World-space bands used for spawning, recycling and depth bouncing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibleVolume {
    pub y_visible_min: f32,
    pub y_visible_max: f32,
    pub y_spawn_top: f32,
    pub y_off_bottom: f32,
    /// Respawned lanterns start between this and `y_spawn_top`.
    pub y_respawn_min: f32,
    /// Half-width of the visible band at the target plane.
    pub x_visible: f32,
    pub x_off: f32,
    pub z_min: f32,
    pub z_max: f32,
}

impl VisibleVolume {
    pub fn from_camera(camera: &Camera, bounds: &BoundsParams) -> Self {
        let dist = camera.eye.distance(camera.target);
        let v_half = (camera.fovy_radians / 2.0).tan() * dist;
        let center_y = camera.target.y;
        let y_visible_min = center_y - v_half;
        let y_visible_max = center_y + v_half;
        let x_visible = v_half * camera.aspect;
        Self {
            y_visible_min,
            y_visible_max,
            y_spawn_top: y_visible_max + bounds.spawn_top_margin,
            y_off_bottom: y_visible_min - bounds.off_bottom_margin,
            y_respawn_min: y_visible_max + bounds.respawn_band_offset,
            x_visible,
            x_off: x_visible * bounds.x_recycle_factor,
            z_min: bounds.z_min,
            z_max: bounds.z_max,
        }
    }

    /// True when a lantern at `p` has drifted out of the recyclable band.
    /// Depth is not checked; it bounces instead.
    pub fn should_recycle(&self, p: Vec3) -> bool {
        !p.is_finite()
            || p.y < self.y_off_bottom
            || p.y > self.y_spawn_top
            || p.x < -self.x_off
            || p.x > self.x_off
    }
}
