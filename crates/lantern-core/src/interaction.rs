//! Pointer hover: projects lanterns to screen space and flags the ones near
//! the pointer.

use crate::lantern::LanternInstance;
use glam::{Mat4, Vec2};

/// Rate limiter for pointer-move evaluation. Times are in milliseconds.
#[derive(Clone, Debug)]
pub struct HoverThrottle {
    interval_ms: f64,
    last_ms: Option<f64>,
}

impl HoverThrottle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    /// Returns true (and records `now_ms`) when enough time has passed since
    /// the last accepted evaluation.
    pub fn should_evaluate(&mut self, now_ms: f64) -> bool {
        match self.last_ms {
            Some(last) if now_ms - last < self.interval_ms => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Clear every hover flag, then set it on each lantern whose projected
/// position lies within `radius` of `pointer_ndc`. Returns how many are hovered.
pub fn apply_hover(
    lanterns: &mut [LanternInstance],
    view_proj: &Mat4,
    pointer_ndc: Vec2,
    radius: f32,
) -> usize {
    let radius_sq = radius * radius;
    let mut hovered = 0;
    for lantern in lanterns.iter_mut() {
        let ndc = view_proj.project_point3(lantern.position).truncate();
        lantern.hovered = ndc.distance_squared(pointer_ndc) < radius_sq;
        if lantern.hovered {
            hovered += 1;
        }
    }
    hovered
}

pub fn clear_hover(lanterns: &mut [LanternInstance]) {
    for lantern in lanterns.iter_mut() {
        lantern.hovered = false;
    }
}
