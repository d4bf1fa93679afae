//! Shared lantern geometry.
//!
//! One rounded, flared box is built per simulation and shared read-only by
//! every lantern, together with the per-vertex `height_factor` and
//! `angle_factor` arrays used by the pattern and lighting code. Lanterns own
//! only their colour buffer and transform.

use crate::constants::*;
use glam::Vec3;
use std::f32::consts::PI;

/// Height ranges below this are treated as flat.
const MIN_HEIGHT_RANGE: f32 = 1e-6;
/// Height factor used when the mesh has no vertical extent.
const FLAT_HEIGHT_FACTOR: f32 = 0.5;

/// Interleaved vertex shared with the renderer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Dimensions of the lantern body.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeSpec {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    /// Rounded-box segments per corner; 0 builds a plain box.
    pub smoothness: u32,
    pub corner_radius: f32,
    /// Horizontal scale applied to every vertex above the centre line.
    pub flare: f32,
}

impl Default for ShapeSpec {
    fn default() -> Self {
        Self {
            width: LANTERN_WIDTH,
            height: LANTERN_HEIGHT,
            depth: LANTERN_DEPTH,
            smoothness: LANTERN_SMOOTHNESS,
            corner_radius: LANTERN_CORNER_RADIUS,
            flare: LANTERN_FLARE,
        }
    }
}

impl ShapeSpec {
    /// Bounding-sphere style radius used by the collision resolver.
    pub fn collision_radius(&self) -> f32 {
        (self.width * self.flare).max(self.height) * COLLISION_RADIUS_FACTOR
    }

    fn basket_extent(&self) -> Vec3 {
        Vec3::new(
            self.width * BASKET_WIDTH_RATIO,
            self.height * BASKET_HEIGHT_RATIO,
            self.depth * BASKET_DEPTH_RATIO,
        )
    }
}

#[derive(Clone, Debug)]
pub struct LanternGeometry {
    pub body: Vec<MeshVertex>,
    pub basket: Vec<MeshVertex>,
    /// 0 at the bottom of the body, 1 at the top.
    pub height_factor: Vec<f32>,
    /// 0..1 around the vertical axis.
    pub angle_factor: Vec<f32>,
    pub min_y: f32,
    pub max_y: f32,
    /// Basket centre in the lantern's local frame.
    pub basket_offset_y: f32,
    pub collision_radius: f32,
}

impl LanternGeometry {
    pub fn build(shape: &ShapeSpec) -> Self {
        let mut positions = rounded_box_positions(
            Vec3::new(shape.width, shape.height, shape.depth),
            shape.smoothness,
            shape.corner_radius,
        );
        for p in positions.iter_mut() {
            if p.y > 0.0 {
                p.x *= shape.flare;
                p.z *= shape.flare;
            }
        }
        let body = with_flat_normals(&positions);

        let (min_y, max_y) = positions
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.y), hi.max(p.y))
            });
        let (min_y, max_y) = if positions.is_empty() {
            (0.0, 0.0)
        } else {
            (min_y, max_y)
        };
        let range = max_y - min_y;
        let height_factor = positions
            .iter()
            .map(|p| {
                if range > MIN_HEIGHT_RANGE {
                    (p.y - min_y) / range
                } else {
                    FLAT_HEIGHT_FACTOR
                }
            })
            .collect();
        let angle_factor = positions
            .iter()
            .map(|p| (p.z.atan2(p.x) + PI) / (2.0 * PI))
            .collect();

        let basket_extent = shape.basket_extent();
        let basket = with_flat_normals(&rounded_box_positions(basket_extent, 0, 0.0));

        Self {
            body,
            basket,
            height_factor,
            angle_factor,
            min_y,
            max_y,
            basket_offset_y: min_y - basket_extent.y * BASKET_DROP_RATIO,
            collision_radius: shape.collision_radius(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.body.len()
    }
}

// Face basis (normal, u, v) with u x v == normal so triangles wind outward.
const FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::Y, Vec3::Z),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::Z, Vec3::X),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::Y, Vec3::X),
];

/// Non-indexed triangle list of a box with rounded edges.
///
/// A unit box is subdivided into `2 * smoothness + 1` cells per edge; every
/// vertex is then pushed to the nearest corner of the inner box and offset
/// along its rounded normal by the corner radius.
fn rounded_box_positions(extent: Vec3, smoothness: u32, radius: f32) -> Vec<Vec3> {
    let segments = smoothness * 2 + 1;
    let unit = unit_box_triangles(segments);
    let radius = radius.min(extent.min_element() / 2.0).max(0.0);
    if segments == 1 || radius <= 0.0 {
        return unit.into_iter().map(|p| p * extent).collect();
    }
    let inner = extent / 2.0 - Vec3::splat(radius);
    let half_segment = 0.5 / segments as f32;
    unit.into_iter()
        .map(|p| {
            let sign = Vec3::new(sign0(p.x), sign0(p.y), sign0(p.z));
            let normal = (p - sign * half_segment).normalize_or_zero();
            inner * sign + normal * radius
        })
        .collect()
}

fn unit_box_triangles(segments: u32) -> Vec<Vec3> {
    let n = segments.max(1);
    let mut out = Vec::with_capacity(6 * (n * n * 6) as usize);
    let step = 1.0 / n as f32;
    for (normal, u, v) in FACES {
        let at = |i: u32, j: u32| {
            normal * 0.5 + u * (i as f32 * step - 0.5) + v * (j as f32 * step - 0.5)
        };
        for i in 0..n {
            for j in 0..n {
                let (a, b, c, d) = (at(i, j), at(i + 1, j), at(i + 1, j + 1), at(i, j + 1));
                out.extend_from_slice(&[a, b, c, a, c, d]);
            }
        }
    }
    out
}

fn with_flat_normals(positions: &[Vec3]) -> Vec<MeshVertex> {
    let mut out = Vec::with_capacity(positions.len());
    for tri in positions.chunks_exact(3) {
        let normal = (tri[1] - tri[0])
            .cross(tri[2] - tri[0])
            .try_normalize()
            .unwrap_or(Vec3::Y);
        out.extend(tri.iter().map(|p| MeshVertex {
            position: p.to_array(),
            normal: normal.to_array(),
        }));
    }
    out
}

#[inline]
fn sign0(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
