//! Per-lantern palette and tiling.

use crate::color::Hsl;
use crate::constants::*;
use crate::geometry::LanternGeometry;
use glam::Vec3;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternKind {
    Checker,
    Horizontal,
    Diagonal,
}

impl PatternKind {
    pub const ALL: [PatternKind; 3] = [Self::Checker, Self::Horizontal, Self::Diagonal];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Fixed at spawn and never mutated afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    pub kind: PatternKind,
    pub palette: [Vec3; 3],
    pub stripes: u32,
    pub cells_y: u32,
    pub cells_a: u32,
}

impl Pattern {
    pub fn new(kind: PatternKind, base: Hsl) -> Self {
        Self {
            kind,
            palette: create_palette(base),
            stripes: PATTERN_STRIPES,
            cells_y: PATTERN_CELLS_Y,
            cells_a: PATTERN_CELLS_A,
        }
    }

    /// Palette index for a vertex at the given height/angle factors.
    pub fn classify(&self, height: f32, angle: f32) -> usize {
        let len = self.palette.len() as i64;
        let idx = match self.kind {
            PatternKind::Checker => {
                let iy = (height * self.cells_y as f32).floor() as i64;
                let ia = (angle * self.cells_a as f32).floor() as i64;
                iy + ia
            }
            PatternKind::Horizontal => (height * self.stripes as f32).floor() as i64,
            PatternKind::Diagonal => ((height + angle) * self.stripes as f32).floor() as i64,
        };
        idx.rem_euclid(len) as usize
    }

    /// Unlit per-vertex RGB for the whole body, `vertex_count * 3` floats.
    pub fn base_colors(&self, geometry: &LanternGeometry) -> Vec<f32> {
        let mut out = Vec::with_capacity(geometry.vertex_count() * 3);
        for (h, a) in geometry.height_factor.iter().zip(&geometry.angle_factor) {
            out.extend_from_slice(&self.palette[self.classify(*h, *a)].to_array());
        }
        out
    }
}

/// Base colour plus a brighter and a darker sibling, in linear RGB.
pub fn create_palette(base: Hsl) -> [Vec3; 3] {
    let [bh, bs, bl] = PALETTE_BRIGHT_OFFSET;
    let [dh, ds, dl] = PALETTE_DARK_OFFSET;
    [
        base.to_linear(),
        base.offset(bh, bs, bl).to_linear(),
        base.offset(dh, ds, dl).to_linear(),
    ]
}

/// Random hue with the deep, dark jewel tone used for unlit lanterns.
pub fn random_base_color<R: Rng + ?Sized>(rng: &mut R) -> Hsl {
    Hsl::new(
        rng.gen::<f32>(),
        BASE_SATURATION_MIN + rng.gen::<f32>() * BASE_SATURATION_SPAN,
        BASE_LIGHTNESS_MIN + rng.gen::<f32>() * BASE_LIGHTNESS_SPAN,
    )
}
