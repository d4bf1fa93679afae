//! HSL helpers.
//!
//! Lantern palettes and the lit gradient are expressed in hue/saturation/
//! lightness over sRGB, the same space as the hex literals, while vertex
//! buffers hold linear RGB. Hue wraps, saturation and lightness clamp to
//! `[0, 1]`.

use glam::Vec3;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }

    /// Gamma-encoded (sRGB) components.
    pub fn to_rgb(self) -> Vec3 {
        hsl_to_rgb(self.h, self.s, self.l)
    }

    /// Linear RGB, ready for a vertex buffer.
    pub fn to_linear(self) -> Vec3 {
        let rgb = self.to_rgb();
        Vec3::new(srgb_to_linear(rgb.x), srgb_to_linear(rgb.y), srgb_to_linear(rgb.z))
    }

    pub fn from_linear(rgb: Vec3) -> Self {
        rgb_to_hsl(Vec3::new(
            linear_to_srgb(rgb.x),
            linear_to_srgb(rgb.y),
            linear_to_srgb(rgb.z),
        ))
    }

    /// Shift each component and renormalize (hue wraps, the rest clamps).
    pub fn offset(self, dh: f32, ds: f32, dl: f32) -> Self {
        Self {
            h: (self.h + dh).rem_euclid(1.0),
            s: (self.s + ds).clamp(0.0, 1.0),
            l: (self.l + dl).clamp(0.0, 1.0),
        }
    }
}

pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Vec3 {
    let h = h.rem_euclid(1.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);
    if s == 0.0 {
        return Vec3::splat(l);
    }
    let p = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let q = 2.0 * l - p;
    Vec3::new(
        hue_to_channel(q, p, h + 1.0 / 3.0),
        hue_to_channel(q, p, h),
        hue_to_channel(q, p, h - 1.0 / 3.0),
    )
}

#[inline]
fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

pub fn rgb_to_hsl(rgb: Vec3) -> Hsl {
    let (r, g, b) = (rgb.x, rgb.y, rgb.z);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (min + max) / 2.0;
    if min == max {
        return Hsl::new(0.0, 0.0, lightness);
    }
    let delta = max - min;
    let saturation = if lightness <= 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };
    let hue = if max == r {
        (g - b) / delta + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    Hsl::new(hue / 6.0, saturation, lightness)
}

/// Decode a `0xRRGGBB` sRGB literal into linear RGB.
pub fn from_hex_srgb(hex: u32) -> Vec3 {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    Vec3::new(channel(16), channel(8), channel(0))
}

#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.077_399_38
    } else {
        (c * 0.947_867_3 + 0.052_132_7).powf(2.4)
    }
}

#[inline]
pub fn linear_to_srgb(c: f32) -> f32 {
    if c < 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(0.416_666_66) - 0.055
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-4
    }

    #[test]
    fn primaries_round_trip_through_hsl() {
        for rgb in [Vec3::X, Vec3::Y, Vec3::Z, Vec3::new(0.2, 0.4, 0.6)] {
            let hsl = rgb_to_hsl(rgb);
            assert!(close(hsl.to_rgb(), rgb), "{rgb:?} -> {hsl:?}");
        }
    }

    #[test]
    fn offset_wraps_hue_and_clamps_lightness() {
        let c = Hsl::new(0.98, 0.97, 0.95).offset(0.05, 0.08, 0.10);
        assert!((c.h - 0.03).abs() < 1e-5);
        assert_eq!(c.s, 1.0);
        assert_eq!(c.l, 1.0);
    }

    #[test]
    fn grey_has_no_saturation() {
        let hsl = rgb_to_hsl(Vec3::splat(0.3));
        assert_eq!(hsl.s, 0.0);
        assert!((hsl.l - 0.3).abs() < 1e-6);
    }

    #[test]
    fn hex_decodes_to_linear() {
        assert!(close(from_hex_srgb(0xffffff), Vec3::ONE));
        assert!(close(from_hex_srgb(0x000000), Vec3::ZERO));
        let mid = from_hex_srgb(0x808080);
        assert!(mid.x > 0.2 && mid.x < 0.23);
    }

    #[test]
    fn hsl_and_hex_agree_in_linear_space() {
        // hsl(0, 100%, 35%) is sRGB (0.7, 0, 0), #b30000 once rounded to bytes
        let from_hsl = Hsl::new(0.0, 1.0, 0.35).to_linear();
        assert!(close(from_hsl, Vec3::new(srgb_to_linear(0.7), 0.0, 0.0)));
        assert!((from_hsl - from_hex_srgb(0xb30000)).abs().max_element() < 5e-3);
        assert!(from_hsl.x < 0.46, "{from_hsl:?}");
        let teal = Hsl::new(0.5, 1.0, 0.25).to_linear();
        assert!((teal - from_hex_srgb(0x008080)).abs().max_element() < 5e-3);
    }

    #[test]
    fn linear_round_trips_through_hsl() {
        let hsl = Hsl::new(0.7, 0.8, 0.2);
        let back = Hsl::from_linear(hsl.to_linear());
        assert!((back.h - hsl.h).abs() < 1e-4);
        assert!((back.s - hsl.s).abs() < 1e-4);
        assert!((back.l - hsl.l).abs() < 1e-4);
    }
}
