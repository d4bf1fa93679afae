use glam::Vec2;

/// Map a pointer position in client pixels to normalized device coordinates
/// over the rectangle at `origin` with `size`. `y` points up.
/// Returns `None` for an empty rectangle.
#[inline]
pub fn client_to_ndc(client: Vec2, origin: Vec2, size: Vec2) -> Option<Vec2> {
    if !(size.x > 0.0 && size.y > 0.0) {
        return None;
    }
    let uv = (client - origin) / size;
    Some(Vec2::new(uv.x * 2.0 - 1.0, 1.0 - uv.y * 2.0))
}

/// First usable size among the bounding rectangle and the client box,
/// otherwise `fallback`.
#[inline]
pub fn pick_container_size(rect: (f32, f32), client: (f32, f32), fallback: (f32, f32)) -> (f32, f32) {
    let usable = |(w, h): (f32, f32)| w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0;
    if usable(rect) {
        rect
    } else if usable(client) {
        client
    } else {
        fallback
    }
}

/// Canvas backing store size for a CSS size and pixel ratio, at least 1x1.
#[inline]
pub fn backing_size(css_width: f32, css_height: f32, pixel_ratio: f32) -> (u32, u32) {
    let px = |css: f32| ((css * pixel_ratio).floor().max(1.0)) as u32;
    (px(css_width), px(css_height))
}

/// Seed for the simulation RNG from a uniform `[0, 1)` sample.
#[inline]
pub fn seed_from_unit(sample: f64) -> u64 {
    (sample.clamp(0.0, 1.0) * (1u64 << 53) as f64) as u64
}
