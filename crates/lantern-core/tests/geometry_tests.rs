use lantern_core::{LanternGeometry, ShapeSpec};

#[test]
fn default_body_has_expected_vertex_count() {
    let geometry = LanternGeometry::build(&ShapeSpec::default());
    // 7 segments per edge, 6 faces, 2 triangles per cell
    assert_eq!(geometry.vertex_count(), 7 * 7 * 6 * 6);
    assert_eq!(geometry.height_factor.len(), geometry.vertex_count());
    assert_eq!(geometry.angle_factor.len(), geometry.vertex_count());
}

#[test]
fn height_and_angle_factors_are_normalized() {
    let geometry = LanternGeometry::build(&ShapeSpec::default());
    let lo = geometry.height_factor.iter().cloned().fold(f32::INFINITY, f32::min);
    let hi = geometry.height_factor.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    assert!(lo.abs() < 1e-6);
    assert!((hi - 1.0).abs() < 1e-6);
    assert!(geometry
        .angle_factor
        .iter()
        .all(|a| (0.0..=1.0).contains(a)));
}

#[test]
fn upper_half_is_flared() {
    let geometry = LanternGeometry::build(&ShapeSpec::default());
    let widest = |upper: bool| {
        geometry
            .body
            .iter()
            .filter(|v| (v.position[1] > 0.0) == upper)
            .map(|v| v.position[0].abs())
            .fold(0.0f32, f32::max)
    };
    let top = widest(true);
    let bottom = widest(false);
    assert!((top / bottom - 1.3).abs() < 1e-3, "top {top} bottom {bottom}");
}

#[test]
fn normals_are_unit_length() {
    let geometry = LanternGeometry::build(&ShapeSpec::default());
    for v in geometry.body.iter().chain(&geometry.basket) {
        let n = glam::Vec3::from(v.normal);
        assert!((n.length() - 1.0).abs() < 1e-4);
    }
}

#[test]
fn zero_height_falls_back_to_constant_height_factor() {
    let shape = ShapeSpec {
        height: 0.0,
        ..ShapeSpec::default()
    };
    let geometry = LanternGeometry::build(&shape);
    assert!(geometry.vertex_count() > 0);
    assert!(geometry.height_factor.iter().all(|h| *h == 0.5));
    assert!(geometry.angle_factor.iter().all(|a| a.is_finite()));
}

#[test]
fn basket_hangs_below_the_body() {
    let geometry = LanternGeometry::build(&ShapeSpec::default());
    assert_eq!(geometry.basket.len(), 36);
    assert!(geometry.basket_offset_y < geometry.min_y);
    assert!((geometry.collision_radius - 0.35).abs() < 1e-6);
}
