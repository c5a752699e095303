//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::FRAC_PI_2;

use crate::polar_to_cartesian;

/// World-space corners of an isoceles triangle whose base midpoint is `pos`.
///
/// Nose first, then the two base corners.
pub fn triangle_outline(pos: Vec2, phi: f32, half_length: f32, half_width: f32) -> [Vec2; 3] {
    [
        pos + polar_to_cartesian(half_length, phi),
        pos + polar_to_cartesian(half_width, phi + FRAC_PI_2),
        pos + polar_to_cartesian(half_width, phi - FRAC_PI_2),
    ]
}

/// Rotate local-frame vertices by `phi` and translate them to `pos`
pub fn transform_outline(local: &[Vec2], pos: Vec2, phi: f32) -> Vec<Vec2> {
    let rot = Vec2::from_angle(phi);
    local.iter().map(|v| pos + rot.rotate(*v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_outline_axis_aligned() {
        let [nose, left, right] = triangle_outline(Vec2::new(10.0, 10.0), 0.0, 60.0, 25.0);
        assert!((nose - Vec2::new(70.0, 10.0)).length() < 1e-4);
        assert!((left - Vec2::new(10.0, 35.0)).length() < 1e-4);
        assert!((right - Vec2::new(10.0, -15.0)).length() < 1e-4);
    }

    #[test]
    fn test_transform_outline_quarter_turn() {
        let out = transform_outline(&[Vec2::new(1.0, 0.0)], Vec2::new(5.0, 5.0), FRAC_PI_2);
        assert!((out[0] - Vec2::new(5.0, 6.0)).length() < 1e-5);
    }
}
