//! Geometric predicates used by hit tests and collisions
//!
//! Oriented shapes are tested in their local frame: translate the point by the
//! shape's center, rotate by `-phi`, then check half-plane constraints. In the
//! local frame the shape's heading is the +x axis.

use glam::Vec2;

/// Squared Euclidean distance; avoids a square root in circle tests
#[inline]
pub fn distance_squared(p: Vec2, q: Vec2) -> f32 {
    (p - q).length_squared()
}

/// Express `point` in the frame of a shape centered at `center` with heading `phi`
#[inline]
pub fn to_local_frame(point: Vec2, center: Vec2, phi: f32) -> Vec2 {
    let d = point - center;
    let (sin, cos) = phi.sin_cos();
    Vec2::new(cos * d.x + sin * d.y, -sin * d.x + cos * d.y)
}

/// Constraint `normal · p <= offset` in a shape's local frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfPlane {
    pub normal: Vec2,
    pub offset: f32,
}

impl HalfPlane {
    pub const fn new(normal: Vec2, offset: f32) -> Self {
        Self { normal, offset }
    }

    #[inline]
    pub fn contains(&self, local: Vec2) -> bool {
        self.normal.dot(local) <= self.offset
    }
}

/// Half-planes of the isoceles triangle with base on the local y axis and its
/// far vertex at `(length, 0)`: `x >= 0`, `x/A + y/B <= 1`, `x/A - y/B <= 1`
pub fn isoceles_half_planes(length: f32, half_width: f32) -> [HalfPlane; 3] {
    [
        HalfPlane::new(Vec2::new(-1.0, 0.0), 0.0),
        HalfPlane::new(Vec2::new(1.0 / length, 1.0 / half_width), 1.0),
        HalfPlane::new(Vec2::new(1.0 / length, -1.0 / half_width), 1.0),
    ]
}

/// True iff `point` satisfies every constraint after the rigid transform
pub fn point_in_convex_local(point: Vec2, center: Vec2, phi: f32, planes: &[HalfPlane]) -> bool {
    let local = to_local_frame(point, center, phi);
    planes.iter().all(|plane| plane.contains(local))
}

/// Isoceles triangle containment (length `A`, half-width `B`)
pub fn point_in_isoceles(point: Vec2, center: Vec2, phi: f32, length: f32, half_width: f32) -> bool {
    point_in_convex_local(point, center, phi, &isoceles_half_planes(length, half_width))
}

/// Even-odd containment for a simple polygon given in world coordinates
pub fn point_in_polygon(point: Vec2, vertices: &[Vec2]) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[j];
        if (a.y > point.y) != (b.y > point.y) {
            let cross_x = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if point.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Squared distance from `point` to the segment `a`-`b`
pub fn segment_distance_squared(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-8 {
        return distance_squared(point, a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    distance_squared(point, a + ab * t)
}

/// Squared distance from `point` to the closest edge of a closed polygon
pub fn polygon_edge_distance_squared(point: Vec2, vertices: &[Vec2]) -> f32 {
    let n = vertices.len();
    (0..n)
        .map(|i| segment_distance_squared(point, vertices[i], vertices[(i + 1) % n]))
        .fold(f32::INFINITY, f32::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_distance_squared() {
        assert_eq!(distance_squared(Vec2::new(1.0, 2.0), Vec2::new(4.0, 6.0)), 25.0);
        assert_eq!(distance_squared(Vec2::ZERO, Vec2::ZERO), 0.0);
    }

    #[test]
    fn test_local_frame_rotates_both_axes() {
        // Heading straight down (+y): a point ahead of the shape maps onto +x
        let local = to_local_frame(Vec2::new(10.0, 15.0), Vec2::new(10.0, 5.0), FRAC_PI_2);
        assert!((local - Vec2::new(10.0, 0.0)).length() < 1e-5);

        // Point to the heading's left maps onto +y
        let local = to_local_frame(Vec2::new(0.0, 3.0), Vec2::ZERO, 0.0);
        assert!((local - Vec2::new(0.0, 3.0)).length() < 1e-6);
    }

    #[test]
    fn test_isoceles_contains_centroid_and_rejects_past_nose() {
        let (a, b) = (60.0, 25.0);
        let center = Vec2::new(300.0, 200.0);
        let phi = 1.0;
        let centroid = center + Vec2::from_angle(phi).rotate(Vec2::new(a / 3.0, 0.0));
        assert!(point_in_isoceles(centroid, center, phi, a, b));

        let past_nose = center + Vec2::from_angle(phi).rotate(Vec2::new(a + 0.01, 0.0));
        assert!(!point_in_isoceles(past_nose, center, phi, a, b));

        let behind = center + Vec2::from_angle(phi).rotate(Vec2::new(-1.0, 0.0));
        assert!(!point_in_isoceles(behind, center, phi, a, b));
    }

    #[test]
    fn test_isoceles_side_edges() {
        // Just inside / outside the upper slanted edge at x = A/2
        assert!(point_in_isoceles(Vec2::new(30.0, 12.0), Vec2::ZERO, 0.0, 60.0, 25.0));
        assert!(!point_in_isoceles(Vec2::new(30.0, 13.0), Vec2::ZERO, 0.0, 60.0, 25.0));
        assert!(!point_in_isoceles(Vec2::new(30.0, -13.0), Vec2::ZERO, 0.0, 60.0, 25.0));
    }

    #[test]
    fn test_point_in_polygon_square() {
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(Vec2::new(5.0, 5.0), &square));
        assert!(!point_in_polygon(Vec2::new(15.0, 5.0), &square));
        assert!(!point_in_polygon(Vec2::new(5.0, -0.1), &square));
        assert!(!point_in_polygon(Vec2::new(5.0, 5.0), &square[..2]));
    }

    #[test]
    fn test_point_in_polygon_concave() {
        // Arrow shape with a notch at the right
        let arrow = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(5.0, 5.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(Vec2::new(2.0, 5.0), &arrow));
        assert!(!point_in_polygon(Vec2::new(8.0, 5.0), &arrow));
    }

    #[test]
    fn test_segment_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert!((segment_distance_squared(Vec2::new(5.0, 3.0), a, b) - 9.0).abs() < 1e-5);
        assert!((segment_distance_squared(Vec2::new(-3.0, 4.0), a, b) - 25.0).abs() < 1e-5);
        assert!((segment_distance_squared(Vec2::new(2.0, 2.0), a, a) - 8.0).abs() < 1e-5);
    }

    #[test]
    fn test_polygon_edge_distance() {
        let tri = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)];
        assert!((polygon_edge_distance_squared(Vec2::new(-2.0, 5.0), &tri) - 4.0).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_centroid_always_inside(
            a in 0.5f32..500.0,
            b in 0.5f32..500.0,
            phi in -4.0 * PI..4.0 * PI,
            cx in -1000.0f32..1000.0,
            cy in -1000.0f32..1000.0,
        ) {
            let center = Vec2::new(cx, cy);
            let centroid = center + Vec2::from_angle(phi).rotate(Vec2::new(a / 3.0, 0.0));
            prop_assert!(point_in_isoceles(centroid, center, phi, a, b));
        }

        #[test]
        fn prop_beyond_nose_always_outside(
            a in 0.5f32..500.0,
            b in 0.5f32..500.0,
            eps in 0.01f32..100.0,
            phi in -PI..PI,
        ) {
            let center = Vec2::new(50.0, -20.0);
            let local_frame_point = Vec2::new(a + eps, 0.0);
            let point = center + Vec2::from_angle(phi).rotate(local_frame_point);
            prop_assert!(!point_in_isoceles(point, center, phi, a, b));
        }

        #[test]
        fn prop_local_frame_preserves_distance(
            px in -500.0f32..500.0,
            py in -500.0f32..500.0,
            phi in -PI..PI,
        ) {
            let p = Vec2::new(px, py);
            let local = to_local_frame(p, Vec2::ZERO, phi);
            prop_assert!((local.length() - p.length()).abs() < 1e-2);
        }
    }
}
