use std::f32::consts::TAU;

use crate::coords::Vec2;

use super::{vertices_to_triangles, GeometryError, TriangleFan};

/// Smallest side count that encloses an area.
pub const MIN_SIDES: u32 = 3;

/// Validated description of a regular polygon.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PolygonSpec {
    center: Vec2,
    radius: f32,
    sides: u32,
}

impl PolygonSpec {
    pub fn new(center: Vec2, radius: f32, sides: u32) -> Result<Self, GeometryError> {
        if sides < MIN_SIDES {
            return Err(GeometryError::TooFewSides { sides, min: MIN_SIDES });
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(GeometryError::InvalidRadius(radius));
        }
        if !center.is_finite() {
            return Err(GeometryError::NonFiniteCenter { x: center.x, y: center.y });
        }
        Ok(Self { center, radius, sides })
    }

    /// Angle between consecutive vertices, in radians.
    #[inline]
    pub fn angle_step(&self) -> f32 {
        TAU / self.sides as f32
    }

    /// Outer ring, starting on +X and advancing by [`angle_step`](Self::angle_step).
    pub fn vertices(&self) -> Vec<Vec2> {
        let step = self.angle_step();
        (0..self.sides)
            .map(|i| self.center + Vec2::from_polar(self.radius, i as f32 * step))
            .collect()
    }

    pub fn triangle_fan(&self) -> TriangleFan {
        vertices_to_triangles(&self.vertices(), self.center)
    }
}

/// Returns the `sides` vertices of a regular polygon around `center`.
///
/// Vertex `i` sits at angle `i * 2π / sides` from +X. Angles grow toward +Y,
/// which is counter-clockwise in math orientation and clockwise on screen.
pub fn calculate_vertices(center: Vec2, radius: f32, sides: u32) -> Result<Vec<Vec2>, GeometryError> {
    PolygonSpec::new(center, radius, sides).map(|spec| spec.vertices())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const EPS: f32 = 1e-4;

    fn close(a: Vec2, b: Vec2) -> bool {
        a.distance(b) < EPS
    }

    // ── vertex ring ───────────────────────────────────────────────────────

    #[test]
    fn unit_square_hits_the_axes() {
        let v = calculate_vertices(Vec2::zero(), 1.0, 4).unwrap();
        let expected = [
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(-1.0, 0.0),
            Vec2::new(0.0, -1.0),
        ];
        assert_eq!(v.len(), 4);
        for (got, want) in v.iter().zip(expected) {
            assert!(close(*got, want), "{got:?} != {want:?}");
        }
    }

    #[rstest]
    #[case(3, 1.0)]
    #[case(4, 10.0)]
    #[case(6, 150.0)]
    #[case(7, 0.5)]
    #[case(12, 36.015)]
    #[case(64, 300.0)]
    fn ring_is_regular(#[case] sides: u32, #[case] radius: f32) {
        let center = Vec2::new(200.0, 200.0);
        let v = calculate_vertices(center, radius, sides).unwrap();
        assert_eq!(v.len(), sides as usize);

        let step = TAU / sides as f32;
        for (i, p) in v.iter().enumerate() {
            let d = p.distance(center);
            assert!((d - radius).abs() < EPS * radius.max(1.0), "vertex {i} at distance {d}");

            let offset = *p - center;
            let angle = offset.y.atan2(offset.x).rem_euclid(TAU);
            let expected = (i as f32 * step).rem_euclid(TAU);
            let diff = (angle - expected).abs();
            assert!(diff < 1e-3 || (TAU - diff) < 1e-3, "vertex {i} at angle {angle}");
        }
    }

    #[test]
    fn first_vertex_lies_on_positive_x() {
        let v = calculate_vertices(Vec2::new(5.0, 5.0), 2.0, 6).unwrap();
        assert!(close(v[0], Vec2::new(7.0, 5.0)));
    }

    // ── validation ────────────────────────────────────────────────────────

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    fn rejects_degenerate_side_counts(#[case] sides: u32) {
        assert_eq!(
            calculate_vertices(Vec2::zero(), 1.0, sides),
            Err(GeometryError::TooFewSides { sides, min: MIN_SIDES })
        );
    }

    #[rstest]
    #[case(0.0)]
    #[case(-3.0)]
    #[case(f32::INFINITY)]
    fn rejects_bad_radius(#[case] radius: f32) {
        assert_eq!(
            PolygonSpec::new(Vec2::zero(), radius, 6),
            Err(GeometryError::InvalidRadius(radius))
        );
    }

    #[test]
    fn rejects_nan_radius() {
        assert!(matches!(
            PolygonSpec::new(Vec2::zero(), f32::NAN, 6),
            Err(GeometryError::InvalidRadius(r)) if r.is_nan()
        ));
    }

    #[test]
    fn rejects_non_finite_center() {
        let err = PolygonSpec::new(Vec2::new(f32::INFINITY, 0.0), 1.0, 6).unwrap_err();
        assert!(matches!(err, GeometryError::NonFiniteCenter { .. }));
    }

    // ── fan ───────────────────────────────────────────────────────────────

    #[test]
    fn polygon_fan_matches_free_functions() {
        let center = Vec2::new(200.0, 200.0);
        let spec = PolygonSpec::new(center, 105.0, 6).unwrap();
        let direct = vertices_to_triangles(&calculate_vertices(center, 105.0, 6).unwrap(), center);
        assert_eq!(spec.triangle_fan(), direct);
        assert_eq!(spec.triangle_fan().triangle_count(), 6);
    }
}
