use crate::coords::Vec2;

/// Triangle-list decomposition of a convex polygon around its center.
///
/// Every consecutive group of three vertices is one triangle, and each triangle
/// starts at the center.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleFan {
    vertices: Vec<Vec2>,
}

impl TriangleFan {
    /// Flat vertex list, three per triangle.
    #[inline]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec2; 3]> + '_ {
        self.vertices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}

/// Fans a vertex ring into triangles sharing `center`.
///
/// Triangle `i` is `(center, ring[i], ring[(i + 1) % n])`, so the last triangle
/// closes the ring back to the first vertex.
pub fn vertices_to_triangles(ring: &[Vec2], center: Vec2) -> TriangleFan {
    let n = ring.len();
    let mut vertices = Vec::with_capacity(n * 3);
    for (i, &current) in ring.iter().enumerate() {
        vertices.extend_from_slice(&[center, current, ring[(i + 1) % n]]);
    }
    TriangleFan { vertices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ring(n: usize) -> Vec<Vec2> {
        (0..n).map(|i| Vec2::new(i as f32, (i * i) as f32)).collect()
    }

    #[rstest]
    #[case(3)]
    #[case(4)]
    #[case(6)]
    #[case(17)]
    fn one_triangle_per_edge(#[case] n: usize) {
        let center = Vec2::new(-1.0, 2.5);
        let fan = vertices_to_triangles(&ring(n), center);
        assert_eq!(fan.triangle_count(), n);
        assert_eq!(fan.vertex_count(), 3 * n);
        assert!(fan.triangles().all(|[c, _, _]| c == center));
    }

    #[test]
    fn last_triangle_wraps_to_first_vertex() {
        let r = ring(5);
        let fan = vertices_to_triangles(&r, Vec2::zero());
        let last = fan.triangles().last().unwrap();
        assert_eq!(last, [Vec2::zero(), r[4], r[0]]);
    }

    #[test]
    fn consecutive_triangles_share_an_edge() {
        let r = ring(6);
        let fan = vertices_to_triangles(&r, Vec2::zero());
        let tris: Vec<_> = fan.triangles().collect();
        for pair in tris.windows(2) {
            assert_eq!(pair[0][2], pair[1][1]);
        }
    }

    #[test]
    fn empty_ring_gives_empty_fan() {
        let fan = vertices_to_triangles(&[], Vec2::zero());
        assert!(fan.is_empty());
        assert_eq!(fan.triangle_count(), 0);
    }
}
