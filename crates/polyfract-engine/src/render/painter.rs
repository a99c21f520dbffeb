use crate::geometry::TriangleFan;
use crate::paint::Color;

/// Sink for filled polygons.
///
/// Each call is one draw: the fan is rasterized as a triangle list in a single
/// flat `color`, blended source-over onto what was drawn before it.
pub trait PolygonPainter {
    fn draw_polygon(&mut self, fan: &TriangleFan, color: Color);
}

impl<P: PolygonPainter + ?Sized> PolygonPainter for &mut P {
    #[inline]
    fn draw_polygon(&mut self, fan: &TriangleFan, color: Color) {
        (**self).draw_polygon(fan, color);
    }
}
