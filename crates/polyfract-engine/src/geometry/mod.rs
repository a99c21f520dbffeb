//! Regular polygon geometry.
//!
//! Polygons are produced in canvas pixels and decomposed into triangle fans so
//! they can be rasterized with a plain triangle-list pipeline.

mod error;
mod fan;
mod polygon;

pub use error::GeometryError;
pub use fan::{vertices_to_triangles, TriangleFan};
pub use polygon::{calculate_vertices, PolygonSpec, MIN_SIDES};
