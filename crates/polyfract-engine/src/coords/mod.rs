//! Coordinate types shared by geometry and renderers.
//!
//! Canonical CPU space is canvas pixels:
//! - origin top-left
//! - +X right, +Y down
//!
//! Renderers convert to clip space in shaders using a resolution uniform.

mod vec2;
mod viewport;

pub use vec2::Vec2;
pub use viewport::Viewport;
