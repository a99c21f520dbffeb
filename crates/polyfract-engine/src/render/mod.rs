//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (pipelines, buffers) and record draws into a
//! frame's command encoder via wgpu.
//!
//! Convention:
//! - CPU geometry is in canvas pixels (top-left origin, +Y down).
//! - The vertex shader converts to clip space using a resolution uniform.

mod ctx;
mod painter;
mod polygon;
mod program;

pub use ctx::{RenderCtx, RenderTarget};
pub(crate) use ctx::begin_color_pass;
pub use painter::PolygonPainter;
pub use polygon::{PolygonRenderer, POSITION_LOCATION};
pub use program::{ProgramInterface, ShaderError, ShaderProgram, ShaderSources, Stage};
