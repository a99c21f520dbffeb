//! polyfract engine crate.
//!
//! Platform + GPU runtime for drawing flat-colored polygons on a single canvas
//! window: device and surface management, the event loop, polygon geometry and
//! the shader program / polygon renderer pair.

pub mod core;
pub mod device;
pub mod window;

pub mod coords;
pub mod geometry;
pub mod logging;
pub mod paint;
pub mod render;
