//! Paint model shared between the composer and renderers.

pub mod color;

pub use color::Color;
