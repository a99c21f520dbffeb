//! Nested polygon composition.
//!
//! Level 1 is the outermost polygon. Each following level shrinks the radius by
//! the scale factor and dims the color, until `levels` polygons have been drawn.

use polyfract_engine::coords::Vec2;
use polyfract_engine::geometry::{GeometryError, PolygonSpec};
use polyfract_engine::paint::Color;
use polyfract_engine::render::PolygonPainter;

use crate::config::FractalConfig;

/// Brightness of `level` out of `levels`: 1.0 at level 1, falling linearly to `1 / levels`.
pub fn intensity(level: u32, levels: u32) -> f32 {
    1.0 - level.saturating_sub(1) as f32 / levels.max(1) as f32
}

/// Layer color for a given intensity: pale cyan at full intensity, deeper blue below.
pub fn layer_color(intensity: f32) -> Color {
    Color::new(0.3 + intensity * 0.4, 0.6 + intensity * 0.4, 1.0, 0.8)
}

/// One polygon of the picture.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Layer {
    pub level: u32,
    pub radius: f32,
    pub color: Color,
}

/// Layers from the outermost inward; ends once `level` passes `levels`.
#[derive(Debug, Clone)]
pub struct Layers {
    level: u32,
    levels: u32,
    radius: f32,
    scale_factor: f32,
}

impl Layers {
    fn remaining(&self) -> u32 {
        if self.level > self.levels {
            0
        } else {
            self.levels - self.level + 1
        }
    }
}

impl Iterator for Layers {
    type Item = Layer;

    fn next(&mut self) -> Option<Layer> {
        if self.remaining() == 0 {
            return None;
        }

        let layer = Layer {
            level: self.level,
            radius: self.radius,
            color: layer_color(intensity(self.level, self.levels)),
        };

        self.radius *= self.scale_factor;
        // Overflow only happens on the last of u32::MAX levels.
        match self.level.checked_add(1) {
            Some(next) => self.level = next,
            None => self.levels = 0,
        }
        Some(layer)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.remaining() as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Layers {}

impl FractalConfig {
    pub fn layers(&self) -> Layers {
        Layers {
            level: 1,
            levels: self.levels,
            radius: self.initial_radius,
            scale_factor: self.scale_factor,
        }
    }
}

/// Draws every layer centered on `center`, outermost first.
///
/// Returns the number of polygons handed to `painter`.
pub fn compose<P>(config: &FractalConfig, center: Vec2, painter: &mut P) -> Result<usize, GeometryError>
where
    P: PolygonPainter + ?Sized,
{
    let mut drawn = 0;
    for layer in config.layers() {
        let fan = PolygonSpec::new(center, layer.radius, config.sides)?.triangle_fan();
        log::trace!(
            "level {}: radius {:.3}, {} triangles",
            layer.level,
            layer.radius,
            fan.triangle_count()
        );
        painter.draw_polygon(&fan, layer.color);
        drawn += 1;
    }
    Ok(drawn)
}
