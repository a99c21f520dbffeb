//! Fractal parameters.

use thiserror::Error;
use winit::dpi::PhysicalSize;

use polyfract_engine::geometry::MIN_SIDES;

/// Parameters of the nested-polygon picture.
#[derive(Debug, Clone, PartialEq)]
pub struct FractalConfig {
    /// Side count of every polygon.
    pub sides: u32,
    /// Number of nested polygons drawn.
    pub levels: u32,
    /// Radius multiplier from one level to the next, in `(0, 1)`.
    pub scale_factor: f32,
    /// Radius of the outermost polygon, in pixels.
    pub initial_radius: f32,
    /// Canvas size in physical pixels.
    pub canvas: PhysicalSize<u32>,
}

impl Default for FractalConfig {
    fn default() -> Self {
        Self {
            sides: 6,
            levels: 5,
            scale_factor: 0.7,
            initial_radius: 150.0,
            canvas: PhysicalSize::new(400, 400),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("sides must be at least {min}, got {0}", min = MIN_SIDES)]
    TooFewSides(u32),

    #[error("levels must be at least 1")]
    NoLevels,

    #[error("scale factor must lie strictly between 0 and 1, got {0}")]
    ScaleFactorOutOfRange(f32),

    #[error("initial radius must be finite and positive, got {0}")]
    InvalidRadius(f32),

    #[error("canvas must have a non-zero size, got {width}x{height}")]
    EmptyCanvas { width: u32, height: u32 },
}

impl FractalConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sides < MIN_SIDES {
            return Err(ConfigError::TooFewSides(self.sides));
        }
        if self.levels == 0 {
            return Err(ConfigError::NoLevels);
        }
        if !(self.scale_factor > 0.0 && self.scale_factor < 1.0) {
            return Err(ConfigError::ScaleFactorOutOfRange(self.scale_factor));
        }
        if !self.initial_radius.is_finite() || self.initial_radius <= 0.0 {
            return Err(ConfigError::InvalidRadius(self.initial_radius));
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ConfigError::EmptyCanvas {
                width: self.canvas.width,
                height: self.canvas.height,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults_are_valid() {
        let config = FractalConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.sides, 6);
        assert_eq!(config.levels, 5);
        assert_eq!(config.scale_factor, 0.7);
        assert_eq!(config.initial_radius, 150.0);
        assert_eq!(config.canvas, PhysicalSize::new(400, 400));
    }

    #[test]
    fn rejects_degenerate_polygons() {
        let config = FractalConfig { sides: 2, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::TooFewSides(2)));
    }

    #[test]
    fn rejects_zero_levels() {
        let config = FractalConfig { levels: 0, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::NoLevels));
    }

    #[rstest]
    #[case(0.0)]
    #[case(1.0)]
    #[case(1.5)]
    #[case(-0.7)]
    fn rejects_non_shrinking_scale(#[case] scale_factor: f32) {
        let config = FractalConfig { scale_factor, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::ScaleFactorOutOfRange(scale_factor)));
    }

    #[test]
    fn rejects_nan_scale() {
        let config = FractalConfig { scale_factor: f32::NAN, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::ScaleFactorOutOfRange(_))));
    }

    #[rstest]
    #[case(0.0)]
    #[case(-150.0)]
    #[case(f32::INFINITY)]
    fn rejects_bad_radius(#[case] initial_radius: f32) {
        let config = FractalConfig { initial_radius, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::InvalidRadius(initial_radius)));
    }

    #[test]
    fn rejects_empty_canvas() {
        let config = FractalConfig { canvas: PhysicalSize::new(400, 0), ..Default::default() };
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyCanvas { width: 400, height: 0 })
        );
    }
}
