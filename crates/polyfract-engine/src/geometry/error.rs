use thiserror::Error;

/// Rejected polygon input.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    #[error("a polygon needs at least {min} sides, got {sides}")]
    TooFewSides { sides: u32, min: u32 },

    #[error("polygon radius must be finite and positive, got {0}")]
    InvalidRadius(f32),

    #[error("polygon center ({x}, {y}) is not finite")]
    NonFiniteCenter { x: f32, y: f32 },
}
