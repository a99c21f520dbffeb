use super::Vec2;

/// Canvas size in physical pixels.
///
/// This is the basis the vertex shader divides by when mapping pixel positions
/// to clip space.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn from_physical(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width as f32, size.height as f32)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Center of the canvas in pixels.
    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Resolution as uploaded to shaders, clamped so a minimized surface never divides by zero.
    #[inline]
    pub fn resolution(self) -> [f32; 2] {
        [self.width.max(1.0), self.height.max(1.0)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_of_square_canvas() {
        assert_eq!(Viewport::new(400.0, 400.0).center(), Vec2::new(200.0, 200.0));
    }

    #[test]
    fn zero_area_is_invalid() {
        assert!(!Viewport::new(0.0, 300.0).is_valid());
        assert!(!Viewport::default().is_valid());
        assert!(Viewport::new(1.0, 1.0).is_valid());
    }

    #[test]
    fn resolution_never_zero() {
        assert_eq!(Viewport::default().resolution(), [1.0, 1.0]);
        assert_eq!(Viewport::new(640.0, 480.0).resolution(), [640.0, 480.0]);
    }

    #[test]
    fn from_physical_copies_dimensions() {
        let vp = Viewport::from_physical(winit::dpi::PhysicalSize::new(800, 600));
        assert_eq!(vp, Viewport::new(800.0, 600.0));
    }
}
