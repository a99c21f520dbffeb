/// What the frame loop does after the surface refused a texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Lost or outdated surface was configured again; the next redraw can draw.
    Reconfigured,
    /// Timeout or backend hiccup; this redraw is dropped.
    SkipFrame,
    /// Out of memory; the run ends.
    Fatal,
}

impl SurfaceErrorAction {
    /// Whether the window runtime should stop after this error.
    #[inline]
    pub fn ends_run(self) -> bool {
        self == SurfaceErrorAction::Fatal
    }

    /// Whether the dropped frame has to be requested again.
    ///
    /// The runtime waits for events, so nothing else would redraw the canvas.
    #[inline]
    pub fn wants_redraw(self) -> bool {
        matches!(
            self,
            SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame
        )
    }
}
