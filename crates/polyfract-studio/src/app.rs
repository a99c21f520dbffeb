//! Window application drawing the fractal.

use polyfract_engine::core::{App, AppControl, FrameCtx};
use polyfract_engine::paint::Color;
use polyfract_engine::render::{PolygonRenderer, ShaderSources};
use polyfract_engine::window::RuntimeCtx;

use crate::composer::compose;
use crate::config::FractalConfig;

/// Draws the same nested-polygon frame on every redraw request.
pub struct FractalApp {
    config: FractalConfig,
    renderer: PolygonRenderer,
    frames: u64,
}

impl FractalApp {
    pub fn new(config: FractalConfig, shaders: ShaderSources) -> Self {
        Self {
            config,
            renderer: PolygonRenderer::new(shaders),
            frames: 0,
        }
    }
}

impl App for FractalApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let config = &self.config;
        let renderer = &mut self.renderer;
        let mut outcome: anyhow::Result<usize> = Ok(0);

        let control = ctx.render(Color::black(), |rctx, target| {
            let center = rctx.viewport.center();
            outcome = compose(config, center, renderer)
                .map_err(anyhow::Error::from)
                .and_then(|_| renderer.render(rctx, target).map_err(anyhow::Error::from));
        });

        settle(outcome, control, ctx.runtime, &mut self.frames)
    }
}

/// Folds the result of one draw into the runtime.
///
/// A failed draw is handed to the runtime so the process exits with the error.
fn settle(
    outcome: anyhow::Result<usize>,
    control: AppControl,
    runtime: &mut RuntimeCtx,
    frames: &mut u64,
) -> AppControl {
    match outcome {
        Ok(draws) => {
            *frames += 1;
            log::debug!("frame {frames}: {draws} polygons drawn");
            control
        }
        Err(err) => {
            runtime.fail(err.context("failed to draw fractal"));
            AppControl::Exit
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyfract_engine::geometry::GeometryError;
    use polyfract_engine::window::FrameOutcome;

    #[test]
    fn drawn_frame_is_counted() {
        let mut runtime = RuntimeCtx::default();
        let mut frames = 0;
        let control = settle(Ok(5), AppControl::Continue, &mut runtime, &mut frames);
        assert_eq!(control, AppControl::Continue);
        assert_eq!(frames, 1);
        assert!(matches!(runtime.into_outcome(control), FrameOutcome::Idle));
    }

    #[test]
    fn surface_retry_survives_a_drawn_frame() {
        let mut runtime = RuntimeCtx::default();
        runtime.request_redraw();
        let mut frames = 0;
        let control = settle(Ok(0), AppControl::Continue, &mut runtime, &mut frames);
        assert!(matches!(runtime.into_outcome(control), FrameOutcome::Redraw));
    }

    #[test]
    fn failed_draw_ends_the_run_with_its_error() {
        let mut runtime = RuntimeCtx::default();
        let mut frames = 0;
        let err = anyhow::Error::from(GeometryError::InvalidRadius(-1.0));
        let control = settle(Err(err), AppControl::Continue, &mut runtime, &mut frames);

        assert_eq!(control, AppControl::Exit);
        assert_eq!(frames, 0);
        match runtime.into_outcome(control) {
            FrameOutcome::Fail(err) => {
                assert_eq!(err.to_string(), "failed to draw fractal");
                assert!(err.downcast_ref::<GeometryError>().is_some());
            }
            other => panic!("expected a failure, got {other:?}"),
        }
    }
}
