mod app;
mod composer;
mod config;

use anyhow::Context;

use polyfract_engine::device::GpuInit;
use polyfract_engine::logging::{init_logging, LoggingConfig};
use polyfract_engine::render::ShaderSources;
use polyfract_engine::window::{Runtime, RuntimeConfig};

use crate::app::FractalApp;
use crate::config::FractalConfig;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = FractalConfig::default();
    config.validate().context("invalid fractal configuration")?;

    let shaders = ShaderSources::default();
    shaders.validate().context("polygon shaders failed to build")?;

    log::info!(
        "drawing {} nested {}-gons, radius {} scaled by {} per level",
        config.levels,
        config.sides,
        config.initial_radius,
        config.scale_factor
    );

    let runtime = RuntimeConfig {
        title: "polyfract".to_string(),
        canvas_size: config.canvas,
        resizable: false,
    };

    Runtime::run(runtime, GpuInit::default(), FractalApp::new(config, shaders))
}
