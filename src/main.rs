mod app;
mod audio;
mod data;
mod render;
mod ui;
mod utils;

use anyhow::Result;
use std::time::Duration;

fn main() -> Result<()> {
    env_logger::init();

    let config = data::config::Config::load_or_default()?;
    let params = config.analyzer_params();

    let pipeline = audio::pipeline::Pipeline::new(&params)?;
    let ring = pipeline.ring();
    let _capture = audio::capture::AudioCapture::start(ring, config.sample_rate)?;
    let analyzer = audio::analyzer::AnalyzerHandle::start(
        pipeline,
        Duration::from_millis(config.tick_ms.max(1)),
        64,
    );

    let mut app = app::state::AppState::new(config);
    app::event_loop::run(&mut app, &analyzer)
}
