use crate::app::state::AppState;
use crate::audio::analyzer::AnalyzerHandle;
use crate::ui::tui::{Tui, UiLayout};
use crate::utils::input::{map_key, Action};
use anyhow::Result;
use crossterm::event::{self, Event};
use std::time::{Duration, Instant};

pub fn run(app: &mut AppState, analyzer: &AnalyzerHandle) -> Result<()> {
    let mut tui = Tui::new()?;
    tui.enter()?;

    let mut last_layout = UiLayout::default();

    loop {
        let frame_start = Instant::now();

        // poll input (non-blocking-ish)
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(k) => {
                    if map_key(k) == Action::Quit {
                        tui.should_quit = true;
                    }
                }
                Event::Resize(_, _) => {
                    // Layout is recomputed every draw; the analyzer picks up
                    // the new bar count below.
                }
                _ => {}
            }
        }

        // One bar per spectrum column.
        let bar_count = (last_layout.spectrum.width as usize).max(1);
        analyzer.set_bar_count(bar_count);
        app.bars = analyzer.latest_bars();

        last_layout = tui.draw(app)?;

        // frame pacing
        let frame_dt = fps_to_dt(app.config.ui_fps);
        let elapsed = frame_start.elapsed();
        if elapsed < frame_dt {
            std::thread::sleep(frame_dt - elapsed);
        }

        if tui.should_quit {
            break;
        }
    }

    tui.exit()?;
    Ok(())
}

fn fps_to_dt(fps: u32) -> Duration {
    let fps = fps.clamp(10, 60);
    Duration::from_millis((1000 / fps) as u64)
}
