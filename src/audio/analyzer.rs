use crate::audio::pipeline::Pipeline;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Runs the analysis pipeline on its own thread and keeps the latest bar
/// snapshot for the UI to pull at whatever cadence it likes.
///
/// The stop flag is only checked between ticks, so a tick always completes
/// before teardown.
pub struct AnalyzerHandle {
    bars: Arc<Mutex<Vec<f32>>>,
    bar_count: Arc<AtomicUsize>,
    stop: Arc<AtomicBool>,
    worker: Option<thread::JoinHandle<()>>,
}

impl AnalyzerHandle {
    pub fn start(mut pipeline: Pipeline, tick: Duration, bar_count: usize) -> Self {
        let bars: Arc<Mutex<Vec<f32>>> = Arc::new(Mutex::new(Vec::new()));
        let bar_count = Arc::new(AtomicUsize::new(bar_count.max(1)));
        let stop = Arc::new(AtomicBool::new(false));

        let bars_cloned = Arc::clone(&bars);
        let bar_count_cloned = Arc::clone(&bar_count);
        let stop_cloned = Arc::clone(&stop);

        let worker = thread::spawn(move || {
            log::info!("analysis thread started ({}ms cadence)", tick.as_millis());
            while !stop_cloned.load(Ordering::Relaxed) {
                let count = bar_count_cloned.load(Ordering::Relaxed).max(1);
                if let Some(out) = pipeline.tick(count) {
                    *bars_cloned.lock().unwrap() = out;
                }
                thread::sleep(tick);
            }
        });

        Self {
            bars,
            bar_count,
            stop,
            worker: Some(worker),
        }
    }

    /// The UI calls this when the layout width changes.
    pub fn set_bar_count(&self, count: usize) {
        self.bar_count.store(count.max(1), Ordering::Relaxed);
    }

    /// Latest bar values, clamped to the display range. Empty until the first
    /// frame has been captured and analyzed.
    pub fn latest_bars(&self) -> Vec<f32> {
        let guard = self.bars.lock().unwrap();
        guard.iter().map(|v| v.clamp(0.0, 1.0)).collect()
    }
}

impl Drop for AnalyzerHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
