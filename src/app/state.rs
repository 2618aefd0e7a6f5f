use crate::data::config::Config;

pub struct AppState {
    pub config: Config,
    /// Latest bar snapshot pulled from the analysis thread; empty until the
    /// first frame has been captured.
    pub bars: Vec<f32>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            bars: Vec::new(),
        }
    }
}
