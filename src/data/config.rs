use crate::audio::pipeline::AnalyzerParams;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub sample_rate: u32,
    pub frame_len: usize,
    pub ring_depth: usize,
    pub agc_window_secs: f32,
    pub smoothing_depth: usize,
    pub smoothing_decay: f32,
    pub freq_lo: u32,
    pub freq_hi: u32,

    /// Analysis thread cadence.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    #[serde(default = "default_ui_fps")]
    pub ui_fps: u32,
}

fn default_tick_ms() -> u64 {
    40
}

fn default_ui_fps() -> u32 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_rate: 8000,
            frame_len: 512,
            ring_depth: 3,
            agc_window_secs: 3.0,
            smoothing_depth: 10,
            smoothing_decay: 0.9,
            freq_lo: 300,
            freq_hi: 3400,
            tick_ms: default_tick_ms(),
            ui_fps: default_ui_fps(),
        }
    }
}

impl Config {
    pub fn load_or_default() -> Result<Self> {
        let path = Self::default_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        Ok(toml::from_str(&raw).unwrap_or_default())
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let raw = toml::to_string_pretty(self).unwrap_or_default();
        fs::write(path, raw)?;
        Ok(())
    }

    fn default_path() -> PathBuf {
        if let Ok(p) = std::env::var("VOXBARS_CONFIG") {
            return PathBuf::from(p);
        }
        PathBuf::from("voxbars.toml")
    }

    pub fn analyzer_params(&self) -> AnalyzerParams {
        let frames_per_sec = self.sample_rate as f32 / self.frame_len.max(1) as f32;
        let agc_window = ((self.agc_window_secs * frames_per_sec) as usize).max(1);
        AnalyzerParams {
            sample_rate: self.sample_rate,
            frame_len: self.frame_len,
            ring_depth: self.ring_depth,
            agc_window,
            smoothing_depth: self.smoothing_depth,
            smoothing_decay: self.smoothing_decay,
            freq_lo: self.freq_lo,
            freq_hi: self.freq_hi,
            ..AnalyzerParams::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_agc_window_covers_three_seconds() {
        // 3 s at 8 kHz with 512-sample frames is 46 frames.
        let params = Config::default().analyzer_params();
        assert_eq!(params.agc_window, 46);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config::default();
        let raw = toml::to_string(&config).unwrap();
        let back: Config = toml::from_str(&raw).unwrap();
        assert_eq!(back.sample_rate, config.sample_rate);
        assert_eq!(back.tick_ms, config.tick_ms);
    }
}
