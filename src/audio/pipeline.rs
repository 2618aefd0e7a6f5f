use crate::audio::bucketize::Bucketizer;
use crate::audio::energy::EnergyTracker;
use crate::audio::frame_ring::FrameRing;
use crate::audio::smoothing::SmoothingFilter;
use crate::audio::spectral::SpectralEngine;
use std::sync::Arc;
use thiserror::Error;

/// Everything the pipeline needs, fixed at construction.
#[derive(Debug, Clone)]
pub struct AnalyzerParams {
    pub sample_rate: u32,
    pub frame_len: usize,
    pub ring_depth: usize,
    /// AGC window length in frames (~3 s worth at the default rate).
    pub agc_window: usize,
    pub smoothing_depth: usize,
    pub smoothing_decay: f32,
    pub freq_lo: u32,
    pub freq_hi: u32,
    /// Loudness target: samples are scaled by `target_amp / agc`.
    pub target_amp: f32,
}

impl Default for AnalyzerParams {
    fn default() -> Self {
        Self {
            sample_rate: 8000,
            frame_len: 512,
            ring_depth: 3,
            agc_window: 46,
            smoothing_depth: 10,
            smoothing_decay: 0.9,
            freq_lo: 300,
            freq_hi: 3400,
            target_amp: 2.5,
        }
    }
}

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("sample rate must be positive")]
    SampleRate,
    #[error("frame length must be an even value >= 2 (got {0})")]
    FrameLen(usize),
    #[error("ring depth must be >= 2 (got {0})")]
    RingDepth(usize),
    #[error("AGC window must hold at least one frame")]
    AgcWindow,
    #[error("smoothing depth must be >= 1")]
    SmoothingDepth,
    #[error("smoothing decay must be in (0, 1] (got {0})")]
    SmoothingDecay(f32),
    #[error("target amplitude must be positive (got {0})")]
    TargetAmp(f32),
    #[error("frequency band {0}..{1} Hz does not fit below Nyquist")]
    FreqBand(u32, u32),
}

impl AnalyzerParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.sample_rate == 0 {
            return Err(ParamsError::SampleRate);
        }
        if self.frame_len < 2 || self.frame_len % 2 != 0 {
            return Err(ParamsError::FrameLen(self.frame_len));
        }
        if self.ring_depth < 2 {
            return Err(ParamsError::RingDepth(self.ring_depth));
        }
        if self.agc_window == 0 {
            return Err(ParamsError::AgcWindow);
        }
        if self.smoothing_depth == 0 {
            return Err(ParamsError::SmoothingDepth);
        }
        if !(self.smoothing_decay > 0.0 && self.smoothing_decay <= 1.0) {
            return Err(ParamsError::SmoothingDecay(self.smoothing_decay));
        }
        if !(self.target_amp > 0.0) {
            return Err(ParamsError::TargetAmp(self.target_amp));
        }
        if self.freq_lo >= self.freq_hi || self.freq_hi > self.sample_rate / 2 {
            return Err(ParamsError::FreqBand(self.freq_lo, self.freq_hi));
        }
        Ok(())
    }

    /// Map the frequency band onto spectrum bin indices, keeping a one-bin
    /// margin below and a two-bin margin above so edge bars stay on screen.
    pub fn bin_range(&self) -> (usize, usize) {
        let half = self.frame_len / 2;
        let nyquist = (self.sample_rate / 2) as usize;
        let lo = (self.freq_lo as usize * half / nyquist).saturating_sub(1);
        let hi = (self.freq_hi as usize * half / nyquist + 2).min(half);
        (lo, hi)
    }
}

/// Orchestrates one analysis tick: latest frame -> AGC -> spectrum ->
/// smoothing -> bars. Owns every piece of per-tick state; the frame ring is
/// shared with the capture side.
pub struct Pipeline {
    ring: Arc<FrameRing>,
    energy: EnergyTracker,
    engine: SpectralEngine,
    smoother: SmoothingFilter,
    buckets: Bucketizer,
    frame: Vec<f32>,
    spectrum: Vec<f32>,
    last_generation: u64,
}

impl Pipeline {
    pub fn new(params: &AnalyzerParams) -> Result<Self, ParamsError> {
        params.validate()?;
        let bins = params.frame_len / 2 + 1;
        let (bin_lo, bin_hi) = params.bin_range();
        Ok(Self {
            ring: Arc::new(FrameRing::new(params.frame_len, params.ring_depth)),
            energy: EnergyTracker::new(params.agc_window, params.frame_len),
            engine: SpectralEngine::new(params.frame_len, params.target_amp),
            smoother: SmoothingFilter::new(params.smoothing_depth, params.smoothing_decay, bins),
            buckets: Bucketizer::new(bin_lo, bin_hi, (params.frame_len / 2) as f32),
            frame: vec![0.0; params.frame_len],
            spectrum: vec![0.0; bins],
            last_generation: 0,
        })
    }

    /// Shared handle for the producer (capture callback) side.
    pub fn ring(&self) -> Arc<FrameRing> {
        self.ring.clone()
    }

    /// One analysis pass over the most recent frame. `None` means no frame
    /// has been published yet, which is normal at startup, not an error.
    ///
    /// Safe to call again without an intervening publish: the same frame is
    /// re-analyzed, but its energy is only recorded once (the AGC window
    /// tracks published frames, not ticks).
    pub fn tick(&mut self, bar_count: usize) -> Option<Vec<f32>> {
        let generation = self.ring.latest_into(&mut self.frame)?;
        if generation != self.last_generation {
            let frame_energy: f32 = self.frame.iter().map(|s| s.abs()).sum();
            self.energy.record(frame_energy);
            self.last_generation = generation;
        }

        let agc = self.energy.scale();
        let psd = self.engine.analyze(&self.frame, agc);
        self.spectrum.copy_from_slice(psd);
        self.smoother.smooth(&mut self.spectrum);
        Some(self.buckets.bucketize(&self.spectrum, bar_count))
    }
}
