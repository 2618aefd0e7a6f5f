use rustfft::{num_complex::Complex, FftPlanner};
use std::sync::Arc;

/// Owns the FFT plan and scratch state; turns a gain-normalized time-domain
/// frame into a power spectrum of `frame_len / 2 + 1` bins.
pub struct SpectralEngine {
    frame_len: usize,
    target_amp: f32,
    fft: Arc<dyn rustfft::Fft<f32>>,
    buf: Vec<Complex<f32>>,
    psd: Vec<f32>,
}

impl SpectralEngine {
    /// The plan is created once per frame length and reused every tick.
    pub fn new(frame_len: usize, target_amp: f32) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(frame_len);
        Self {
            frame_len,
            target_amp,
            fft,
            buf: vec![Complex::new(0.0, 0.0); frame_len],
            psd: vec![0.0; frame_len / 2 + 1],
        }
    }

    /// Scale every sample by `target_amp / agc_scale`, transform, and return
    /// magnitude-squared bins scaled by `2/N`. Output is finite for finite
    /// input; an all-zero frame yields an all-zero spectrum.
    pub fn analyze(&mut self, frame: &[f32], agc_scale: f32) -> &[f32] {
        let gain = self.target_amp / agc_scale;
        for (cell, &s) in self.buf.iter_mut().zip(frame) {
            *cell = Complex::new(s * gain, 0.0);
        }
        for cell in self.buf.iter_mut().skip(frame.len()) {
            *cell = Complex::new(0.0, 0.0);
        }

        self.fft.process(&mut self.buf);

        let scale = 2.0 / self.frame_len as f32;
        for (i, out) in self.psd.iter_mut().enumerate() {
            let bin = self.buf[i];
            *out = (bin.re * bin.re + bin.im * bin.im) * scale;
        }
        &self.psd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_frame_yields_zero_spectrum() {
        let mut engine = SpectralEngine::new(64, 2.5);
        let psd = engine.analyze(&[0.0; 64], crate::audio::energy::MIN_SCALE);
        assert_eq!(psd.len(), 33);
        assert!(psd.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn output_is_finite_and_deterministic() {
        let frame: Vec<f32> = (0..128)
            .map(|i| (i as f32 * 0.37).sin() * 0.8 - 0.1)
            .collect();
        let mut engine = SpectralEngine::new(128, 2.5);
        let first = engine.analyze(&frame, 0.2).to_vec();
        let second = engine.analyze(&frame, 0.2).to_vec();
        assert!(first.iter().all(|v| v.is_finite()));
        assert_eq!(first, second);
    }

    #[test]
    fn pure_tone_peaks_at_its_bin() {
        // 1000 Hz at Fs=8000, N=512 lands exactly on bin 64.
        const N: usize = 512;
        let frame: Vec<f32> = (0..N)
            .map(|i| (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / 8000.0).sin())
            .collect();
        let mut engine = SpectralEngine::new(N, 2.5);
        let psd = engine.analyze(&frame, 1.0);

        let peak = psd
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 64);
    }
}
