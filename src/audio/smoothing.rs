/// Per-bin decayed history that damps frame-to-frame spectral jitter.
///
/// Each layer holds the previous layer's value decayed by `decay`, so the
/// blend is a finite geometric series; the normalization constant is derived
/// from the same depth and decay, which keeps every bin on a common scale.
pub struct SmoothingFilter {
    depth: usize,
    decay: f32,
    norm: f32,
    history: Vec<Vec<f32>>,
}

impl SmoothingFilter {
    pub fn new(depth: usize, decay: f32, bins: usize) -> Self {
        let norm = (0..=depth).map(|k| decay.powi(k as i32)).sum();
        Self {
            depth,
            decay,
            norm,
            history: vec![vec![0.0; bins]; depth],
        }
    }

    /// Sum of decay^k for k = 0..=depth; ~6.8619 with the default 0.9 / 10.
    pub fn norm_constant(&self) -> f32 {
        self.norm
    }

    /// Shift the history one layer down (decaying the shifted value), insert
    /// the raw value at layer 0, and replace each bin with the normalized
    /// blend of raw + history.
    pub fn smooth(&mut self, spectrum: &mut [f32]) {
        debug_assert_eq!(spectrum.len(), self.history[0].len());
        for (i, value) in spectrum.iter_mut().enumerate() {
            let raw = *value;
            for j in (1..self.depth).rev() {
                self.history[j][i] = self.history[j - 1][i] * self.decay;
            }
            self.history[0][i] = raw * self.decay;

            let mut sum = raw;
            for layer in &self.history {
                sum += layer[i];
            }
            *value = sum / self.norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn norm_constant_matches_geometric_series() {
        let filter = SmoothingFilter::new(10, 0.9, 4);
        assert!((filter.norm_constant() - 6.8619).abs() < 1e-3);
    }

    #[test]
    fn constant_input_converges_to_itself() {
        let mut filter = SmoothingFilter::new(10, 0.9, 3);
        let mut out = [0.0f32; 3];
        for _ in 0..200 {
            out = [4.0, 0.5, 100.0];
            filter.smooth(&mut out);
        }
        assert!((out[0] - 4.0).abs() < 1e-3);
        assert!((out[1] - 0.5).abs() < 1e-4);
        assert!((out[2] - 100.0).abs() < 0.05);
    }

    #[test]
    fn first_frame_is_damped_below_raw() {
        let mut filter = SmoothingFilter::new(10, 0.9, 1);
        let mut out = [1.0f32];
        filter.smooth(&mut out);
        // Only raw + layer0 contribute: (1 + 0.9) / norm.
        assert!((out[0] - 1.9 / filter.norm_constant()).abs() < 1e-6);
        assert!(out[0] < 1.0);
    }

    #[test]
    fn bins_smooth_independently() {
        let mut filter = SmoothingFilter::new(4, 0.9, 2);
        let mut a = [1.0f32, 0.0];
        filter.smooth(&mut a);
        assert!(a[0] > 0.0);
        assert_eq!(a[1], 0.0);
    }
}
