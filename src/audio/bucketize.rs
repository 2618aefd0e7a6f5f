/// Reduces a frequency sub-range of the power spectrum onto a requested
/// number of bars, taking the peak (not the average) within each bar's bin
/// span. Peak-hold keeps narrow tones visible at any bar count.
pub struct Bucketizer {
    bin_lo: usize,
    bin_hi: usize,
    norm: f32,
}

impl Bucketizer {
    /// `bin_lo..=bin_hi` must lie within the spectrum (validated upstream by
    /// `AnalyzerParams`); `norm` is the display divisor (N/2).
    pub fn new(bin_lo: usize, bin_hi: usize, norm: f32) -> Self {
        Self { bin_lo, bin_hi, norm }
    }

    /// Walk `bar_count` bars with a fractional bin cursor starting exactly at
    /// `bin_lo`; each bar covers the integer bins from the previous cursor to
    /// the current one, inclusive on both ends. Output is normalized but
    /// un-clamped; values may exceed 1.0 under transient AGC error and it is
    /// the caller's job to clamp.
    pub fn bucketize(&self, spectrum: &[f32], bar_count: usize) -> Vec<f32> {
        let mut bars = Vec::with_capacity(bar_count);
        if bar_count == 0 || spectrum.is_empty() {
            return bars;
        }

        let last = spectrum.len() - 1;
        let span = (self.bin_hi - self.bin_lo) as f32 / bar_count as f32;
        let mut cursor = self.bin_lo as f32;
        let mut prev = self.bin_lo.min(last);

        for _ in 0..bar_count {
            let cur = (cursor as usize).min(self.bin_hi).min(last);
            let mut peak = 0.0f32;
            for &v in &spectrum[prev..=cur] {
                if v > peak {
                    peak = v;
                }
            }
            bars.push(peak / self.norm);
            prev = cur;
            cursor += span;
        }
        bars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> Vec<f32> {
        (0..len).map(|i| i as f32).collect()
    }

    #[test]
    fn output_length_matches_bar_count() {
        let b = Bucketizer::new(18, 219, 256.0);
        let spectrum = ramp(257);
        for count in [1usize, 78, 500] {
            assert_eq!(b.bucketize(&spectrum, count).len(), count);
        }
    }

    #[test]
    fn first_bar_starts_at_bin_lo() {
        let b = Bucketizer::new(10, 20, 1.0);
        let spectrum = ramp(32);
        let bars = b.bucketize(&spectrum, 10);
        // Cursor starts at bin_lo, so the first bar covers bin 10 alone.
        assert_eq!(bars[0], 10.0);
    }

    #[test]
    fn peak_hold_picks_the_maximum_in_range() {
        let mut spectrum = vec![0.0f32; 64];
        spectrum[37] = 9.0;
        let b = Bucketizer::new(0, 63, 1.0);
        // Cursor walk: bar 0 covers 0..=0, bar 1 covers 0..=15, bar 2 covers
        // 15..=31, bar 3 covers 31..=47; the peak at bin 37 lands in bar 3.
        let bars = b.bucketize(&spectrum, 4);
        assert_eq!(bars, vec![0.0, 0.0, 0.0, 9.0]);
    }

    #[test]
    fn more_bars_than_bins_is_defined() {
        let b = Bucketizer::new(4, 8, 1.0);
        let spectrum = ramp(16);
        let bars = b.bucketize(&spectrum, 40);
        assert_eq!(bars.len(), 40);
        assert!(bars.iter().all(|v| v.is_finite()));
        // Zero-width spans repeat the bin they sit on; the walk stops one
        // span short of bin_hi, so the last bar reads bin 7.
        assert_eq!(bars[0], 4.0);
        assert_eq!(*bars.last().unwrap(), 7.0);
    }

    #[test]
    fn values_are_normalized_by_divisor() {
        let mut spectrum = vec![0.0f32; 16];
        spectrum[3] = 8.0;
        let b = Bucketizer::new(0, 15, 4.0);
        let bars = b.bucketize(&spectrum, 1);
        assert_eq!(bars, vec![2.0]);
    }
}
