/// Floor for the AGC divisor; keeps silence from amplifying into NaN/Inf.
pub const MIN_SCALE: f32 = 1e-6;

/// Rolling window of per-frame absolute-energy totals, used to derive the
/// automatic gain control divisor.
pub struct EnergyTracker {
    totals: Vec<f32>,
    next: usize,
    seen: usize,
    frame_len: usize,
}

impl EnergyTracker {
    pub fn new(window: usize, frame_len: usize) -> Self {
        Self {
            totals: vec![0.0; window],
            next: 0,
            seen: 0,
            frame_len,
        }
    }

    /// Record the energy (sum of absolute sample values) of one published
    /// frame, evicting the oldest entry once the window is full.
    pub fn record(&mut self, frame_energy: f32) {
        self.totals[self.next] = frame_energy;
        self.next = (self.next + 1) % self.totals.len();
        if self.seen < self.totals.len() {
            self.seen += 1;
        }
    }

    /// Current AGC divisor: average sample magnitude over the frames seen so
    /// far. Before the window fills this is a partial-window average; during
    /// silence it clamps to `MIN_SCALE` instead of reaching zero.
    pub fn scale(&self) -> f32 {
        if self.seen == 0 {
            return MIN_SCALE;
        }
        let sum: f32 = self.totals[..self.seen.min(self.totals.len())].iter().sum();
        (sum / (self.seen * self.frame_len) as f32).max(MIN_SCALE)
    }
}
