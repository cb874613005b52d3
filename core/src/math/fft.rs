use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Helper that wraps the `rustfft` planner for reuse across pulses.
pub struct FftHelper {
    fft: Arc<dyn Fft<f64>>,
    size: usize,
}

impl FftHelper {
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        Self { fft, size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Forward transform of one fast-time row, in place. The buffer length
    /// must match the planned size.
    pub fn forward(&self, buffer: &mut [Complex64]) {
        debug_assert_eq!(buffer.len(), self.size);
        self.fft.process(buffer);
    }

    /// Bin frequencies for a transform of `n` samples at spacing `dt`
    /// seconds, in FFT output order (non-negative bins first).
    pub fn bin_frequencies(n: usize, dt: f64) -> Vec<f64> {
        let n_i = n as i64;
        (0..n_i)
            .map(|i| {
                let k = if i <= (n_i - 1) / 2 { i } else { i - n_i };
                k as f64 / (n_i as f64 * dt)
            })
            .collect()
    }
}
