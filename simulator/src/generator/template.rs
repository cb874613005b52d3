use num_complex::Complex64;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f64::consts::PI;

/// Generates a unit-amplitude random phase code for the transmit pulse.
pub fn phase_code(length: usize, seed: u64) -> Vec<Complex64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..length)
        .map(|_| Complex64::from_polar(1.0, rng.gen_range(0.0..2.0 * PI)))
        .collect()
}
