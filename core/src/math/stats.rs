pub struct StatsHelper;

impl StatsHelper {
    /// Arithmetic mean, `None` for an empty sample set.
    pub fn mean(samples: &[f64]) -> Option<f64> {
        if samples.is_empty() {
            return None;
        }
        Some(samples.iter().sum::<f64>() / samples.len() as f64)
    }

    /// Population variance, `None` for an empty sample set.
    pub fn variance(samples: &[f64]) -> Option<f64> {
        let mean = Self::mean(samples)?;
        let sum_sq: f64 = samples.iter().map(|&v| (v - mean) * (v - mean)).sum();
        Some(sum_sq / samples.len() as f64)
    }

    /// Largest sample, `None` for an empty sample set.
    pub fn peak(samples: &[f64]) -> Option<f64> {
        samples.iter().copied().reduce(f64::max)
    }
}
