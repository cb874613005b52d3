use serde::{Deserialize, Serialize};

/// One accepted meteor observation from a single pulse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionPoint {
    /// Absolute time, seconds since epoch.
    pub t: f64,
    /// Range (m).
    pub r: f64,
    /// Range-rate (m/s), negative while closing.
    pub v: f64,
    /// Linear power SNR at the detection cell.
    pub snr: f64,
    pub pulse_num: u64,
}

/// A completed cluster of detections belonging to one meteor event.
///
/// Points are ordered by time then pulse number. Tracks are immutable once
/// released by the clustering engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    points: Vec<DetectionPoint>,
}

impl Track {
    pub(crate) fn from_points(points: Vec<DetectionPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[DetectionPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Derived statistics and fit coefficients for one completed track.
///
/// Field order matches the summary output columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackSummary {
    /// Track duration (s).
    pub duration: f64,
    /// Range of the first point (m).
    pub initial_r: f64,
    /// Time of the first point, seconds since epoch.
    pub initial_t: f64,
    /// `[a, b]` of the joint fit `r ~ a + b*(t - t0)`, `v ~ b`.
    pub lstsq: [f64; 2],
    /// Secant slope of range over the track (m/s).
    pub overall_range_rate: f64,
    /// Per-point range-rates in track order (m/s).
    pub range_rates: Vec<f64>,
    pub range_rates_var: f64,
    pub snr_mean: f64,
    pub snr_peak: f64,
    pub snr_var: f64,
}
