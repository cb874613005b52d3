use serde::Serialize;
use std::sync::Mutex;

/// Counters accumulated over one pipeline run.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct MetricsSnapshot {
    /// Pulses that produced a range-Doppler surface.
    pub pulses: usize,
    /// Pulses skipped for insufficient data.
    pub skipped: usize,
    /// Detections accepted by the single-point detector.
    pub detections: usize,
    /// Tracks emitted with a valid summary.
    pub tracks: usize,
    /// Tracks reported as degenerate.
    pub degenerate: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_pulse(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.pulses += 1;
        }
    }

    pub fn record_skipped(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.skipped += 1;
        }
    }

    pub fn record_detection(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.detections += 1;
        }
    }

    pub fn record_track(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.tracks += 1;
        }
    }

    pub fn record_degenerate(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.degenerate += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
