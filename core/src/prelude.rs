use serde::{Deserialize, Serialize};

/// Speed of light used in all range/Doppler conversions (m/s).
pub const SPEED_OF_LIGHT: f64 = 3.0e8;

/// Configuration for the streaming clustering engine.
///
/// The scale factors normalize time (s), range (m), and range-rate (m/s)
/// onto a common unit so that Euclidean distance in the scaled space is
/// meaningful.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    pub eps: f64,
    pub min_samples: usize,
    pub tscale: f64,
    pub rscale: f64,
    pub vscale: f64,
}

impl ClusterConfig {
    pub fn validate(&self) -> PipelineResult<()> {
        for (name, value) in [
            ("eps", self.eps),
            ("tscale", self.tscale),
            ("rscale", self.rscale),
            ("vscale", self.vscale),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PipelineError::InvalidConfig(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        if self.min_samples == 0 {
            return Err(PipelineError::InvalidConfig(
                "min_samples must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Shared configuration for the full detection pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Near edge of the range window of interest (km).
    pub rmin_km: f64,
    /// Far edge of the range window of interest (km).
    pub rmax_km: f64,
    /// Detection threshold as a linear power ratio.
    pub snr_thresh: f64,
    /// Lower closing-speed magnitude bound (km/s).
    pub vmin_kps: f64,
    /// Upper closing-speed magnitude bound (km/s).
    pub vmax_kps: f64,
    pub cluster: ClusterConfig,
}

impl PipelineConfig {
    pub fn validate(&self) -> PipelineResult<()> {
        if !self.rmin_km.is_finite() || self.rmin_km < 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "rmin_km must be non-negative and finite, got {}",
                self.rmin_km
            )));
        }
        if !self.rmax_km.is_finite() || self.rmax_km <= self.rmin_km {
            return Err(PipelineError::InvalidConfig(format!(
                "rmax_km must exceed rmin_km, got {} <= {}",
                self.rmax_km, self.rmin_km
            )));
        }
        self.cluster.validate()
    }
}

/// Common error type for pipeline execution.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// The receive window is too short for one full correlation; the pulse
    /// should be skipped without aborting the stream.
    #[error("insufficient data: {0}")]
    InsufficientData(String),
    /// A completed track cannot support the rate/fit computations.
    #[error("degenerate track: {0}")]
    DegenerateTrack(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
