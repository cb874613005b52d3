use crate::echo_interface::DetectionPoint;
use crate::prelude::{PipelineError, PipelineResult};
use crate::processing::matched_filter::RangeDopplerSurface;

/// Single-point meteor detector applied to each range-Doppler surface.
///
/// Emits at most one detection per pulse: the global SNR maximum, accepted
/// only when it lies inside the closing-velocity window. Secondary maxima
/// are intentionally ignored.
pub struct Detector {
    snr_thresh: f64,
    vmin_kps: f64,
    vmax_kps: f64,
}

impl Detector {
    pub fn new(snr_thresh: f64, vmin_kps: f64, vmax_kps: f64) -> PipelineResult<Self> {
        if !snr_thresh.is_finite() || snr_thresh <= 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "snr_thresh must be positive and finite, got {}",
                snr_thresh
            )));
        }
        if !vmin_kps.is_finite() || vmin_kps < 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "vmin_kps must be non-negative and finite, got {}",
                vmin_kps
            )));
        }
        if !vmax_kps.is_finite() || vmax_kps < vmin_kps {
            return Err(PipelineError::InvalidConfig(format!(
                "vmax_kps must be at least vmin_kps, got {} < {}",
                vmax_kps, vmin_kps
            )));
        }
        Ok(Self {
            snr_thresh,
            vmin_kps,
            vmax_kps,
        })
    }

    pub fn detect(&self, surface: &RangeDopplerSurface, pulse_num: u64) -> Option<DetectionPoint> {
        // Global maximum in canonical (delay, frequency) scan order; the
        // strict comparison keeps the first occurrence on ties.
        let mut best: Option<(f64, usize, usize)> = None;
        for ((d, f), z) in surface.data.indexed_iter() {
            let snr = z.norm_sqr() / surface.noise_power;
            if best.map_or(true, |(s, _, _)| snr > s) {
                best = Some((snr, d, f));
            }
        }
        let (snr, d, f) = best?;

        let v = surface.range_rate_mps[f];
        let v_kps = v / 1000.0;
        if snr >= self.snr_thresh && -self.vmax_kps <= v_kps && v_kps <= -self.vmin_kps {
            Some(DetectionPoint {
                t: surface.t,
                r: surface.range_m[d],
                v,
                snr,
                pulse_num,
            })
        } else {
            None
        }
    }
}
