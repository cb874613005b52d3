use ndarray::{Array1, Array2};

use crate::echo_interface::{Track, TrackSummary};
use crate::math::matrix::MatrixHelper;
use crate::math::stats::StatsHelper;
use crate::prelude::{PipelineError, PipelineResult};

/// Fits and summarizes one completed track.
///
/// Single-point and zero-duration tracks cannot support the overall
/// range-rate or the drift fit and are reported as degenerate rather than
/// silently dropped.
pub fn summarize(track: &Track) -> PipelineResult<TrackSummary> {
    let points = track.points();
    let first = points
        .first()
        .ok_or_else(|| PipelineError::DegenerateTrack("track has no points".into()))?;
    let last = &points[points.len() - 1];

    let duration = last.t - first.t;
    if duration <= 0.0 {
        return Err(PipelineError::DegenerateTrack(format!(
            "zero duration over pulses {}..={} leaves the range-rate undefined",
            first.pulse_num, last.pulse_num
        )));
    }

    let snrs: Vec<f64> = points.iter().map(|p| p.snr).collect();
    let range_rates: Vec<f64> = points.iter().map(|p| p.v).collect();

    let snr_mean = StatsHelper::mean(&snrs)
        .ok_or_else(|| PipelineError::Internal("SNR statistics over empty set".into()))?;
    let snr_var = StatsHelper::variance(&snrs)
        .ok_or_else(|| PipelineError::Internal("SNR statistics over empty set".into()))?;
    let snr_peak = StatsHelper::peak(&snrs)
        .ok_or_else(|| PipelineError::Internal("SNR statistics over empty set".into()))?;
    let range_rates_var = StatsHelper::variance(&range_rates)
        .ok_or_else(|| PipelineError::Internal("range-rate statistics over empty set".into()))?;

    // Joint fit: range rows [1, t-t0] -> r stacked over range-rate rows
    // [0, 1] -> v, so a single drift estimate explains both channels.
    let n = points.len();
    let mut a = Array2::zeros((2 * n, 2));
    let mut y = Array1::zeros(2 * n);
    for (i, p) in points.iter().enumerate() {
        a[[i, 0]] = 1.0;
        a[[i, 1]] = p.t - first.t;
        y[i] = p.r;
        a[[n + i, 1]] = 1.0;
        y[n + i] = p.v;
    }
    let lstsq = MatrixHelper::lstsq2(&a, &y)?;

    Ok(TrackSummary {
        duration,
        initial_r: first.r,
        initial_t: first.t,
        lstsq,
        overall_range_rate: (last.r - first.r) / duration,
        range_rates,
        range_rates_var,
        snr_mean,
        snr_peak,
        snr_var,
    })
}
