use ndarray::{aview1, Array2};
use num_complex::Complex64;

use crate::echo_interface::{RxWindow, TxWaveform};
use crate::math::fft::FftHelper;
use crate::prelude::{PipelineError, PipelineResult, SPEED_OF_LIGHT};
use crate::telemetry::log::LogManager;

/// Range-Doppler surface for one pulse.
///
/// Rows are delay bins, columns Doppler-frequency bins in FFT output order.
/// The surface is transient: it is handed straight to the detector and then
/// dropped.
#[derive(Debug, Clone)]
pub struct RangeDopplerSurface {
    pub data: Array2<Complex64>,
    /// Absolute pulse time, seconds since epoch.
    pub t: f64,
    /// Range of each delay row (m).
    pub range_m: Vec<f64>,
    /// Doppler frequency of each column (Hz).
    pub freq_hz: Vec<f64>,
    /// Range-rate of each column (m/s), negative while closing.
    pub range_rate_mps: Vec<f64>,
    /// Mean noise power carried over from the receive window (linear).
    pub noise_power: f64,
}

/// Frequency bank of matched filters applied to a single pulse.
///
/// The FFT plan is kept between pulses and replanned only when the transmit
/// length changes.
pub struct MatchedFilter {
    fft: Option<FftHelper>,
    logger: LogManager,
}

impl MatchedFilter {
    pub fn new() -> Self {
        Self {
            fft: None,
            logger: LogManager::new(),
        }
    }

    /// Correlates the receive window against the transmit waveform over the
    /// `[rmin_km, rmax_km]` range gate and resolves Doppler along fast time.
    pub fn apply(
        &mut self,
        tx: &TxWaveform,
        rx: &RxWindow,
        rmin_km: f64,
        rmax_km: f64,
    ) -> PipelineResult<RangeDopplerSurface> {
        let fs = rx.sample_rate;
        let ntx = tx.samples.len();
        if ntx == 0 {
            return Err(PipelineError::InsufficientData(
                "empty transmit waveform".into(),
            ));
        }
        if !(rx.noise_power > 0.0) {
            return Err(PipelineError::InsufficientData(format!(
                "non-positive noise power {} on receive window",
                rx.noise_power
            )));
        }

        let delay_min = ((2.0 * fs * rmin_km * 1000.0) / SPEED_OF_LIGHT).floor() as i64;
        let delay_max = ((2.0 * fs * rmax_km * 1000.0) / SPEED_OF_LIGHT).ceil() as i64;

        // Slice to the delays that can contribute a full correlation inside
        // the range gate, clipped to the samples present.
        let lo = delay_min.max(rx.delay_start);
        let hi = (delay_max + ntx as i64).min(rx.delay_end());
        let slice_len = hi - lo;
        if slice_len < ntx as i64 {
            return Err(PipelineError::InsufficientData(format!(
                "receive window holds {} samples in the range gate, need at least {}",
                slice_len.max(0),
                ntx
            )));
        }
        let offset = (lo - rx.delay_start) as usize;
        let slice = &rx.samples[offset..offset + slice_len as usize];

        // Unit-norm replica keeps the post-filter noise level invariant to
        // pulse energy.
        let norm = tx
            .samples
            .iter()
            .map(|s| s.norm_sqr())
            .sum::<f64>()
            .sqrt();
        if norm == 0.0 {
            return Err(PipelineError::InsufficientData(
                "transmit waveform is all zeros".into(),
            ));
        }
        let replica: Vec<Complex64> = tx.samples.iter().map(|s| s.conj() / norm).collect();

        let fft = self.fft.get_or_insert_with(|| FftHelper::new(ntx));
        if fft.size() != ntx {
            *fft = FftHelper::new(ntx);
        }

        // Only full-overlap delays are formed, which discards the ntx-1
        // partial-overlap bins at each edge of the correlation.
        let n_delays = slice_len as usize - ntx + 1;
        let mut data = Array2::zeros((n_delays, ntx));
        let mut row = vec![Complex64::new(0.0, 0.0); ntx];
        for d in 0..n_delays {
            for (k, value) in row.iter_mut().enumerate() {
                *value = slice[d + k] * replica[k];
            }
            fft.forward(&mut row);
            data.row_mut(d).assign(&aview1(&row));
        }

        let range_m: Vec<f64> = (0..n_delays)
            .map(|d| (lo + d as i64) as f64 * SPEED_OF_LIGHT / (2.0 * fs))
            .collect();
        let freq_hz = FftHelper::bin_frequencies(ntx, 1.0 / fs);
        // Positive Doppler shift means closing, so range-rate is negated.
        let range_rate_mps: Vec<f64> = freq_hz
            .iter()
            .map(|f| -f * SPEED_OF_LIGHT / (2.0 * rx.center_frequency))
            .collect();

        self.logger.debug(&format!(
            "matched filter t={:.6} delays {}..{} ({} rows)",
            rx.t, lo, hi, n_delays
        ));

        Ok(RangeDopplerSurface {
            data,
            t: rx.t,
            range_m,
            freq_hz,
            range_rate_mps,
            noise_power: rx.noise_power,
        })
    }
}

impl Default for MatchedFilter {
    fn default() -> Self {
        Self::new()
    }
}
