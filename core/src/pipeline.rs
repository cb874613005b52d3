use crate::echo_interface::{RxWindow, Track, TrackSummary, TxWaveform};
use crate::prelude::{PipelineConfig, PipelineError, PipelineResult};
use crate::processing::summary::summarize;
use crate::processing::{ClusteringEngine, Detector, MatchedFilter};
use crate::telemetry::{LogManager, MetricsRecorder};

/// Tracks completed during one pipeline step.
///
/// Degenerate tracks are surfaced alongside the valid summaries so the
/// caller can decide whether to keep or discard them.
#[derive(Debug, Default)]
pub struct PipelineOutput {
    pub summaries: Vec<TrackSummary>,
    pub degenerate: Vec<PipelineError>,
}

impl PipelineOutput {
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty() && self.degenerate.is_empty()
    }
}

/// End-to-end per-pulse pipeline: matched filter, single-point detector,
/// streaming clustering, track summary.
///
/// Owns the only mutable clustering state. Pulses must be fed in
/// non-decreasing time order; pulse numbering is internal.
pub struct Pipeline {
    filter: MatchedFilter,
    detector: Detector,
    engine: ClusteringEngine,
    config: PipelineConfig,
    metrics: MetricsRecorder,
    logger: LogManager,
    pulse_num: u64,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> PipelineResult<Self> {
        config.validate()?;
        let detector = Detector::new(config.snr_thresh, config.vmin_kps, config.vmax_kps)?;
        let engine = ClusteringEngine::new(config.cluster.clone())?;
        Ok(Self {
            filter: MatchedFilter::new(),
            detector,
            engine,
            config,
            metrics: MetricsRecorder::new(),
            logger: LogManager::new(),
            pulse_num: 0,
        })
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    /// Processes one pulse, returning tracks it completed. An
    /// `InsufficientData` error is local to this pulse; the caller should
    /// skip it and keep feeding the stream.
    pub fn process_pulse(
        &mut self,
        tx: &TxWaveform,
        rx: &RxWindow,
    ) -> PipelineResult<PipelineOutput> {
        let pulse_num = self.pulse_num;
        self.pulse_num += 1;

        let surface = match self
            .filter
            .apply(tx, rx, self.config.rmin_km, self.config.rmax_km)
        {
            Ok(surface) => surface,
            Err(err) => {
                self.metrics.record_skipped();
                return Err(err);
            }
        };
        self.metrics.record_pulse();

        let mut output = PipelineOutput::default();
        if let Some(point) = self.detector.detect(&surface, pulse_num) {
            self.metrics.record_detection();
            self.logger.record(&format!(
                "pulse {} detection r={:.0} m v={:.0} m/s snr={:.1}",
                pulse_num, point.r, point.v, point.snr
            ));
            for track in self.engine.addnext(point) {
                self.collect(track, &mut output);
            }
        }
        Ok(output)
    }

    /// Drains the clustering engine at end of stream. Terminal: feed no
    /// more pulses afterwards.
    pub fn finish(&mut self) -> PipelineOutput {
        let mut output = PipelineOutput::default();
        for track in self.engine.finish() {
            self.collect(track, &mut output);
        }
        output
    }

    fn collect(&self, track: Track, output: &mut PipelineOutput) {
        match summarize(&track) {
            Ok(summary) => {
                self.metrics.record_track();
                output.summaries.push(summary);
            }
            Err(err) => {
                self.metrics.record_degenerate();
                output.degenerate.push(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::{ClusterConfig, SPEED_OF_LIGHT};
    use num_complex::Complex64;

    const FS: f64 = 1.0e6;
    const FC: f64 = 440.0e6;
    const NTX: usize = 16;

    fn config(min_samples: usize) -> PipelineConfig {
        PipelineConfig {
            rmin_km: 1.5,
            rmax_km: 15.0,
            snr_thresh: 5.0,
            vmin_kps: 7.0,
            vmax_kps: 72.0,
            cluster: ClusterConfig {
                eps: 15.0,
                min_samples,
                tscale: 0.03,
                rscale: 150.0,
                vscale: 710.27,
            },
        }
    }

    fn tx() -> TxWaveform {
        let samples = (0..NTX)
            .map(|k| Complex64::from_polar(1.0, (k * k) as f64 * 0.7))
            .collect();
        TxWaveform {
            samples,
            sample_rate: FS,
        }
    }

    /// Noise-free pulse with an echo at delay 50 and Doppler bin 2
    /// (125 kHz, about -42.6 km/s at 440 MHz).
    fn echo_pulse(t: f64) -> (TxWaveform, RxWindow) {
        let tx = tx();
        let doppler_hz = 2.0 * FS / NTX as f64;
        let mut samples = vec![Complex64::new(0.0, 0.0); 200];
        for (k, &txk) in tx.samples.iter().enumerate() {
            let phase = 2.0 * std::f64::consts::PI * doppler_hz * k as f64 / FS;
            samples[50 + k] += txk * Complex64::from_polar(1.0, phase);
        }
        let rx = RxWindow {
            samples,
            delay_start: 0,
            t,
            sample_rate: FS,
            center_frequency: FC,
            noise_power: 1.0,
        };
        (tx, rx)
    }

    #[test]
    fn echo_stream_yields_one_track_at_finish() {
        let mut pipeline = Pipeline::new(config(3)).unwrap();
        for i in 0..5 {
            let (tx, rx) = echo_pulse(i as f64 * 0.01);
            let output = pipeline.process_pulse(&tx, &rx).unwrap();
            assert!(output.is_empty());
        }
        let output = pipeline.finish();
        assert_eq!(output.summaries.len(), 1);
        assert!(output.degenerate.is_empty());

        let summary = &output.summaries[0];
        assert!((summary.duration - 0.04).abs() < 1e-12);
        assert!((summary.initial_r - 7500.0).abs() < 1e-6);
        // stationary echo in range, Doppler channel pulls the drift down
        assert!(summary.overall_range_rate.abs() < 1e-6);
        assert!(summary.lstsq[1] < -30_000.0);
        let expected_v = -2.0 * FS / NTX as f64 * SPEED_OF_LIGHT / (2.0 * FC);
        for v in &summary.range_rates {
            assert!((v - expected_v).abs() < 1.0);
        }
        assert!(summary.snr_peak >= 5.0);

        let snapshot = pipeline.metrics().snapshot();
        assert_eq!(snapshot.pulses, 5);
        assert_eq!(snapshot.detections, 5);
        assert_eq!(snapshot.tracks, 1);
        assert_eq!(snapshot.degenerate, 0);
    }

    #[test]
    fn bad_pulse_is_skipped_without_aborting() {
        let mut pipeline = Pipeline::new(config(1)).unwrap();
        let (tx, _) = echo_pulse(0.0);
        let short_rx = RxWindow {
            samples: vec![Complex64::new(0.0, 0.0); 4],
            delay_start: 0,
            t: 0.0,
            sample_rate: FS,
            center_frequency: FC,
            noise_power: 1.0,
        };
        assert!(matches!(
            pipeline.process_pulse(&tx, &short_rx),
            Err(PipelineError::InsufficientData(_))
        ));

        // the stream continues on the next good pulse
        let (tx, rx) = echo_pulse(0.01);
        assert!(pipeline.process_pulse(&tx, &rx).is_ok());
        let snapshot = pipeline.metrics().snapshot();
        assert_eq!(snapshot.skipped, 1);
        assert_eq!(snapshot.pulses, 1);
    }

    #[test]
    fn single_detection_track_is_reported_degenerate() {
        let mut pipeline = Pipeline::new(config(1)).unwrap();
        let (tx, rx) = echo_pulse(0.0);
        pipeline.process_pulse(&tx, &rx).unwrap();
        let output = pipeline.finish();
        assert!(output.summaries.is_empty());
        assert_eq!(output.degenerate.len(), 1);
        assert!(matches!(
            output.degenerate[0],
            PipelineError::DegenerateTrack(_)
        ));
    }
}
