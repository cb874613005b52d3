use crate::generator::template::phase_code;
use meteorcore::echo_interface::{median_noise_correction, RxWindow, TxWaveform};
use meteorcore::prelude::SPEED_OF_LIGHT;
use num_complex::Complex64;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Injected head-echo trajectory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EchoProfile {
    /// First pulse carrying the echo.
    pub start_pulse: usize,
    /// One past the last pulse carrying the echo.
    pub end_pulse: usize,
    pub initial_range_km: f64,
    /// Closing speed magnitude (km/s).
    pub speed_kps: f64,
    /// Post-filter linear SNR of the echo.
    pub snr: f64,
}

/// Configuration for generating a synthetic pulse stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub pulses: usize,
    /// Inter-pulse period (s).
    pub ipp_s: f64,
    pub sample_rate: f64,
    pub center_frequency: f64,
    pub tx_len: usize,
    /// Delay of the first receive sample (samples).
    pub rx_delay_start: i64,
    pub rx_len: usize,
    /// Median-based noise power estimate before correction to the mean.
    pub noise_power_median: f64,
    pub seed: u64,
    pub echo: Option<EchoProfile>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            pulses: 2000,
            ipp_s: 0.002,
            sample_rate: 1.0e6,
            center_frequency: 440.0e6,
            tx_len: 64,
            rx_delay_start: 400,
            rx_len: 700,
            noise_power_median: 0.6,
            seed: 0,
            echo: Some(EchoProfile {
                start_pulse: 100,
                end_pulse: 160,
                initial_range_km: 120.0,
                speed_kps: 42.6,
                snr: 100.0,
            }),
        }
    }
}

impl ScenarioConfig {
    /// Mean noise power attached to each receive window.
    pub fn noise_power(&self) -> f64 {
        self.noise_power_median * median_noise_correction()
    }
}

/// Synthetic pulse source yielding transmit/receive pairs in strictly
/// increasing time order.
pub struct PulseGenerator {
    config: ScenarioConfig,
    tx: Vec<Complex64>,
    rng: StdRng,
    pulse: usize,
}

impl PulseGenerator {
    pub fn new(config: ScenarioConfig) -> Self {
        let tx = phase_code(config.tx_len, config.seed);
        let rng = StdRng::seed_from_u64(config.seed.wrapping_add(1));
        Self {
            config,
            tx,
            rng,
            pulse: 0,
        }
    }

    fn complex_noise(rng: &mut StdRng, power: f64) -> Complex64 {
        // Box-Muller; each quadrature carries half the noise power.
        let u1: f64 = rng.gen::<f64>().max(f64::MIN_POSITIVE);
        let u2: f64 = rng.gen();
        let mag = (-2.0 * u1.ln()).sqrt() * (power / 2.0).sqrt();
        Complex64::from_polar(mag, 2.0 * PI * u2)
    }

    fn inject_echo(&self, samples: &mut [Complex64], pulse: usize, t: f64) {
        let echo = match &self.config.echo {
            Some(echo) if (echo.start_pulse..echo.end_pulse).contains(&pulse) => echo,
            _ => return,
        };
        let fs = self.config.sample_rate;
        let elapsed = t - echo.start_pulse as f64 * self.config.ipp_s;
        let range_m = echo.initial_range_km * 1000.0 - echo.speed_kps * 1000.0 * elapsed;
        let delay = (2.0 * range_m * fs / SPEED_OF_LIGHT).round() as i64;
        // closing target shifts the received carrier up
        let doppler_hz = 2.0 * echo.speed_kps * 1000.0 * self.config.center_frequency
            / SPEED_OF_LIGHT;
        let amplitude = (echo.snr * self.config.noise_power() / self.tx.len() as f64).sqrt();

        let base = delay - self.config.rx_delay_start;
        for (k, &txk) in self.tx.iter().enumerate() {
            let idx = base + k as i64;
            if (0..samples.len() as i64).contains(&idx) {
                let phase = 2.0 * PI * doppler_hz * k as f64 / fs;
                samples[idx as usize] += amplitude * txk * Complex64::from_polar(1.0, phase);
            }
        }
    }
}

impl Iterator for PulseGenerator {
    type Item = (TxWaveform, RxWindow);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pulse >= self.config.pulses {
            return None;
        }
        let pulse = self.pulse;
        self.pulse += 1;
        let t = pulse as f64 * self.config.ipp_s;

        let noise_power = self.config.noise_power();
        let mut samples: Vec<Complex64> = (0..self.config.rx_len)
            .map(|_| Self::complex_noise(&mut self.rng, noise_power))
            .collect();
        self.inject_echo(&mut samples, pulse, t);

        let tx = TxWaveform {
            samples: self.tx.clone(),
            sample_rate: self.config.sample_rate,
        };
        let rx = RxWindow {
            samples,
            delay_start: self.config.rx_delay_start,
            t,
            sample_rate: self.config.sample_rate,
            center_frequency: self.config.center_frequency,
            noise_power,
        };
        Some((tx, rx))
    }
}
