pub mod detection;
pub mod pulse;

pub use detection::{DetectionPoint, Track, TrackSummary};
pub use pulse::{median_noise_correction, RxWindow, TxWaveform};
