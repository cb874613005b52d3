//! Core signal processing and clustering for the meteor head-echo pipeline.
//!
//! The modules follow the per-pulse processing chain: matched filtering of
//! each transmit/receive pair into a range-Doppler surface, single-point
//! detection, streaming clustering of detections into tracks, and track
//! summarization.

pub mod echo_interface;
pub mod math;
pub mod pipeline;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use pipeline::{Pipeline, PipelineOutput};
pub use prelude::{PipelineError, PipelineResult};
