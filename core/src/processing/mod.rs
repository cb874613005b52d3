pub mod clustering;
pub mod detector;
pub mod matched_filter;
pub mod summary;

pub use clustering::ClusteringEngine;
pub use detector::Detector;
pub use matched_filter::{MatchedFilter, RangeDopplerSurface};
pub use summary::summarize;
