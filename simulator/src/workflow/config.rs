use anyhow::Context;
use meteorcore::prelude::{ClusterConfig, PipelineConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Full parameter set for an offline detection run.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub rmin_km: f64,
    pub rmax_km: f64,
    pub snr_thresh: f64,
    pub vmin_kps: f64,
    pub vmax_kps: f64,
    pub eps: f64,
    pub min_samples: usize,
    pub tscale: f64,
    pub rscale: f64,
    pub vscale: f64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            rmin_km: 70.0,
            rmax_km: 140.0,
            snr_thresh: 1.0,
            vmin_kps: 7.0,
            vmax_kps: 72.0,
            eps: 15.0,
            min_samples: 1,
            tscale: 0.03,
            rscale: 150.0,
            vscale: 710.27,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn to_pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            rmin_km: self.rmin_km,
            rmax_km: self.rmax_km,
            snr_thresh: self.snr_thresh,
            vmin_kps: self.vmin_kps,
            vmax_kps: self.vmax_kps,
            cluster: ClusterConfig {
                eps: self.eps,
                min_samples: self.min_samples,
                tscale: self.tscale,
                rscale: self.rscale,
                vscale: self.vscale,
            },
        }
    }
}
