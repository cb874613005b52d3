use crate::generator::profile::{PulseGenerator, ScenarioConfig};
use crate::workflow::config::WorkflowConfig;
use crate::workflow::report::SummaryWriter;
use anyhow::Context;
use meteorcore::pipeline::{Pipeline, PipelineOutput};
use meteorcore::prelude::PipelineError;
use std::path::Path;

/// Totals from one offline run.
#[derive(Debug, Clone, Copy)]
pub struct RunReport {
    pub pulses: usize,
    pub skipped: usize,
    pub detections: usize,
    pub tracks: usize,
    pub degenerate: usize,
}

pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// Streams the synthetic scenario through the pipeline, appending each
    /// track summary to the CSV as it is produced.
    pub fn run(&self, scenario: &ScenarioConfig, output: &Path) -> anyhow::Result<RunReport> {
        let mut pipeline = Pipeline::new(self.config.to_pipeline_config())
            .context("constructing detection pipeline")?;
        let mut writer = SummaryWriter::create(output)?;

        for (tx, rx) in PulseGenerator::new(scenario.clone()) {
            match pipeline.process_pulse(&tx, &rx) {
                Ok(step) => Self::write_step(&mut writer, &step)?,
                Err(PipelineError::InsufficientData(reason)) => {
                    log::warn!("skipping pulse at t={:.6}: {}", rx.t, reason);
                }
                Err(err) => return Err(err).context("processing pulse"),
            }
        }

        let final_step = pipeline.finish();
        Self::write_step(&mut writer, &final_step)?;
        writer.flush()?;

        let snapshot = pipeline.metrics().snapshot();
        Ok(RunReport {
            pulses: snapshot.pulses,
            skipped: snapshot.skipped,
            detections: snapshot.detections,
            tracks: snapshot.tracks,
            degenerate: snapshot.degenerate,
        })
    }

    fn write_step(writer: &mut SummaryWriter, step: &PipelineOutput) -> anyhow::Result<()> {
        for summary in &step.summaries {
            writer.append(summary)?;
        }
        for err in &step.degenerate {
            log::warn!("discarding {}", err);
        }
        Ok(())
    }
}
