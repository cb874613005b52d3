use anyhow::Context;
use clap::Parser;
use generator::profile::ScenarioConfig;
use std::path::PathBuf;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Meteor head-echo detection driver")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Number of pulses to synthesize
    #[arg(long, default_value_t = 2000)]
    pulses: usize,
    /// Seed for the synthetic noise and transmit code
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Initial range of the injected head echo (km)
    #[arg(long, default_value_t = 120.0)]
    echo_range_km: f64,
    /// Closing speed of the injected head echo (km/s)
    #[arg(long, default_value_t = 42.6)]
    echo_speed_kps: f64,
    /// Disable the injected echo and run on noise alone
    #[arg(long, default_value_t = false)]
    noise_only: bool,
    /// Output CSV of track summaries
    #[arg(long, default_value = "cluster_summaries.txt")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::default()
    };

    let mut scenario = ScenarioConfig::default();
    scenario.pulses = args.pulses;
    scenario.seed = args.seed;
    if args.noise_only {
        scenario.echo = None;
    } else if let Some(echo) = scenario.echo.as_mut() {
        echo.initial_range_km = args.echo_range_km;
        echo.speed_kps = args.echo_speed_kps;
    }

    let runner = Runner::new(workflow_config);
    let report = runner
        .run(&scenario, &args.output)
        .context("running detection workflow")?;

    println!(
        "Run complete -> pulses {}, skipped {}, detections {}, tracks {}, degenerate {}",
        report.pulses, report.skipped, report.detections, report.tracks, report.degenerate
    );
    println!("Track summaries written to {}", args.output.display());

    Ok(())
}
