use anyhow::Context;
use meteorcore::echo_interface::TrackSummary;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Summary CSV columns; order is fixed for downstream compatibility.
pub const COLUMNS: [&str; 10] = [
    "duration",
    "initial r",
    "initial t",
    "lstsq",
    "overall range rate",
    "range rates",
    "range rates var",
    "snr mean",
    "snr peak",
    "snr var",
];

/// Incremental CSV writer for track summaries.
pub struct SummaryWriter {
    out: BufWriter<File>,
}

impl SummaryWriter {
    pub fn create(path: &Path) -> anyhow::Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("creating summary output {}", path.display()))?;
        let mut out = BufWriter::new(file);
        writeln!(out, "{}", COLUMNS.join(",")).context("writing summary header")?;
        Ok(Self { out })
    }

    /// Appends one summary row. List-valued fields are rendered as JSON
    /// arrays inside a quoted field.
    pub fn append(&mut self, summary: &TrackSummary) -> anyhow::Result<()> {
        let lstsq = serde_json::to_string(&summary.lstsq).context("encoding lstsq")?;
        let range_rates =
            serde_json::to_string(&summary.range_rates).context("encoding range rates")?;
        writeln!(
            self.out,
            "{},{},{},\"{}\",{},\"{}\",{},{},{},{}",
            summary.duration,
            summary.initial_r,
            summary.initial_t,
            lstsq,
            summary.overall_range_rate,
            range_rates,
            summary.range_rates_var,
            summary.snr_mean,
            summary.snr_peak,
            summary.snr_var
        )
        .context("writing summary row")?;
        Ok(())
    }

    pub fn flush(&mut self) -> anyhow::Result<()> {
        self.out.flush().context("flushing summary output")?;
        Ok(())
    }
}
