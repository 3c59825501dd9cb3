use crate::config::Config;
use crate::data::SensorData;
use crate::error::ReportError;
use crate::figure::build_report;
use crate::render;
use crate::stats::compute_metrics;
use crate::table::{METRIC_DESCRIPTIONS, build_summary_table};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub struct Manager {
    cfg: Config,
    output: PathBuf,
}

impl Manager {
    pub fn new<P: AsRef<Path>>(cfg: Config, output: P) -> Self {
        let output = output.as_ref().to_path_buf();
        Self { cfg, output }
    }

    /// Load one sensor file, draw its figure and print its summary table.
    ///
    /// Nothing is written until the metrics of both quantities are known.
    pub fn run_report<P: AsRef<Path>>(&self, file: P) -> Result<()> {
        let file = file.as_ref();
        if !file.is_file() {
            return Err(ReportError::Usage(format!("{file:?} is not a readable file")).into());
        }

        let data = SensorData::from_file(file).context("failed to load sensor data")?;
        log::info!("loaded {} readings from {file:?}", data.len());

        let temperature_metrics = compute_metrics(data.temperature())
            .context("failed to compute temperature metrics")?;
        let humidity_metrics =
            compute_metrics(data.humidity()).context("failed to compute humidity metrics")?;
        log::debug!("{temperature_metrics:?}");
        log::debug!("{humidity_metrics:?}");

        let table = build_summary_table(
            &[
                ("temperature", temperature_metrics.scalar_values()),
                ("humidity", humidity_metrics.scalar_values()),
            ],
            &METRIC_DESCRIPTIONS,
        )
        .context("failed to build summary table")?;
        log::debug!("summary table: {} rows, {} columns", table.n_rows(), table.n_cols());

        let figure = build_report(
            data.temperature(),
            data.humidity(),
            &temperature_metrics,
            &humidity_metrics,
            &self.cfg.report_options(),
        )
        .context("failed to build figure")?;

        render::save(&figure, &self.output)
            .with_context(|| format!("failed to render {:?}", self.output))?;
        log::info!("saved figure to {:?}", self.output);

        println!("{table}");

        Ok(())
    }
}
