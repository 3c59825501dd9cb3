use crate::figure::BOX_WINDOW_SCALE;
use crate::window::window_len;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

const SEC_TO_MINS: f64 = 1.0 / 60.0;
const SEC_TO_HRS: f64 = 1.0 / 3600.0;

/// Unit used for the time axes of the figure.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Secs,
    Mins,
    Hrs,
}

impl TimeUnit {
    /// Number of this unit in one second.
    pub fn per_sec(self) -> f64 {
        match self {
            TimeUnit::Secs => 1.0,
            TimeUnit::Mins => SEC_TO_MINS,
            TimeUnit::Hrs => SEC_TO_HRS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeUnit::Secs => "secs",
            TimeUnit::Mins => "mins",
            TimeUnit::Hrs => "hrs",
        }
    }
}

/// Report configuration.
///
/// Loaded from an optional TOML file; missing keys take their defaults.
/// See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Seconds between two consecutive readings.
    pub sampling_interval_secs: f64,
    /// Unit of the time axes.
    pub time_unit: TimeUnit,
    /// Figure width and height in pixels.
    pub canvas_size: (u32, u32),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sampling_interval_secs: 5.0,
            time_unit: TimeUnit::Hrs,
            canvas_size: (1600, 1600),
        }
    }
}

impl Config {
    /// Load a [`Config`] from a TOML file.
    ///
    /// Performs validation on all parameters before returning.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_num(self.sampling_interval_secs, 0.001..=86_400.0)
            .context("invalid sampling interval")?;
        check_num(self.canvas_size.0, 300..=10_000).context("invalid canvas width")?;
        check_num(self.canvas_size.1, 300..=10_000).context("invalid canvas height")?;

        let opts = self.report_options();
        window_len(opts.sampling_interval, BOX_WINDOW_SCALE).with_context(|| {
            format!("invalid sampling_interval_secs for time_unit {}", opts.time_unit)
        })?;
        Ok(())
    }

    /// Resolve the options handed to the chart builder.
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            canvas_size: self.canvas_size,
            sampling_interval: self.sampling_interval_secs * self.time_unit.per_sec(),
            time_unit: self.time_unit.label().to_string(),
        }
    }
}

/// Options of the chart builder.
#[derive(Debug, PartialEq, Clone)]
pub struct ReportOptions {
    /// Figure width and height in pixels. Defaults to `(1600, 1600)`.
    pub canvas_size: (u32, u32),
    /// Time between readings, in `time_unit`. Defaults to 5 s in hours.
    pub sampling_interval: f64,
    /// Label of the time axes. Defaults to `"hrs"`.
    pub time_unit: String,
}

/// Options resolved from [`Config::default`]: 5 s readings shown in hours.
impl Default for ReportOptions {
    fn default() -> Self {
        Config::default().report_options()
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_report_in_hours() {
        let opts = Config::default().report_options();
        assert_eq!(opts.canvas_size, (1600, 1600));
        assert_relative_eq!(opts.sampling_interval, 5.0 / 3600.0);
        assert_eq!(opts.time_unit, "hrs");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: Config = toml::from_str("time_unit = \"mins\"\n").unwrap();
        assert_eq!(config.sampling_interval_secs, 5.0);
        assert_eq!(config.time_unit, TimeUnit::Mins);
        assert_relative_eq!(config.report_options().sampling_interval, 5.0 / 60.0);
    }

    #[test]
    fn full_file_is_parsed() {
        let contents = "sampling_interval_secs = 0.5\ntime_unit = \"secs\"\ncanvas_size = [800, 600]\n";
        let config: Config = toml::from_str(contents).unwrap();
        assert_eq!(
            config,
            Config {
                sampling_interval_secs: 0.5,
                time_unit: TimeUnit::Secs,
                canvas_size: (800, 600),
            }
        );
        config.validate().unwrap();
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Config>("bins = 20\n").is_err());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let config = Config {
            sampling_interval_secs: 0.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            canvas_size: (100, 1600),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "invalid canvas width");
    }

    #[test]
    fn missing_file_is_reported() {
        let err = Config::from_file("/nonexistent/thviz.toml").unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn default_options_match_default_config() {
        let opts = ReportOptions::default();
        assert_eq!(opts, Config::default().report_options());
        assert_relative_eq!(opts.sampling_interval, 5.0 / 3600.0);
        assert_eq!(opts.time_unit, "hrs");
    }

    #[test]
    fn coarse_interval_for_unit_is_rejected() {
        let config = Config {
            time_unit: TimeUnit::Secs,
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("sampling_interval_secs"), "{msg}");
        assert!(msg.contains("invalid scale"), "{msg}");

        let config = Config {
            sampling_interval_secs: 1.0,
            time_unit: TimeUnit::Secs,
            ..Config::default()
        };
        config.validate().unwrap();

        let config = Config {
            sampling_interval_secs: 86_400.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
