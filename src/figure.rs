//! Layout of the report figure.
//!
//! [`build_report`] maps the two series and their metrics to a fixed grid of
//! panels. Nothing here draws; see [`crate::render`] for that.

use crate::config::ReportOptions;
use crate::error::ReportError;
use crate::stats::{BoxStats, Extremum, Histogram, MetricsRecord};
use crate::window::window_series;

pub const N_ROWS: usize = 2;
pub const N_COLS: usize = 3;

/// Number of histogram bins.
pub const HIST_BINS: usize = 40;

/// Time span of each boxplot window, in the report time unit.
pub const BOX_WINDOW_SCALE: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Colors of the panels of one quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub line: Rgb,
    pub marker: Rgb,
    pub band: Rgb,
    pub boxes: Rgb,
}

/// Measured quantity shown on one row of the figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Temperature,
    Humidity,
}

impl Quantity {
    pub fn name(self) -> &'static str {
        match self {
            Quantity::Temperature => "Temperature",
            Quantity::Humidity => "Humidity",
        }
    }

    pub fn unit_label(self) -> &'static str {
        match self {
            Quantity::Temperature => "Celsius[°C]",
            Quantity::Humidity => "Percentage[%]",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Quantity::Temperature => Palette {
                line: Rgb(255, 140, 0),
                marker: Rgb(0, 0, 128),
                band: Rgb(250, 128, 114),
                boxes: Rgb(244, 164, 96),
            },
            Quantity::Humidity => Palette {
                line: Rgb(0, 191, 255),
                marker: Rgb(250, 128, 114),
                band: Rgb(135, 206, 235),
                boxes: Rgb(135, 206, 235),
            },
        }
    }
}

/// Labeled point on a time-series panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub label: String,
}

/// Horizontal line with a shaded band around it.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub x_range: (f64, f64),
    pub center: f64,
    pub half_width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelKind {
    /// Readings over time with the extrema marked and a median ± std band.
    TimeSeries {
        points: Vec<(f64, f64)>,
        extrema: Vec<Annotation>,
        band: Band,
    },
    Histogram(Histogram),
    /// One box per time window.
    Boxplot {
        boxes: Vec<BoxStats>,
        labels: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub row: usize,
    pub col: usize,
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub palette: Palette,
    pub kind: PanelKind,
}

/// Complete figure, ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderableFigure {
    pub canvas_size: (u32, u32),
    /// Panels in row-major order.
    pub panels: Vec<Panel>,
}

/// Lay out the figure for a pair of series.
///
/// Row 0 shows temperature and row 1 humidity; each row holds a time-series
/// panel, a histogram and a windowed boxplot.
///
/// # Errors
/// Returns [`ReportError::EmptyInput`] for empty series,
/// [`ReportError::MalformedInput`] if the series are not paired, and
/// [`ReportError::InvalidScale`] if a boxplot window holds no sample.
pub fn build_report(
    temperature: &[f64],
    humidity: &[f64],
    temperature_metrics: &MetricsRecord,
    humidity_metrics: &MetricsRecord,
    opts: &ReportOptions,
) -> Result<RenderableFigure, ReportError> {
    if temperature.len() != humidity.len() {
        return Err(ReportError::MalformedInput(format!(
            "{} temperature readings but {} humidity readings",
            temperature.len(),
            humidity.len()
        )));
    }

    let mut panels = Vec::with_capacity(N_ROWS * N_COLS);
    for (row, (quantity, series, metrics)) in [
        (Quantity::Temperature, temperature, temperature_metrics),
        (Quantity::Humidity, humidity, humidity_metrics),
    ]
    .into_iter()
    .enumerate()
    {
        panels.extend(build_row(row, quantity, series, metrics, opts)?);
    }

    Ok(RenderableFigure {
        canvas_size: opts.canvas_size,
        panels,
    })
}

fn build_row(
    row: usize,
    quantity: Quantity,
    series: &[f64],
    metrics: &MetricsRecord,
    opts: &ReportOptions,
) -> Result<[Panel; N_COLS], ReportError> {
    let name = quantity.name();
    let unit = quantity.unit_label();
    let time_desc = format!("Time [{}]", opts.time_unit);
    let palette = quantity.palette();

    let histogram = Histogram::from_values(series, HIST_BINS).ok_or(ReportError::EmptyInput)?;

    let window_set = window_series(series, opts.sampling_interval, BOX_WINDOW_SCALE)?;
    let boxes: Vec<_> = window_set
        .windows
        .iter()
        .filter_map(|win| BoxStats::from_values(win))
        .collect();
    log::debug!("{name}: {} boxplot windows", boxes.len());

    let panel = |col, title: String, x_desc: String, y_desc: &str, kind| Panel {
        row,
        col,
        title,
        x_desc,
        y_desc: y_desc.to_string(),
        palette,
        kind,
    };

    Ok([
        panel(
            0,
            name.to_string(),
            time_desc.clone(),
            unit,
            time_series_kind(series, metrics, opts.sampling_interval),
        ),
        panel(
            1,
            format!("{name} Histogram"),
            unit.to_string(),
            "Frequency",
            PanelKind::Histogram(histogram),
        ),
        panel(
            2,
            format!("{name} Boxplot"),
            time_desc,
            unit,
            PanelKind::Boxplot {
                boxes,
                labels: window_set.labels,
            },
        ),
    ])
}

fn time_series_kind(series: &[f64], metrics: &MetricsRecord, sampling_interval: f64) -> PanelKind {
    let points = series
        .iter()
        .enumerate()
        .map(|(idx, &val)| (idx as f64 * sampling_interval, val))
        .collect();

    let annotate = |ext: &Extremum, name: &str| Annotation {
        x: ext.index as f64 * sampling_interval,
        y: ext.value,
        label: format!("{name}: ({})", ext.value),
    };

    PanelKind::TimeSeries {
        points,
        extrema: vec![annotate(&metrics.min, "Min"), annotate(&metrics.max, "Max")],
        band: Band {
            x_range: (0.0, series.len() as f64 * sampling_interval),
            center: metrics.median,
            half_width: metrics.std,
        },
    }
}
