//! Drawing of a [`RenderableFigure`] with plotters.

use crate::figure::{Annotation, Band, N_COLS, N_ROWS, Panel, PanelKind, RenderableFigure, Rgb};
use crate::stats::{BoxStats, Histogram};
use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::{fs, path::Path};

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

const CAPTION_SIZE: u32 = 22;
const MAX_BOX_TICKS: usize = 24;

/// Draw the figure into an SVG document.
pub fn to_svg(fig: &RenderableFigure) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, fig.canvas_size).into_drawing_area();
        root.fill(&WHITE).context("failed to fill background")?;

        let areas = root.split_evenly((N_ROWS, N_COLS));
        for panel in &fig.panels {
            let area = areas
                .get(panel.row * N_COLS + panel.col)
                .with_context(|| format!("panel {:?} is outside of the grid", panel.title))?;
            draw_panel(area, panel)
                .with_context(|| format!("failed to draw panel {:?}", panel.title))?;
        }

        root.present().context("failed to finish figure")?;
    }
    Ok(svg)
}

/// Draw the figure and write it to an SVG file.
///
/// The file is only written once the whole figure has been drawn.
pub fn save<P: AsRef<Path>>(fig: &RenderableFigure, file: P) -> Result<()> {
    let file = file.as_ref();
    let svg = to_svg(fig)?;
    fs::write(file, svg).with_context(|| format!("failed to write {file:?}"))?;
    Ok(())
}

fn draw_panel(area: &Area, panel: &Panel) -> Result<()> {
    match &panel.kind {
        PanelKind::TimeSeries {
            points,
            extrema,
            band,
        } => draw_time_series(area, panel, points, extrema, band),
        PanelKind::Histogram(hist) => draw_histogram(area, panel, hist),
        PanelKind::Boxplot { boxes, labels } => draw_boxplot(area, panel, boxes, labels),
    }
}

fn draw_time_series(
    area: &Area,
    panel: &Panel,
    points: &[(f64, f64)],
    extrema: &[Annotation],
    band: &Band,
) -> Result<()> {
    let line_color = rgb(panel.palette.line);
    let marker_color = rgb(panel.palette.marker);
    let band_color = rgb(panel.palette.band);

    let band_low = band.center - band.half_width;
    let band_high = band.center + band.half_width;
    let (y_min, y_max) = padded_range(
        points.iter().map(|&(_, y)| y).chain([band_low, band_high]),
    );

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", CAPTION_SIZE))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(band.x_range.0..band.x_range.1, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc(panel.x_desc.as_str())
        .y_desc(panel.y_desc.as_str())
        .draw()?;

    chart.draw_series(LineSeries::new(points.iter().copied(), &line_color))?;

    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(band.x_range.0, band_low), (band.x_range.1, band_high)],
            band_color.mix(0.2).filled(),
        )))?
        .label("Standard Deviation")
        .legend(move |(x, y)| {
            Rectangle::new([(x, y - 5), (x + 15, y + 5)], band_color.mix(0.2).filled())
        });

    chart
        .draw_series(LineSeries::new(
            [(band.x_range.0, band.center), (band.x_range.1, band.center)],
            band_color.stroke_width(2),
        ))?
        .label("Median")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 15, y)], band_color.stroke_width(2)));

    chart.draw_series(extrema.iter().map(|ann| {
        EmptyElement::at((ann.x, ann.y))
            + Circle::new((0, 0), 4, marker_color.filled())
            + Text::new(ann.label.clone(), (-80, 8), ("sans-serif", 14).into_font())
    }))?;

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}

fn draw_histogram(area: &Area, panel: &Panel, hist: &Histogram) -> Result<()> {
    let fill = rgb(panel.palette.line);
    let x_min = hist.start;
    let x_max = hist.start + hist.bin_width * hist.counts.len() as f64;
    let max_count = hist.counts.iter().copied().max().unwrap_or(0);
    let y_max = (max_count as f64 * 1.1).max(1.0);

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", CAPTION_SIZE))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(panel.x_desc.as_str())
        .y_desc(panel.y_desc.as_str())
        .y_label_formatter(&|y| format!("{y:.0}"))
        .draw()?;

    chart.draw_series(hist.bins().map(|(left, right, count)| {
        Rectangle::new([(left, 0.0), (right, count as f64)], fill.filled())
    }))?;

    Ok(())
}

fn draw_boxplot(area: &Area, panel: &Panel, boxes: &[BoxStats], labels: &[String]) -> Result<()> {
    let fill = rgb(panel.palette.boxes);
    let (y_min, y_max) = padded_range(boxes.iter().flat_map(|stats| {
        [stats.lower_whisker, stats.upper_whisker]
            .into_iter()
            .chain(stats.outliers.iter().copied())
    }));
    let x_max = boxes.len() as f64 - 0.5;

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", CAPTION_SIZE))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5..x_max, y_min..y_max)?;

    // Ticks fall on box centers; anything in between stays unlabeled.
    let tick_label = |x: &f64| {
        let pos = x.round();
        if (x - pos).abs() > 1e-6 || pos < 0.0 {
            return String::new();
        }
        labels.get(pos as usize).cloned().unwrap_or_default()
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(boxes.len().min(MAX_BOX_TICKS))
        .x_label_formatter(&tick_label)
        .x_label_style(("sans-serif", 12).into_font().transform(FontTransform::Rotate90))
        .x_desc(panel.x_desc.as_str())
        .y_desc(panel.y_desc.as_str())
        .draw()?;

    let half_width = 0.3;
    let cap_width = 0.15;
    for (i_box, stats) in boxes.iter().enumerate() {
        let x = i_box as f64;
        chart.draw_series([
            Rectangle::new(
                [(x - half_width, stats.q1), (x + half_width, stats.q3)],
                fill.filled(),
            ),
            Rectangle::new(
                [(x - half_width, stats.q1), (x + half_width, stats.q3)],
                BLACK.stroke_width(1),
            ),
        ])?;

        chart.draw_series([
            PathElement::new(
                vec![(x - half_width, stats.median), (x + half_width, stats.median)],
                BLACK.stroke_width(2),
            ),
            PathElement::new(vec![(x, stats.lower_whisker), (x, stats.q1)], BLACK.stroke_width(1)),
            PathElement::new(vec![(x, stats.q3), (x, stats.upper_whisker)], BLACK.stroke_width(1)),
            PathElement::new(
                vec![(x - cap_width, stats.lower_whisker), (x + cap_width, stats.lower_whisker)],
                BLACK.stroke_width(1),
            ),
            PathElement::new(
                vec![(x - cap_width, stats.upper_whisker), (x + cap_width, stats.upper_whisker)],
                BLACK.stroke_width(1),
            ),
        ])?;

        chart.draw_series(
            stats
                .outliers
                .iter()
                .map(|&val| Circle::new((x, val), 3, BLACK.stroke_width(1))),
        )?;
    }

    Ok(())
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

/// Bounds of `vals` widened by 5% on each side; flat data gets a unit margin.
fn padded_range(vals: impl Iterator<Item = f64>) -> (f64, f64) {
    let (low, high) = vals.fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), val| {
        (low.min(val), high.max(val))
    });
    if !low.is_finite() || !high.is_finite() {
        return (0.0, 1.0);
    }
    let pad = (high - low) * 0.05;
    if pad < 1e-9 {
        return (low - 1.0, high + 1.0);
    }
    (low - pad, high + pad)
}
