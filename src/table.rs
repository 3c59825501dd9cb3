//! Text summary of the metrics of every quantity.

use crate::error::ReportError;
use std::fmt;

/// Scalar metric values of one quantity, in report order.
pub type MetricValues = Vec<(String, f64)>;

/// One-line description of every metric.
pub const METRIC_DESCRIPTIONS: [(&str, &str); 7] = [
    ("mean", "Average of the data"),
    ("std", "Dispersion of the data"),
    ("median", "Central tendency"),
    ("range", "Range of the data"),
    ("iqr", "Range between the 1st and 3rd quartile"),
    ("max", "Maximum value"),
    ("min", "Minimum value"),
];

/// Left-aligned table with a header row.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl SummaryTable {
    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows, header included.
    pub fn n_rows(&self) -> usize {
        self.rows.len() + 1
    }

    pub fn n_cols(&self) -> usize {
        self.header.len()
    }

    fn col_widths(&self) -> Vec<usize> {
        self.header()
            .iter()
            .enumerate()
            .map(|(i_col, name)| {
                self.rows()
                    .iter()
                    .filter_map(|row| row.get(i_col))
                    .chain(std::iter::once(name))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

impl fmt::Display for SummaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.col_widths();

        let rule = widths.iter().fold(String::from("+"), |mut rule, &width| {
            rule.push_str(&"-".repeat(width + 2));
            rule.push('+');
            rule
        });
        let write_row = |f: &mut fmt::Formatter<'_>, row: &[String]| -> fmt::Result {
            write!(f, "|")?;
            for (cell, &width) in row.iter().zip(&widths) {
                write!(f, " {cell:<width$} |")?;
            }
            writeln!(f)
        };

        writeln!(f, "{rule}")?;
        write_row(f, self.header())?;
        writeln!(f, "{rule}")?;
        for row in self.rows() {
            write_row(f, row)?;
        }
        write!(f, "{rule}")
    }
}

/// Assemble the summary table of several quantities.
///
/// Columns are the metric label, one column per quantity in the given order
/// and the description; rows follow the metric order of the first quantity.
/// `Description` counts as one more value column, so there are
/// quantity count + 1 value columns next to the metric label.
///
/// # Errors
/// Returns [`ReportError::InconsistentMetricSet`] if the quantities do not
/// share the same metric names.
pub fn build_summary_table(
    metrics_by_quantity: &[(&str, MetricValues)],
    descriptions: &[(&str, &str)],
) -> Result<SummaryTable, ReportError> {
    let metric_names: Vec<&str> = metrics_by_quantity
        .first()
        .map(|(_, vals)| vals.iter().map(|(name, _)| name.as_str()).collect())
        .unwrap_or_default();

    if let Some((first, first_vals)) = metrics_by_quantity.first() {
        let first_names = sorted_names(first_vals);
        for (other, other_vals) in &metrics_by_quantity[1..] {
            let other_names = sorted_names(other_vals);
            if other_names != first_names {
                return Err(ReportError::InconsistentMetricSet {
                    first: first.to_string(),
                    first_names,
                    other: other.to_string(),
                    other_names,
                });
            }
        }
    }

    let header: Vec<String> = std::iter::once("metric")
        .chain(metrics_by_quantity.iter().map(|(name, _)| *name))
        .chain(std::iter::once("description"))
        .map(capitalize)
        .collect();

    let rows: Vec<Vec<String>> = metric_names
        .iter()
        .map(|&metric| {
            let vals = metrics_by_quantity.iter().map(|(_, vals)| {
                vals.iter()
                    .find(|(name, _)| name == metric)
                    .map(|(_, val)| format!("{val}"))
                    .unwrap_or_default()
            });
            let description = descriptions
                .iter()
                .find(|(name, _)| *name == metric)
                .map(|(_, text)| text.to_string())
                .unwrap_or_default();

            std::iter::once(capitalize(metric))
                .chain(vals)
                .chain(std::iter::once(description))
                .collect::<Vec<_>>()
        })
        .collect();

    Ok(SummaryTable { header, rows })
}

fn sorted_names(vals: &MetricValues) -> Vec<String> {
    let mut names: Vec<_> = vals.iter().map(|(name, _)| name.clone()).collect();
    names.sort();
    names
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
