use crate::error::ReportError;

/// Names of the metrics in a [`MetricsRecord`], in report order.
pub const METRIC_NAMES: [&str; 7] = ["mean", "std", "median", "range", "iqr", "max", "min"];

/// Position and value of an extreme sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremum {
    /// Index of the first occurrence in the original series.
    pub index: usize,
    pub value: f64,
}

/// Descriptive statistics of one sample series.
///
/// `mean`, `std`, `range` and `iqr` are rounded to two decimals;
/// `median` and the extrema are kept as computed.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsRecord {
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    pub median: f64,
    pub range: f64,
    /// Interquartile range with linearly interpolated quartiles.
    pub iqr: f64,
    pub max: Extremum,
    pub min: Extremum,
}

impl MetricsRecord {
    /// Scalar value of every metric, keyed by name in [`METRIC_NAMES`] order.
    ///
    /// The extrema collapse to their values; their indices are dropped.
    pub fn scalar_values(&self) -> Vec<(String, f64)> {
        let vals = [
            self.mean,
            self.std,
            self.median,
            self.range,
            self.iqr,
            self.max.value,
            self.min.value,
        ];
        METRIC_NAMES
            .iter()
            .zip(vals)
            .map(|(name, val)| (name.to_string(), val))
            .collect()
    }
}

/// Compute the [`MetricsRecord`] of a series.
///
/// # Errors
/// Returns [`ReportError::EmptyInput`] for an empty series and
/// [`ReportError::TypeMismatch`] if any element is NaN or infinite.
pub fn compute_metrics(series: &[f64]) -> Result<MetricsRecord, ReportError> {
    if series.is_empty() {
        return Err(ReportError::EmptyInput);
    }
    if let Some((index, &value)) = series.iter().enumerate().find(|(_, val)| !val.is_finite()) {
        return Err(ReportError::TypeMismatch { index, value });
    }

    let sorted = sorted_copy(series);
    let max = first_extremum(series, |val, best| val > best);
    let min = first_extremum(series, |val, best| val < best);

    Ok(MetricsRecord {
        mean: round_2(compute_mean(series)),
        std: round_2(compute_pop_var(series).sqrt()),
        median: compute_median(&sorted),
        range: round_2(max.value - min.value),
        iqr: round_2(percentile(&sorted, 0.75) - percentile(&sorted, 0.25)),
        max,
        min,
    })
}

/// Quartiles, whiskers and outliers of one group of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest sample within 1.5 IQR below `q1`.
    pub lower_whisker: f64,
    /// Largest sample within 1.5 IQR above `q3`.
    pub upper_whisker: f64,
    /// Samples beyond the whiskers, ascending.
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Returns `None` for an empty group.
    pub fn from_values(vals: &[f64]) -> Option<Self> {
        if vals.is_empty() {
            return None;
        }
        let sorted = sorted_copy(vals);
        let q1 = percentile(&sorted, 0.25);
        let q3 = percentile(&sorted, 0.75);
        let reach = 1.5 * (q3 - q1);
        let (low_fence, high_fence) = (q1 - reach, q3 + reach);

        let lower_whisker = sorted.iter().copied().find(|&v| v >= low_fence).unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < low_fence || v > high_fence)
            .collect();

        Some(Self {
            q1,
            median: compute_median(&sorted),
            q3,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

/// Equal-width histogram of a series.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub start: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `vals` into `n_bins` equal-width bins spanning their range.
    ///
    /// The last bin is closed on the right. A constant series is binned
    /// over a unit-wide range centered on its value.
    pub fn from_values(vals: &[f64], n_bins: usize) -> Option<Self> {
        if vals.is_empty() || n_bins == 0 {
            return None;
        }
        let mut low = vals.iter().copied().fold(f64::INFINITY, f64::min);
        let mut high = vals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if low == high {
            low -= 0.5;
            high += 0.5;
        }
        let bin_width = (high - low) / n_bins as f64;

        let mut counts = vec![0; n_bins];
        for &val in vals {
            let i_bin = ((val - low) / bin_width) as usize;
            counts[i_bin.min(n_bins - 1)] += 1;
        }

        Some(Self {
            start: low,
            bin_width,
            counts,
        })
    }

    /// Iterate over `(left_edge, right_edge, count)` for every bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.counts.iter().enumerate().map(|(i_bin, &count)| {
            let left = self.start + i_bin as f64 * self.bin_width;
            (left, left + self.bin_width, count)
        })
    }
}

/// Value at fraction `p` of a sorted slice, interpolating linearly between ranks.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let rank = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let i_low = rank.floor() as usize;
    let i_high = rank.ceil() as usize;
    sorted[i_low] + (rank - i_low as f64) * (sorted[i_high] - sorted[i_low])
}

fn compute_median(sorted: &[f64]) -> f64 {
    let n_vals = sorted.len();
    if n_vals == 0 {
        return f64::NAN;
    }
    if n_vals % 2 == 0 {
        (sorted[n_vals / 2 - 1] + sorted[n_vals / 2]) / 2.0
    } else {
        sorted[n_vals / 2]
    }
}

fn compute_mean(series: &[f64]) -> f64 {
    if series.is_empty() {
        return f64::NAN;
    }
    series.iter().sum::<f64>() / series.len() as f64
}

fn compute_pop_var(series: &[f64]) -> f64 {
    let mean = compute_mean(series);
    series.iter().map(|&val| (val - mean).powi(2)).sum::<f64>() / series.len() as f64
}

fn first_extremum(series: &[f64], beats: impl Fn(f64, f64) -> bool) -> Extremum {
    let mut best = Extremum {
        index: 0,
        value: series[0],
    };
    for (index, &value) in series.iter().enumerate().skip(1) {
        if beats(value, best.value) {
            best = Extremum { index, value };
        }
    }
    best
}

fn sorted_copy(series: &[f64]) -> Vec<f64> {
    let mut sorted = series.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

fn round_2(val: f64) -> f64 {
    (val * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn metrics_of_series_with_spike() {
        let metrics = compute_metrics(&[20.0, 21.0, 22.0, 23.0, 100.0]).unwrap();
        assert_relative_eq!(metrics.mean, 37.2);
        assert_relative_eq!(metrics.std, 31.42);
        assert_relative_eq!(metrics.median, 22.0);
        assert_relative_eq!(metrics.range, 80.0);
        assert_relative_eq!(metrics.iqr, 2.0);
        assert_eq!(
            metrics.max,
            Extremum {
                index: 4,
                value: 100.0
            }
        );
        assert_eq!(
            metrics.min,
            Extremum {
                index: 0,
                value: 20.0
            }
        );
    }

    #[test]
    fn empty_series_is_rejected() {
        assert_eq!(compute_metrics(&[]), Err(ReportError::EmptyInput));
    }

    #[test]
    fn non_finite_element_is_rejected() {
        let err = compute_metrics(&[1.0, 2.0, f64::INFINITY]).unwrap_err();
        assert_eq!(
            err,
            ReportError::TypeMismatch {
                index: 2,
                value: f64::INFINITY
            }
        );
        assert!(matches!(
            compute_metrics(&[f64::NAN]),
            Err(ReportError::TypeMismatch { index: 0, .. })
        ));
    }

    #[test]
    fn extrema_ties_keep_first_occurrence() {
        let metrics = compute_metrics(&[1.0, 3.0, 3.0, 1.0]).unwrap();
        assert_eq!(metrics.max.index, 1);
        assert_eq!(metrics.min.index, 0);
    }

    #[test]
    fn reordering_changes_only_extremum_indices() {
        let series = [4.5, 1.25, 9.0, 3.0, 7.75, 2.0];
        let reversed: Vec<f64> = series.iter().rev().copied().collect();
        let a = compute_metrics(&series).unwrap();
        let b = compute_metrics(&reversed).unwrap();

        assert_relative_eq!(a.mean, b.mean);
        assert_relative_eq!(a.std, b.std);
        assert_relative_eq!(a.median, b.median);
        assert_relative_eq!(a.range, b.range);
        assert_relative_eq!(a.iqr, b.iqr);
        assert_eq!(a.max.value, b.max.value);
        assert_eq!(a.max.index, 2);
        assert_eq!(b.max.index, 3);
    }

    #[test]
    fn median_is_not_rounded() {
        let metrics = compute_metrics(&[0.1234]).unwrap();
        assert_relative_eq!(metrics.mean, 0.12);
        assert_relative_eq!(metrics.median, 0.1234);
        assert_relative_eq!(metrics.std, 0.0);
    }

    #[test]
    fn even_length_median_and_iqr() {
        let metrics = compute_metrics(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_relative_eq!(metrics.median, 2.5);
        assert_relative_eq!(metrics.iqr, 1.5);
    }

    #[test]
    fn scalar_values_follow_metric_order() {
        let metrics = compute_metrics(&[20.0, 21.0, 22.0, 23.0, 100.0]).unwrap();
        let vals = metrics.scalar_values();
        let names: Vec<_> = vals.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, METRIC_NAMES);
        assert_eq!(vals[5].1, 100.0);
        assert_eq!(vals[6].1, 20.0);
    }

    #[test]
    fn percentile_interpolates_between_ranks() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(percentile(&sorted, 0.25), 1.75);
        assert_relative_eq!(percentile(&sorted, 0.75), 3.25);
        assert_relative_eq!(percentile(&sorted, 1.0), 4.0);
        assert!(percentile(&[], 0.5).is_nan());
    }

    #[test]
    fn box_stats_separate_outliers() {
        let stats = BoxStats::from_values(&[20.0, 21.0, 22.0, 23.0, 100.0]).unwrap();
        assert_relative_eq!(stats.q1, 21.0);
        assert_relative_eq!(stats.median, 22.0);
        assert_relative_eq!(stats.q3, 23.0);
        assert_relative_eq!(stats.lower_whisker, 20.0);
        assert_relative_eq!(stats.upper_whisker, 23.0);
        assert_eq!(stats.outliers, vec![100.0]);
        assert!(BoxStats::from_values(&[]).is_none());
    }

    #[test]
    fn histogram_counts_every_sample() {
        let vals = [0.0, 1.0, 2.0, 3.0, 4.0, 4.0];
        let hist = Histogram::from_values(&vals, 4).unwrap();
        assert_relative_eq!(hist.start, 0.0);
        assert_relative_eq!(hist.bin_width, 1.0);
        assert_eq!(hist.counts, vec![1, 1, 1, 3]);
        assert_eq!(hist.counts.iter().sum::<usize>(), vals.len());

        let (left, right, count) = hist.bins().last().unwrap();
        assert_relative_eq!(left, 3.0);
        assert_relative_eq!(right, 4.0);
        assert_eq!(count, 3);
    }

    #[test]
    fn histogram_of_constant_series() {
        let hist = Histogram::from_values(&[5.0, 5.0], 40).unwrap();
        assert_relative_eq!(hist.start, 4.5);
        assert_relative_eq!(hist.bin_width, 1.0 / 40.0);
        assert_eq!(hist.counts.iter().filter(|&&count| count == 2).count(), 1);
        assert_eq!(hist.counts.iter().sum::<usize>(), 2);
    }
}
