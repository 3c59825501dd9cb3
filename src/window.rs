use crate::error::ReportError;

/// Contiguous windows of a series with their time-span labels.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSet<'a> {
    /// Windows in series order; only the last one may be shorter.
    pub windows: Vec<&'a [f64]>,
    /// One `"{start}-{end}"` label per window, in time units.
    pub labels: Vec<String>,
}

/// Split `series` into windows spanning `scale` time units each.
///
/// The window length is `scale / sampling_interval` samples, rounded to the
/// nearest integer. A trailing partial window is kept.
///
/// # Errors
/// Returns [`ReportError::InvalidScale`] if the window length is below one
/// sample or either argument is not a positive finite number.
pub fn window_series(
    series: &[f64],
    sampling_interval: f64,
    scale: f64,
) -> Result<WindowSet<'_>, ReportError> {
    let windows: Vec<_> = series.chunks(window_len(sampling_interval, scale)?).collect();
    let labels = (0..windows.len())
        .map(|i_win| {
            format!(
                "{}-{}",
                format_bound(i_win as f64 * scale),
                format_bound((i_win + 1) as f64 * scale)
            )
        })
        .collect();

    Ok(WindowSet { windows, labels })
}

/// Number of samples in a window spanning `scale` time units.
///
/// # Errors
/// Returns [`ReportError::InvalidScale`] if the length rounds below one
/// sample or either argument is not a positive finite number.
pub fn window_len(sampling_interval: f64, scale: f64) -> Result<usize, ReportError> {
    let invalid = || ReportError::InvalidScale {
        scale,
        interval: sampling_interval,
    };
    if !(sampling_interval.is_finite() && sampling_interval > 0.0) {
        return Err(invalid());
    }
    if !(scale.is_finite() && scale > 0.0) {
        return Err(invalid());
    }
    let len = (scale / sampling_interval).round();
    if len < 1.0 {
        return Err(invalid());
    }
    Ok(len as usize)
}

fn format_bound(val: f64) -> String {
    let val = (val * 100.0).round() / 100.0;
    format!("{val}")
}
