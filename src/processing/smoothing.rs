use serde::{Deserialize, Serialize};

/// Default half-window of the centered moving average.
pub const DEFAULT_HALF_WINDOW: usize = 10;

/// Default window of the trailing rolling mean.
pub const DEFAULT_TRAILING_WINDOW: usize = 100;

/// Which moving average produces the trend line. The two variants are not
/// interchangeable: the centered one keeps every point defined and preserves
/// the endpoints, the trailing one lags and leaves its first outputs undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SmoothingMode {
    /// Centered window that shrinks symmetrically near both ends.
    Symmetric { half_window: usize },
    /// Backward-looking window; the first `window - 1` outputs are NaN.
    Trailing { window: usize },
}

impl Default for SmoothingMode {
    fn default() -> Self {
        SmoothingMode::Symmetric {
            half_window: DEFAULT_HALF_WINDOW,
        }
    }
}

impl SmoothingMode {
    pub fn apply(&self, series: &[f64]) -> Vec<f64> {
        match *self {
            SmoothingMode::Symmetric { half_window } => smooth(series, half_window),
            SmoothingMode::Trailing { window } => rolling_mean(series, window),
        }
    }

    pub fn is_symmetric(&self) -> bool {
        matches!(self, SmoothingMode::Symmetric { .. })
    }

    /// Same mode with a new window size (half-window for the centered variant).
    pub fn with_size(&self, size: usize) -> Self {
        match self {
            SmoothingMode::Symmetric { .. } => SmoothingMode::Symmetric { half_window: size },
            SmoothingMode::Trailing { .. } => SmoothingMode::Trailing { window: size },
        }
    }

    pub fn size(&self) -> usize {
        match *self {
            SmoothingMode::Symmetric { half_window } => half_window,
            SmoothingMode::Trailing { window } => window,
        }
    }

    pub fn label(&self) -> String {
        match self {
            SmoothingMode::Symmetric { half_window } => {
                format!("Moving average (centered, \u{00b1}{half_window})")
            }
            SmoothingMode::Trailing { window } => format!("Rolling mean (trailing, {window})"),
        }
    }
}

/// Centered moving average.
///
/// At index `i` the half-window is `min(half_window, i, len - 1 - i)` and the
/// output is the mean of `series[i - Li ..= i + Li]`. The window collapses to a
/// single point at both ends, so the first and last values pass through as is.
pub fn smooth(series: &[f64], half_window: usize) -> Vec<f64> {
    let n = series.len();
    if half_window == 0 {
        return series.to_vec();
    }

    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let li = half_window.min(i).min(n - 1 - i);
        let window = &series[i - li..=i + li];
        out.push(window.iter().sum::<f64>() / window.len() as f64);
    }
    out
}

/// Trailing rolling mean over the last `window` values.
/// Outputs before a full window is available are NaN.
pub fn rolling_mean(series: &[f64], window: usize) -> Vec<f64> {
    if window <= 1 {
        return series.to_vec();
    }

    let mut out = Vec::with_capacity(series.len());
    for i in 0..series.len() {
        if i + 1 < window {
            out.push(f64::NAN);
        } else {
            let slice = &series[i + 1 - window..=i];
            out.push(slice.iter().sum::<f64>() / window as f64);
        }
    }
    out
}
