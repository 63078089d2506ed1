use serde::Serialize;

// ---------------------------------------------------------------------------
// Least-squares line and quantile helpers
// ---------------------------------------------------------------------------

/// Fitted line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendFit {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Ordinary least-squares fit of `ys` against `xs`.
///
/// Returns `None` for fewer than two points or when the solution overflows.
/// When every `x` is identical the system is rank-deficient and the
/// minimum-norm solution is returned, which still predicts `mean(y)` at that
/// `x`.
pub fn fit_line(xs: &[f64], ys: &[f64]) -> Option<TrendFit> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let nf = n as f64;
    let mean_x = xs[..n].iter().sum::<f64>() / nf;
    let mean_y = ys[..n].iter().sum::<f64>() / nf;

    let (sxy, sxx) = xs[..n]
        .iter()
        .zip(&ys[..n])
        .fold((0.0, 0.0), |(sxy, sxx), (&x, &y)| {
            let dx = x - mean_x;
            (sxy + dx * (y - mean_y), sxx + dx * dx)
        });

    let fit = if sxx > 0.0 {
        let slope = sxy / sxx;
        TrendFit {
            slope,
            intercept: mean_y - slope * mean_x,
        }
    } else {
        // min ||(m, b)|| subject to m * x + b = mean_y, after unit column scaling
        let slope = if mean_x != 0.0 { mean_y / (2.0 * mean_x) } else { 0.0 };
        let intercept = if mean_x != 0.0 { mean_y / 2.0 } else { mean_y };
        TrendFit { slope, intercept }
    };

    (fit.slope.is_finite() && fit.intercept.is_finite()).then_some(fit)
}

/// `q`-th quantile with linear interpolation between order statistics
/// (`h = (n - 1) * q`). `None` for empty input.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let h = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    Some(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}
