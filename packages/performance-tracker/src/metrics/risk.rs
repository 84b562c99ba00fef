//! Risk statistics over raw (non-annualized) return series.
//!
//! Provides beta, max drawdown, parametric VaR and expected shortfall. All
//! results are fractions; scaling to percent happens in the tracker.

use crate::series::{self, cumulative_returns};

/// Benchmark variance at or below this fraction of the benchmark's mean
/// square counts as a constant benchmark.
const RELATIVE_VARIANCE_TOLERANCE: f64 = 1e-12;

/// Sensitivity of `returns` to `benchmark`.
///
/// Population covariance over population variance of the benchmark (both
/// ddof = 0). `None` when the series are misaligned, empty, or the benchmark
/// is constant. Constancy is judged relative to the benchmark's own scale, so
/// a benchmark that barely moves still has a beta.
pub fn beta(returns: &[f64], benchmark: &[f64]) -> Option<f64> {
    let covariance = series::population_covariance(returns, benchmark)?;
    let market_variance = series::variance(benchmark, 0)?;
    let mean_square = benchmark.iter().map(|r| r * r).sum::<f64>() / benchmark.len() as f64;

    if market_variance <= RELATIVE_VARIANCE_TOLERANCE * mean_square {
        tracing::debug!("Benchmark variance is zero, beta is undefined");
        return None;
    }

    Some(covariance / market_variance)
}

/// Maximum drawdown of the wealth curve built from `returns`.
///
/// Returns the most negative `(wealth - running_max) / running_max` as a
/// decimal (e.g. -0.15 for a 15% drawdown), so the result is never positive.
/// The running maximum starts at the first point of the curve.
pub fn max_drawdown(returns: &[f64]) -> Option<f64> {
    let cumulative = cumulative_returns(returns);
    let mut running_max = *cumulative.first()?;
    let mut max_drawdown = 0.0_f64;

    for &value in &cumulative {
        if value > running_max {
            running_max = value;
        }
        let drawdown = (value - running_max) / running_max;
        if drawdown < max_drawdown {
            max_drawdown = drawdown;
        }
    }

    Some(max_drawdown)
}

/// Parametric value-at-risk.
///
/// The `alpha` quantile of a normal distribution with the sample mean and
/// population standard deviation of `returns`.
pub fn value_at_risk(returns: &[f64], alpha: f64) -> Option<f64> {
    let mean = series::mean(returns)?;
    let std = series::std_dev(returns, 0)?;
    let var = mean + norm_ppf(alpha) * std;
    var.is_finite().then_some(var)
}

/// Mean of the returns strictly below `threshold`.
///
/// `None` when no observation breaches the threshold.
pub fn expected_shortfall(returns: &[f64], threshold: f64) -> Option<f64> {
    let tail: Vec<f64> = returns.iter().copied().filter(|&r| r < threshold).collect();
    series::mean(&tail)
}

/// Inverse cumulative distribution function for standard normal distribution.
///
/// Uses Acklam's algorithm for high accuracy across the full range.
/// Source: https://web.archive.org/web/20151110174102/http://home.online.no/~pjacklam/notes/invnorm/
pub fn norm_ppf(p: f64) -> f64 {
    // Coefficients in rational approximations
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];

    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];

    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];

    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];

    const P_LOW: f64 = 0.02425;
    const P_HIGH: f64 = 1.0 - P_LOW;

    if p.is_nan() {
        return f64::NAN;
    }
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= P_HIGH {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}
