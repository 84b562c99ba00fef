//! Return-series helpers.
//!
//! Basic moments over slices of periodic returns, the cumulative wealth
//! curve, and small preparation utilities for turning prices or a basket of
//! assets into return series.

use crate::{Error, Result};

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Variance with `ddof` delta degrees of freedom (0 = population, 1 = sample).
///
/// `None` when there are not more than `ddof` observations.
pub fn variance(values: &[f64], ddof: usize) -> Option<f64> {
    if values.len() <= ddof {
        return None;
    }
    let mean = mean(values)?;
    let sum_sq = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    Some(sum_sq / (values.len() - ddof) as f64)
}

/// Standard deviation with `ddof` delta degrees of freedom.
pub fn std_dev(values: &[f64], ddof: usize) -> Option<f64> {
    variance(values, ddof).map(f64::sqrt)
}

/// Population covariance (ddof = 0) between two aligned series.
pub fn population_covariance(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() {
        return None;
    }
    let mean_a = mean(a)?;
    let mean_b = mean(b)?;
    let sum = a
        .iter()
        .zip(b)
        .map(|(x, y)| (x - mean_a) * (y - mean_b))
        .sum::<f64>();
    Some(sum / a.len() as f64)
}

/// Running product of (1 + r): the wealth curve of one unit invested.
pub fn cumulative_returns(returns: &[f64]) -> Vec<f64> {
    returns
        .iter()
        .scan(1.0, |wealth, r| {
            *wealth *= 1.0 + r;
            Some(*wealth)
        })
        .collect()
}

/// Period-over-period percentage change of a price series.
///
/// The first point has no predecessor and is dropped. A change that is not
/// finite (missing or zero prices) stays in place as `NaN` so the output keeps
/// one entry per date; [`drop_incomplete_rows`] removes it together with the
/// same date of every other series.
pub fn returns_from_prices(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .map(|w| w[1] / w[0] - 1.0)
        .map(|r| if r.is_finite() { r } else { f64::NAN })
        .collect()
}

/// Remove every date on which any of the aligned `columns` is not finite.
///
/// Rows are dropped across all columns at once, so the surviving values keep
/// their pairing by date. Fails if the columns differ in length.
pub fn drop_incomplete_rows(columns: Vec<Vec<f64>>) -> Result<Vec<Vec<f64>>> {
    let Some(rows) = columns.first().map(Vec::len) else {
        return Ok(columns);
    };

    if let Some(bad) = columns.iter().find(|c| c.len() != rows) {
        return Err(Error::Configuration(format!(
            "Series must be aligned: expected {} observations, got {}",
            rows,
            bad.len()
        )));
    }

    let keep: Vec<bool> = (0..rows)
        .map(|i| columns.iter().all(|c| c[i].is_finite()))
        .collect();
    let dropped = keep.iter().filter(|&&k| !k).count();
    if dropped > 0 {
        tracing::debug!(dropped, rows, "Dropped incomplete rows");
    }

    Ok(columns
        .into_iter()
        .map(|column| {
            column
                .into_iter()
                .zip(&keep)
                .filter_map(|(value, &k)| k.then_some(value))
                .collect()
        })
        .collect())
}

/// Turn raw input series into an aligned portfolio and optional benchmark.
///
/// With `from_prices` every series is first converted with
/// [`returns_from_prices`]. An explicit `benchmark` wins over `assets`; the
/// assets otherwise form an equal-weighted benchmark. Dates that are
/// incomplete in any series in use are dropped from all of them before the
/// basket is averaged.
pub fn prepare_series(
    returns: Vec<f64>,
    benchmark: Option<Vec<f64>>,
    assets: Option<Vec<Vec<f64>>>,
    from_prices: bool,
) -> Result<(Vec<f64>, Option<Vec<f64>>)> {
    let convert = |series: Vec<f64>| {
        if from_prices {
            returns_from_prices(&series)
        } else {
            series
        }
    };

    let mut columns = vec![convert(returns)];
    let basket = match (benchmark, assets) {
        (Some(benchmark), _) => {
            columns.push(convert(benchmark));
            false
        }
        (None, Some(assets)) => {
            if assets.is_empty() {
                return Err(Error::InsufficientData("No asset series supplied".to_string()));
            }
            columns.extend(assets.into_iter().map(convert));
            true
        }
        (None, None) => false,
    };

    let mut columns = drop_incomplete_rows(columns)?.into_iter();
    let returns = columns.next().unwrap_or_default();
    let rest: Vec<Vec<f64>> = columns.collect();

    let benchmark = if basket {
        Some(equal_weight_returns(&rest)?)
    } else {
        rest.into_iter().next()
    };

    Ok((returns, benchmark))
}

/// Equal-weighted basket return: the per-period mean across aligned assets.
pub fn equal_weight_returns(assets: &[Vec<f64>]) -> Result<Vec<f64>> {
    let first = assets
        .first()
        .ok_or_else(|| Error::InsufficientData("No asset series supplied".to_string()))?;

    if let Some(bad) = assets.iter().find(|a| a.len() != first.len()) {
        return Err(Error::Configuration(format!(
            "Asset series must be aligned: expected {} observations, got {}",
            first.len(),
            bad.len()
        )));
    }

    let count = assets.len() as f64;
    Ok((0..first.len())
        .map(|i| assets.iter().map(|a| a[i]).sum::<f64>() / count)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0]).unwrap(), 2.5);
    }

    #[test]
    fn test_variance_ddof() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];

        // Population variance of this classic sample is exactly 4
        assert_relative_eq!(variance(&values, 0).unwrap(), 4.0);
        assert_relative_eq!(variance(&values, 1).unwrap(), 32.0 / 7.0);
        assert_relative_eq!(std_dev(&values, 0).unwrap(), 2.0);
    }

    #[test]
    fn test_variance_too_short() {
        assert_eq!(variance(&[], 0), None);
        assert_eq!(variance(&[0.01], 1), None);
        assert_eq!(variance(&[0.01], 0), Some(0.0));
    }

    #[test]
    fn test_population_covariance() {
        let a = [1.0, 2.0, 3.0];
        let b = [2.0, 4.0, 6.0];

        // cov(a, 2a) = 2 var(a) = 2 * 2/3
        assert_relative_eq!(population_covariance(&a, &b).unwrap(), 4.0 / 3.0);
        assert_eq!(population_covariance(&a, &b[..2]), None);
    }

    #[test]
    fn test_cumulative_returns() {
        let curve = cumulative_returns(&[0.10, -0.50, 1.0]);

        assert_eq!(curve.len(), 3);
        assert_relative_eq!(curve[0], 1.10, epsilon = 1e-12);
        assert_relative_eq!(curve[1], 0.55, epsilon = 1e-12);
        assert_relative_eq!(curve[2], 1.10, epsilon = 1e-12);
        assert!(cumulative_returns(&[]).is_empty());
    }

    #[test]
    fn test_returns_from_prices() {
        let returns = returns_from_prices(&[100.0, 110.0, 99.0, 0.0, 50.0]);

        // 0 -> 50 is an infinite change and is marked, not removed
        assert_eq!(returns.len(), 4);
        assert_relative_eq!(returns[0], 0.10, epsilon = 1e-12);
        assert_relative_eq!(returns[1], -0.10, epsilon = 1e-12);
        assert_relative_eq!(returns[2], -1.0);
        assert!(returns[3].is_nan());

        assert!(returns_from_prices(&[100.0]).is_empty());
    }

    #[test]
    fn test_drop_incomplete_rows_keeps_dates_paired() {
        let rows = drop_incomplete_rows(vec![
            vec![0.01, f64::NAN, 0.03, 0.04],
            vec![0.11, 0.12, f64::INFINITY, 0.14],
        ])
        .unwrap();

        assert_eq!(rows, vec![vec![0.01, 0.04], vec![0.11, 0.14]]);
        assert!(drop_incomplete_rows(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_drop_incomplete_rows_ragged() {
        let result = drop_incomplete_rows(vec![vec![0.01, 0.02], vec![0.01]]);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_prepare_series_zero_prices_on_different_dates() {
        // Stock is unpriced on date 2, market on date 3
        let stock = vec![100.0, 0.0, 50.0, 60.0];
        let market = vec![100.0, 110.0, 0.0, 50.0];

        let (returns, benchmark) = prepare_series(stock, Some(market), None, true).unwrap();
        let benchmark = benchmark.unwrap();

        // Only the first change is finite in both series
        assert_eq!(returns.len(), 1);
        assert_eq!(benchmark.len(), 1);
        assert_relative_eq!(returns[0], -1.0, epsilon = 1e-12);
        assert_relative_eq!(benchmark[0], 0.10, epsilon = 1e-12);
    }

    #[test]
    fn test_prepare_series_asset_basket_from_prices() {
        let stock = vec![100.0, 101.0, 102.0, 103.0];
        let assets = vec![vec![50.0, 55.0, 0.0, 60.0], vec![20.0, 0.0, 22.0, 23.0]];

        let (returns, benchmark) = prepare_series(stock, None, Some(assets), true).unwrap();
        let benchmark = benchmark.unwrap();

        // The second change is lost to the second asset, the third to the first
        assert_eq!(returns.len(), 1);
        assert_relative_eq!(returns[0], 0.01, epsilon = 1e-12);
        assert_eq!(benchmark.len(), 1);
        assert_relative_eq!(benchmark[0], (0.10 - 1.0) / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_prepare_series_returns_passthrough() {
        let (returns, benchmark) =
            prepare_series(vec![0.01, -0.02], None, None, false).unwrap();
        assert_eq!(returns, vec![0.01, -0.02]);
        assert_eq!(benchmark, None);

        let ragged = prepare_series(vec![0.01, -0.02], Some(vec![0.01]), None, false);
        assert!(matches!(ragged, Err(Error::Configuration(_))));

        let empty_basket = prepare_series(vec![0.01], None, Some(Vec::new()), false);
        assert!(matches!(empty_basket, Err(Error::InsufficientData(_))));
    }

    #[test]
    fn test_equal_weight_returns() {
        let basket = vec![vec![0.02, -0.01, 0.03], vec![0.00, 0.01, -0.01]];
        let market = equal_weight_returns(&basket).unwrap();

        assert_eq!(market.len(), 3);
        assert_relative_eq!(market[0], 0.01, epsilon = 1e-12);
        assert_relative_eq!(market[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(market[2], 0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_equal_weight_returns_invalid() {
        assert!(matches!(
            equal_weight_returns(&[]),
            Err(Error::InsufficientData(_))
        ));

        let ragged = vec![vec![0.01, 0.02], vec![0.01]];
        assert!(matches!(
            equal_weight_returns(&ragged),
            Err(Error::Configuration(_))
        ));
    }
}
