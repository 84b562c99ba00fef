//! Annualized return and volatility.

use crate::series;

/// Compound growth of one unit over the whole series: ∏(1 + r) - 1.
pub fn total_return(returns: &[f64]) -> f64 {
    returns.iter().map(|r| 1.0 + r).product::<f64>() - 1.0
}

/// Geometric annualized return as a decimal.
///
/// The compounded growth is raised to `periods_per_year / n`. `None` for an
/// empty series or when cumulative losses exceed 100%, which has no real root.
pub fn annualize_return(returns: &[f64], periods_per_year: usize) -> Option<f64> {
    if returns.is_empty() {
        return None;
    }

    let growth = 1.0 + total_return(returns);
    if growth < 0.0 {
        return None;
    }

    let years = returns.len() as f64 / periods_per_year as f64;
    let annual = growth.powf(1.0 / years) - 1.0;

    annual.is_finite().then_some(annual)
}

/// Sample standard deviation (ddof = 1) scaled by sqrt(periods_per_year).
pub fn annualized_volatility(returns: &[f64], periods_per_year: usize) -> Option<f64> {
    series::std_dev(returns, 1).map(|std| std * (periods_per_year as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_total_return() {
        assert_relative_eq!(total_return(&[0.10, 0.10]), 0.21, epsilon = 1e-12);
        assert_eq!(total_return(&[]), 0.0);
    }

    #[test]
    fn test_annualize_return_one_year_is_total_return() {
        let returns: Vec<f64> = (0..52).map(|i| if i % 2 == 0 { 0.03 } else { -0.02 }).collect();

        let annual = annualize_return(&returns, 52).unwrap();
        assert_relative_eq!(annual, total_return(&returns), epsilon = 1e-12);
    }

    #[test]
    fn test_annualize_return_half_year() {
        // 10% over 26 weeks compounds to 21% over 52
        let mut returns = vec![0.0; 26];
        returns[0] = 0.10;

        assert_relative_eq!(annualize_return(&returns, 52).unwrap(), 0.21, epsilon = 1e-12);
    }

    #[test]
    fn test_annualize_return_degenerate() {
        assert_eq!(annualize_return(&[], 252), None);

        // Losing more than everything has no real fractional root
        assert_eq!(annualize_return(&[-1.5], 252), None);
    }

    #[test]
    fn test_annualized_volatility() {
        let returns = [0.01, -0.01, 0.01, -0.01];

        // Sample std is sqrt(4 * 0.0001 / 3)
        let expected = (0.0004_f64 / 3.0).sqrt() * 52.0_f64.sqrt();
        assert_relative_eq!(
            annualized_volatility(&returns, 52).unwrap(),
            expected,
            max_relative = 1e-12
        );
        assert_eq!(annualized_volatility(&[0.01], 52), None);
    }
}
