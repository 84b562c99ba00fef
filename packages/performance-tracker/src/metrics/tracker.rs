//! Portfolio performance tracker.
//!
//! Holds a return series, an optional benchmark and the scalar parameters,
//! and derives every metric from them on demand. Percent-valued metrics are
//! scaled by 100, and `annual_risk_free` is expected in the same percent
//! units.

use super::{performance, risk, MIN_DENOMINATOR};
use crate::config::TrackerConfig;
use crate::series;
use crate::types::{CumulativeReturns, MetricsResult, Period};
use crate::{Error, Result};

/// Metric names used in [`MetricsResult`].
pub mod keys {
    pub const SHARPE: &str = "sharpe";
    pub const MODIFIED_SHARPE: &str = "modified_sharpe_ratio";
    pub const TREYNOR: &str = "treynor_ratio";
    pub const MODIGLIANI: &str = "modigliani_ratio";
    pub const MAX_DRAWDOWN: &str = "max_drawdown";
    pub const BETA: &str = "beta";
    pub const ALPHA: &str = "alpha";
    pub const ANNUAL_RETURN: &str = "annual_return";
    pub const ANNUAL_STD: &str = "annual_std";
    pub const CAPM_EXPECTED_RETURN: &str = "capm_expected_return";
    pub const VALUE_AT_RISK_PREFIX: &str = "value_at_risk";
    pub const EXPECTED_SHORTFALL_PREFIX: &str = "media_perda_esperada";
}

/// Immutable calculator for performance and risk metrics.
///
/// Every metric returns `None` when it is undefined for the held data: a
/// market-relative metric without a benchmark, a zero denominator, or too
/// few observations. Undefined inputs propagate to dependent metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceTracker {
    returns: Vec<f64>,
    benchmark: Option<Vec<f64>>,
    config: TrackerConfig,
}

impl PerformanceTracker {
    /// Create a tracker over `returns` with an optional aligned `benchmark`.
    ///
    /// Fails if the configuration is invalid, if the benchmark length differs
    /// from the portfolio length, or if either series holds a non-finite
    /// value.
    pub fn new(
        returns: Vec<f64>,
        benchmark: Option<Vec<f64>>,
        config: TrackerConfig,
    ) -> Result<Self> {
        config.validate()?;
        check_finite("returns", &returns)?;

        if let Some(market) = &benchmark {
            check_finite("benchmark", market)?;
            if market.len() != returns.len() {
                return Err(Error::Configuration(format!(
                    "Benchmark must be aligned with returns: {} vs {} observations",
                    market.len(),
                    returns.len()
                )));
            }
        }

        if returns.len() < 2 {
            tracing::warn!(
                "Only {} observation(s), dispersion metrics will be undefined",
                returns.len()
            );
        }

        Ok(Self {
            returns,
            benchmark,
            config,
        })
    }

    /// Create a tracker from a textual period name (`"daily"` or `"weekly"`).
    pub fn with_period_name(
        returns: Vec<f64>,
        benchmark: Option<Vec<f64>>,
        annual_risk_free: f64,
        alpha_var: f64,
        period: &str,
    ) -> Result<Self> {
        let config = TrackerConfig::new(period.parse()?)
            .with_risk_free(annual_risk_free)
            .with_alpha_var(alpha_var);
        Self::new(returns, benchmark, config)
    }

    pub fn returns(&self) -> &[f64] {
        &self.returns
    }

    pub fn benchmark(&self) -> Option<&[f64]> {
        self.benchmark.as_deref()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn period(&self) -> Period {
        self.config.period
    }

    fn periods_per_year(&self) -> usize {
        self.config.period.periods_per_year()
    }

    fn risk_free(&self) -> f64 {
        self.config.annual_risk_free
    }

    /// Annualized geometric return in percent.
    ///
    /// Uses the portfolio series unless another `series` is given.
    pub fn annualized_return(&self, series: Option<&[f64]>) -> Option<f64> {
        let series = series.unwrap_or(self.returns.as_slice());
        performance::annualize_return(series, self.periods_per_year()).map(|r| r * 100.0)
    }

    /// Annualized sample standard deviation in percent.
    ///
    /// Uses the portfolio series unless another `series` is given.
    pub fn annualized_std_return(&self, series: Option<&[f64]>) -> Option<f64> {
        let series = series.unwrap_or(self.returns.as_slice());
        performance::annualized_volatility(series, self.periods_per_year()).map(|s| s * 100.0)
    }

    /// Square of the annualized portfolio standard deviation.
    pub fn annualized_variance(&self) -> Option<f64> {
        self.annualized_std_return(None).map(|s| s * s)
    }

    /// Portfolio beta against the benchmark.
    pub fn portfolio_beta(&self) -> Option<f64> {
        risk::beta(&self.returns, self.benchmark()?)
    }

    /// CAPM expected return: rf + beta * (benchmark return - rf).
    pub fn expected_return_capm(&self) -> Option<f64> {
        let market_return = self.annualized_return(Some(self.benchmark()?))?;
        let beta = self.portfolio_beta()?;
        Some(self.risk_free() + beta * (market_return - self.risk_free()))
    }

    /// Excess of the annualized return over the CAPM expectation.
    ///
    /// Floored at zero: underperformance reports as zero alpha.
    pub fn calculate_portfolio_alpha(&self) -> Option<f64> {
        let excess = self.annualized_return(None)? - self.expected_return_capm()?;
        Some(excess.max(0.0))
    }

    fn excess_return(&self) -> Option<f64> {
        self.annualized_return(None).map(|r| r - self.risk_free())
    }

    /// (annualized return - rf) / annualized std.
    pub fn sharpe_ratio(&self) -> Option<f64> {
        ratio(self.excess_return(), self.annualized_std_return(None))
    }

    /// (annualized return - rf) / annualized variance.
    pub fn modified_sharpe_ratio(&self) -> Option<f64> {
        ratio(self.excess_return(), self.annualized_variance())
    }

    /// (annualized return - rf) / beta.
    pub fn treynor_ratio(&self) -> Option<f64> {
        ratio(self.excess_return(), self.portfolio_beta())
    }

    /// Modigliani ratio as
    /// `(std(benchmark) / return) * (return - rf) - (benchmark return - rf)`.
    pub fn modigliani_ratio(&self) -> Option<f64> {
        let market = self.benchmark()?;
        let asset_return = self.annualized_return(None)?;
        let scale = ratio(self.annualized_std_return(Some(market)), Some(asset_return))?;
        let market_premium = self.annualized_return(Some(market))? - self.risk_free();

        Some(scale * (asset_return - self.risk_free()) - market_premium)
    }

    /// Worst peak-to-trough decline of the portfolio wealth curve, in percent
    /// (zero or negative).
    pub fn max_drawdown(&self) -> Option<f64> {
        risk::max_drawdown(&self.returns).map(|d| d * 100.0)
    }

    /// Parametric value-at-risk of a single period, in percent.
    pub fn portfolio_value_at_risk(&self) -> Option<f64> {
        risk::value_at_risk(&self.returns, self.config.alpha_var).map(|v| v * 100.0)
    }

    /// Mean return of the periods below the VaR threshold, in percent.
    pub fn portfolio_expected_shortfall(&self) -> Option<f64> {
        let threshold = self.portfolio_value_at_risk()? / 100.0;
        risk::expected_shortfall(&self.returns, threshold).map(|es| es * 100.0)
    }

    /// Key under which VaR is reported, e.g. `value_at_risk_weekly_95`.
    pub fn value_at_risk_key(&self) -> String {
        format!(
            "{}_{}_{}",
            keys::VALUE_AT_RISK_PREFIX,
            self.config.period,
            self.config.confidence_pct()
        )
    }

    /// Key under which expected shortfall is reported.
    pub fn expected_shortfall_key(&self) -> String {
        format!(
            "{}_{}_{}",
            keys::EXPECTED_SHORTFALL_PREFIX,
            self.config.period,
            self.config.confidence_pct()
        )
    }

    /// Wealth curves for charting the portfolio against the benchmark.
    pub fn cumulative_returns(&self) -> CumulativeReturns {
        CumulativeReturns {
            portfolio: series::cumulative_returns(&self.returns),
            market: self.benchmark().map(series::cumulative_returns),
        }
    }

    /// Compute every metric.
    ///
    /// Always returns the full set of keys; undefined metrics are `None`.
    pub fn compute_all(&self) -> MetricsResult {
        tracing::debug!(
            observations = self.returns.len(),
            period = %self.config.period,
            has_benchmark = self.benchmark.is_some(),
            "Computing performance metrics"
        );

        let mut result = MetricsResult::new();
        result.insert(keys::SHARPE, self.sharpe_ratio());
        result.insert(keys::MODIFIED_SHARPE, self.modified_sharpe_ratio());
        result.insert(keys::TREYNOR, self.treynor_ratio());
        result.insert(keys::MODIGLIANI, self.modigliani_ratio());
        result.insert(keys::MAX_DRAWDOWN, self.max_drawdown());
        result.insert(self.value_at_risk_key(), self.portfolio_value_at_risk());
        result.insert(self.expected_shortfall_key(), self.portfolio_expected_shortfall());
        result.insert(keys::BETA, self.portfolio_beta());
        result.insert(keys::ALPHA, self.calculate_portfolio_alpha());
        result.insert(keys::ANNUAL_RETURN, self.annualized_return(None));
        result.insert(keys::ANNUAL_STD, self.annualized_std_return(None));
        result.insert(keys::CAPM_EXPECTED_RETURN, self.expected_return_capm());

        for name in result.undefined() {
            tracing::trace!("Metric {} is undefined", name);
        }

        result
    }
}

/// Division that treats a near-zero denominator as undefined.
fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let denominator = denominator?;
    if denominator.abs() < MIN_DENOMINATOR {
        return None;
    }
    Some(numerator? / denominator)
}

fn check_finite(name: &str, values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(idx) => Err(Error::Configuration(format!(
            "{} contains a non-finite value at index {}",
            name, idx
        ))),
        None => Ok(()),
    }
}
