//! Performance and risk metrics.
//!
//! Free functions over raw return slices live in `performance` and `risk`;
//! [`PerformanceTracker`] binds them to a series, a benchmark and a
//! configuration and applies the percent scaling.

mod performance;
mod risk;
mod tracker;

pub use performance::{annualize_return, annualized_volatility, total_return};
pub use risk::{beta, expected_shortfall, max_drawdown, norm_ppf, value_at_risk};
pub use tracker::{keys, PerformanceTracker};

/// Denominators smaller than this in magnitude make a ratio undefined.
pub const MIN_DENOMINATOR: f64 = 1e-12;
