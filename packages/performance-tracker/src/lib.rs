//! Performance Tracker - portfolio performance and risk metrics.
//!
//! This crate turns a periodic return series, and optionally an aligned
//! benchmark series, into standard descriptive statistics:
//!
//! - **Return and volatility**: annualized geometric return, annualized std
//! - **Risk-adjusted ratios**: Sharpe, modified Sharpe, Treynor, Modigliani
//! - **Market model**: beta, CAPM expected return, alpha
//! - **Tail risk**: max drawdown, parametric VaR, expected shortfall
//!
//! # Example
//!
//! ```rust
//! use performance_tracker::{Period, PerformanceTracker, TrackerConfig};
//!
//! let returns = vec![0.02, -0.01, 0.03, -0.04, 0.01, 0.05];
//! let market = vec![0.01, -0.005, 0.02, -0.03, 0.005, 0.03];
//!
//! let tracker =
//!     PerformanceTracker::new(returns, Some(market), TrackerConfig::new(Period::Weekly))?;
//!
//! let metrics = tracker.compute_all();
//! assert!(metrics.value("beta").is_some());
//! assert!(metrics.value("max_drawdown").unwrap() <= 0.0);
//! # Ok::<(), performance_tracker::Error>(())
//! ```

pub mod config;
pub mod metrics;
pub mod series;
pub mod types;

// Re-export commonly used types
pub use config::TrackerConfig;
pub use metrics::{keys, PerformanceTracker};
pub use types::{ApiResponse, CumulativeReturns, MetricsResult, Period};

/// Error types for performance-tracker operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),
}

/// Result type for performance-tracker operations.
pub type Result<T> = std::result::Result<T, Error>;
