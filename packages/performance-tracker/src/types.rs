//! Core data types for the performance tracker.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Sampling period of a return series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// One observation per trading day
    #[default]
    Daily,
    /// One observation per week
    Weekly,
}

impl Period {
    /// Number of observations that make up one year.
    pub fn periods_per_year(self) -> usize {
        match self {
            Period::Daily => 252,
            Period::Weekly => 52,
        }
    }

    /// Lowercase name used in metric keys and configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            other => Err(Error::Configuration(format!(
                "Period must be either daily or weekly, got '{}'",
                other
            ))),
        }
    }
}

/// Named metrics produced by a full tracker run.
///
/// Values are `None` when a metric is undefined for the inputs (no benchmark,
/// a zero denominator, or too few observations). Serializes as a flat JSON
/// object with `null` for undefined entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct MetricsResult {
    values: BTreeMap<String, Option<f64>>,
}

impl MetricsResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a metric value.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<f64>) {
        self.values.insert(name.into(), value);
    }

    /// Look up a metric. The outer `Option` is `None` for unknown names,
    /// the inner one for undefined values.
    pub fn get(&self, name: &str) -> Option<Option<f64>> {
        self.values.get(name).copied()
    }

    /// Value of a metric if it is both present and defined.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied().flatten()
    }

    /// Whether a metric with this name was recorded.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of recorded metrics.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no metric was recorded.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over metrics in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Names of the metrics that came out undefined.
    pub fn undefined(&self) -> Vec<&str> {
        self.values
            .iter()
            .filter(|(_, v)| v.is_none())
            .map(|(k, _)| k.as_str())
            .collect()
    }
}

/// Cumulative wealth curves handed to an external chart renderer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CumulativeReturns {
    /// Running product of (1 + r) for the portfolio
    pub portfolio: Vec<f64>,
    /// Running product of (1 + r) for the benchmark, if one was configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<Vec<f64>>,
}

/// API response wrapper used by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_from_str() {
        assert_eq!("daily".parse::<Period>().unwrap(), Period::Daily);
        assert_eq!(" Weekly ".parse::<Period>().unwrap(), Period::Weekly);

        let err = "monthly".parse::<Period>().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_periods_per_year() {
        assert_eq!(Period::Daily.periods_per_year(), 252);
        assert_eq!(Period::Weekly.periods_per_year(), 52);
    }

    #[test]
    fn test_period_serde() {
        let json = serde_json::to_string(&Period::Weekly).unwrap();
        assert_eq!(json, "\"weekly\"");

        let period: Period = serde_json::from_str("\"daily\"").unwrap();
        assert_eq!(period, Period::Daily);

        assert!(serde_json::from_str::<Period>("\"hourly\"").is_err());
    }

    #[test]
    fn test_metrics_result_lookup() {
        let mut result = MetricsResult::new();
        assert!(result.is_empty());
        result.insert("sharpe", Some(0.5));
        result.insert("beta", None);

        assert_eq!(result.len(), 2);
        assert!(!result.is_empty());
        assert_eq!(result.get("sharpe"), Some(Some(0.5)));
        assert_eq!(result.get("beta"), Some(None));
        assert_eq!(result.get("missing"), None);
        assert_eq!(result.value("sharpe"), Some(0.5));
        assert_eq!(result.value("beta"), None);
        assert_eq!(result.undefined(), vec!["beta"]);
    }

    #[test]
    fn test_metrics_result_serializes_null() {
        let mut result = MetricsResult::new();
        result.insert("alpha", Some(1.5));
        result.insert("beta", None);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({ "alpha": 1.5, "beta": null }));
    }

    #[test]
    fn test_api_response() {
        let response: ApiResponse<String> = ApiResponse::ok("test".to_string());
        assert!(response.ok);
        assert_eq!(response.data, Some("test".to_string()));

        let err_response: ApiResponse<String> = ApiResponse::err("error");
        assert!(!err_response.ok);
        assert_eq!(err_response.error, Some("error".to_string()));
    }
}
