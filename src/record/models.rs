//! Typed record models.
//!
//! The strongly-typed counterparts of the registered record schemas. A
//! validated payload decodes into one of these; serializing it back yields
//! the same key/value content the caller supplied.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One tail-risk measurement block (shared by VaR and Expected Shortfall).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaRMetric {
    /// One of 0.95, 0.99, 0.995
    pub confidence: f64,
    /// Holding period, 1–30 days
    pub horizon_days: u32,
    pub value: f64,
}

/// Kupiec proportion-of-failures backtest result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KupiecTest {
    /// Test significance level in [0, 1]
    pub alpha: f64,
    /// Observed VaR breaches
    pub failures: u64,
    pub p_value: f64,
}

/// Contents of a backtest metrics report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestMetrics {
    pub as_of: NaiveDate,
    pub portfolio: String,
    pub var: VaRMetric,
    pub es: VaRMetric,
    pub kupiec: KupiecTest,
}

/// A successfully validated, fully-typed record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ValidatedRecord {
    BacktestMetrics(BacktestMetrics),
}

impl ValidatedRecord {
    /// Unwraps a backtest metrics record, if that is what was validated.
    pub fn as_backtest_metrics(&self) -> Option<&BacktestMetrics> {
        match self {
            ValidatedRecord::BacktestMetrics(m) => Some(m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_metrics() -> BacktestMetrics {
        BacktestMetrics {
            as_of: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            portfolio: "EQ_DESK".into(),
            var: VaRMetric {
                confidence: 0.99,
                horizon_days: 10,
                value: 1_250_000.0,
            },
            es: VaRMetric {
                confidence: 0.99,
                horizon_days: 10,
                value: 1_600_000.0,
            },
            kupiec: KupiecTest {
                alpha: 0.05,
                failures: 3,
                p_value: 0.41,
            },
        }
    }

    #[test]
    fn test_serializes_with_expected_keys() {
        let value = serde_json::to_value(sample_metrics()).unwrap();
        let obj = value.as_object().unwrap();
        for key in ["as_of", "portfolio", "var", "es", "kupiec"] {
            assert!(obj.contains_key(key), "missing key '{}'", key);
        }
        assert_eq!(value["as_of"], json!("2024-03-15"));
        assert_eq!(value["var"]["horizon_days"], json!(10));
        assert_eq!(value["kupiec"]["failures"], json!(3));
    }

    #[test]
    fn test_round_trips_through_json() {
        let metrics = sample_metrics();
        let value = serde_json::to_value(&metrics).unwrap();
        let back: BacktestMetrics = serde_json::from_value(value).unwrap();
        assert_eq!(back, metrics);
    }

    #[test]
    fn test_validated_record_serializes_untagged() {
        let record = ValidatedRecord::BacktestMetrics(sample_metrics());
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("as_of").is_some());
        assert!(value.get("BacktestMetrics").is_none());
    }
}
