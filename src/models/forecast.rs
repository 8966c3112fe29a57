use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Relative change of the forecast mean against the baseline above which a
/// series counts as moving.
pub const TREND_TOLERANCE: f64 = 0.02;

/// Forecast for a single (department, metric) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub department: String,
    pub metric_name: String,
    pub horizon_dates: Vec<NaiveDate>,
    pub point_forecast: Vec<f64>,
    pub lower_bound: Vec<f64>,
    pub upper_bound: Vec<f64>,
    pub confidence_level: f64,
    /// Mean of the trailing history the forecast is compared against.
    pub baseline: f64,
}

impl ForecastResult {
    pub fn mean_forecast(&self) -> f64 {
        if self.point_forecast.is_empty() {
            return self.baseline;
        }
        self.point_forecast.iter().sum::<f64>() / self.point_forecast.len() as f64
    }

    pub fn trend(&self) -> TrendDirection {
        TrendDirection::classify(self.baseline, self.mean_forecast())
    }

    pub fn summary(&self) -> ForecastSummary {
        ForecastSummary {
            department: self.department.clone(),
            metric_name: self.metric_name.clone(),
            horizon_start: self.horizon_dates.first().copied(),
            horizon_end: self.horizon_dates.last().copied(),
            horizon_days: self.horizon_dates.len(),
            mean_forecast: self.mean_forecast(),
            final_forecast: self.point_forecast.last().copied().unwrap_or(self.baseline),
            min_lower: self.lower_bound.iter().copied().fold(f64::INFINITY, f64::min),
            max_upper: self.upper_bound.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            baseline: self.baseline,
            trend: self.trend(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
    Unknown,
}

impl TrendDirection {
    pub fn classify(baseline: f64, forecast_mean: f64) -> Self {
        if !baseline.is_finite() || !forecast_mean.is_finite() {
            return Self::Unknown;
        }
        let scale = baseline.abs().max(f64::EPSILON);
        let change = (forecast_mean - baseline) / scale;
        if change > TREND_TOLERANCE {
            Self::Increasing
        } else if change < -TREND_TOLERANCE {
            Self::Decreasing
        } else {
            Self::Stable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compact view of a forecast written into the JSON report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSummary {
    pub department: String,
    pub metric_name: String,
    pub horizon_start: Option<NaiveDate>,
    pub horizon_end: Option<NaiveDate>,
    pub horizon_days: usize,
    pub mean_forecast: f64,
    pub final_forecast: f64,
    pub min_lower: f64,
    pub max_upper: f64,
    pub baseline: f64,
    pub trend: TrendDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    InsufficientHistory,
    ForecastUnavailable,
}

/// A pair that produced no forecast, kept so the report stays auditable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedForecast {
    pub department: String,
    pub metric_name: String,
    pub reason: SkipReason,
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(points: Vec<f64>, baseline: f64) -> ForecastResult {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates = (0..points.len() as u64).map(|i| start + chrono::Days::new(i)).collect();
        ForecastResult {
            department: "IT".into(),
            metric_name: "resource_utilization".into(),
            horizon_dates: dates,
            lower_bound: points.iter().map(|p| p - 5.0).collect(),
            upper_bound: points.iter().map(|p| p + 5.0).collect(),
            point_forecast: points,
            confidence_level: 0.95,
            baseline,
        }
    }

    #[test]
    fn test_trend_classification() {
        assert_eq!(TrendDirection::classify(100.0, 110.0), TrendDirection::Increasing);
        assert_eq!(TrendDirection::classify(100.0, 90.0), TrendDirection::Decreasing);
        assert_eq!(TrendDirection::classify(100.0, 101.0), TrendDirection::Stable);
        assert_eq!(TrendDirection::classify(f64::NAN, 101.0), TrendDirection::Unknown);
    }

    #[test]
    fn test_summary_fields() {
        let summary = result(vec![70.0, 80.0, 90.0], 75.0).summary();
        assert_eq!(summary.horizon_days, 3);
        assert_eq!(summary.mean_forecast, 80.0);
        assert_eq!(summary.final_forecast, 90.0);
        assert_eq!(summary.min_lower, 65.0);
        assert_eq!(summary.max_upper, 95.0);
        assert_eq!(summary.trend, TrendDirection::Increasing);
        assert_eq!(summary.horizon_start, NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[test]
    fn test_skip_reason_serialization() {
        let json = serde_json::to_string(&SkipReason::InsufficientHistory).unwrap();
        assert_eq!(json, "\"insufficient_history\"");
    }
}
