use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::forecast::{ForecastSummary, SkippedForecast, TrendDirection};
use super::recommendation::Recommendation;

/// The terminal JSON artifact of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub run_id: String,
    pub generator: String,
    pub analysis_date: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub seed: u64,
    pub historical_window: WindowSummary,
    pub recommendations: Vec<Recommendation>,
    pub total_savings: f64,
    pub forecasts: Vec<ForecastSummary>,
    pub skipped_forecasts: Vec<SkippedForecast>,
    pub metrics_summary: MetricsSummary,
    pub anomalies: AnomalySummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: u32,
}

/// Per-department statistics fed to the recommendation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentStats {
    pub department: String,
    pub mean_utilization: Option<f64>,
    pub total_budget: Option<f64>,
    pub mean_staff_hours: Option<f64>,
    pub mean_productivity: Option<f64>,
    pub injected_anomalies: usize,
    pub detected_anomalies: usize,
    pub forecast_trend: TrendDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub avg_utilization: Option<f64>,
    pub total_budget: Option<f64>,
    /// Pearson correlation of utilization with productivity over aligned records.
    pub productivity_correlation: Option<f64>,
    pub departments: Vec<DepartmentStats>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalySummary {
    pub injected: usize,
    pub detected: usize,
    /// Detected anomalies that coincide with an injected outlier.
    pub detected_injected: usize,
    pub z_threshold: f64,
}
