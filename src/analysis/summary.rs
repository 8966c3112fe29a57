use std::collections::HashMap;

use chrono::NaiveDate;

use crate::config::{BUDGET_SPENT, PRODUCTIVITY_SCORE, RESOURCE_UTILIZATION, STAFF_HOURS};
use crate::models::{
    AnomalySummary, DepartmentStats, ForecastResult, MetricRecord, MetricsSummary, TrendDirection,
};
use super::anomaly::DetectedAnomaly;
use super::stats::{mean, pearson};

fn values_for<'a>(records: &'a [MetricRecord], department: Option<&'a str>, metric: &'a str) -> impl Iterator<Item = f64> + 'a {
    records
        .iter()
        .filter(move |r| r.metric_name == metric && department.map_or(true, |d| r.department == d))
        .map(|r| r.value)
}

fn mean_of(records: &[MetricRecord], department: Option<&str>, metric: &str) -> Option<f64> {
    let values: Vec<f64> = values_for(records, department, metric).collect();
    mean(&values)
}

fn sum_of(records: &[MetricRecord], department: Option<&str>, metric: &str) -> Option<f64> {
    let mut iter = values_for(records, department, metric).peekable();
    iter.peek()?;
    Some(iter.sum())
}

/// Trend of a department's utilization forecast, falling back to its first forecast.
pub fn department_trend(department: &str, forecasts: &[ForecastResult]) -> TrendDirection {
    let mut own = forecasts.iter().filter(|f| f.department == department);
    let preferred = forecasts
        .iter()
        .find(|f| f.department == department && f.metric_name == RESOURCE_UTILIZATION);
    match preferred.or_else(|| own.next()) {
        Some(forecast) => forecast.trend(),
        None => TrendDirection::Unknown,
    }
}

pub fn department_stats(
    department: &str,
    records: &[MetricRecord],
    detected: &[DetectedAnomaly],
    forecasts: &[ForecastResult],
) -> DepartmentStats {
    let dept = Some(department);
    DepartmentStats {
        department: department.to_string(),
        mean_utilization: mean_of(records, dept, RESOURCE_UTILIZATION),
        total_budget: sum_of(records, dept, BUDGET_SPENT),
        mean_staff_hours: mean_of(records, dept, STAFF_HOURS),
        mean_productivity: mean_of(records, dept, PRODUCTIVITY_SCORE),
        injected_anomalies: records.iter().filter(|r| r.department == department && r.is_anomaly).count(),
        detected_anomalies: detected.iter().filter(|a| a.department == department).count(),
        forecast_trend: department_trend(department, forecasts),
    }
}

/// Correlation of utilization with productivity over records sharing a
/// (department, date).
pub fn productivity_correlation(records: &[MetricRecord]) -> Option<f64> {
    let productivity: HashMap<(&str, NaiveDate), f64> = records
        .iter()
        .filter(|r| r.metric_name == PRODUCTIVITY_SCORE)
        .map(|r| ((r.department.as_str(), r.date), r.value))
        .collect();

    let (xs, ys): (Vec<f64>, Vec<f64>) = records
        .iter()
        .filter(|r| r.metric_name == RESOURCE_UTILIZATION)
        .filter_map(|r| productivity.get(&(r.department.as_str(), r.date)).map(|p| (r.value, *p)))
        .unzip();
    pearson(&xs, &ys)
}

pub fn summarize(
    departments: &[String],
    records: &[MetricRecord],
    detected: &[DetectedAnomaly],
    forecasts: &[ForecastResult],
) -> MetricsSummary {
    MetricsSummary {
        avg_utilization: mean_of(records, None, RESOURCE_UTILIZATION),
        total_budget: sum_of(records, None, BUDGET_SPENT),
        productivity_correlation: productivity_correlation(records),
        departments: departments
            .iter()
            .map(|d| department_stats(d, records, detected, forecasts))
            .collect(),
    }
}

pub fn anomaly_summary(records: &[MetricRecord], detected: &[DetectedAnomaly], z_threshold: f64) -> AnomalySummary {
    AnomalySummary {
        injected: records.iter().filter(|r| r.is_anomaly).count(),
        detected: detected.len(),
        detected_injected: detected.iter().filter(|a| a.injected).count(),
        z_threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(department: &str, day: u64, metric: &str, value: f64) -> MetricRecord {
        MetricRecord {
            department: department.into(),
            date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + chrono::Days::new(day),
            metric_name: metric.into(),
            value,
            is_anomaly: false,
        }
    }

    fn forecast(department: &str, metric: &str, baseline: f64, points: Vec<f64>) -> ForecastResult {
        ForecastResult {
            department: department.into(),
            metric_name: metric.into(),
            horizon_dates: Vec::new(),
            lower_bound: points.clone(),
            upper_bound: points.clone(),
            point_forecast: points,
            confidence_level: 0.95,
            baseline,
        }
    }

    #[test]
    fn test_department_stats() {
        let records = vec![
            record("IT", 0, RESOURCE_UTILIZATION, 60.0),
            record("IT", 1, RESOURCE_UTILIZATION, 80.0),
            record("IT", 0, BUDGET_SPENT, 1000.0),
            record("IT", 1, BUDGET_SPENT, 500.0),
            record("HR", 0, BUDGET_SPENT, 9999.0),
        ];
        let stats = department_stats("IT", &records, &[], &[]);
        assert_eq!(stats.mean_utilization, Some(70.0));
        assert_eq!(stats.total_budget, Some(1500.0));
        assert_eq!(stats.mean_staff_hours, None);
        assert_eq!(stats.forecast_trend, TrendDirection::Unknown);
    }

    #[test]
    fn test_trend_prefers_utilization_forecast() {
        let forecasts = vec![
            forecast("IT", BUDGET_SPENT, 100.0, vec![50.0]),
            forecast("IT", RESOURCE_UTILIZATION, 70.0, vec![80.0]),
        ];
        assert_eq!(department_trend("IT", &forecasts), TrendDirection::Increasing);
        let only_budget = vec![forecast("IT", BUDGET_SPENT, 100.0, vec![50.0])];
        assert_eq!(department_trend("IT", &only_budget), TrendDirection::Decreasing);
    }

    #[test]
    fn test_productivity_correlation_aligns_by_date() {
        let mut records = Vec::new();
        for day in 0..5 {
            records.push(record("IT", day, RESOURCE_UTILIZATION, day as f64 * 10.0));
            records.push(record("IT", day, PRODUCTIVITY_SCORE, 100.0 - day as f64));
        }
        let corr = productivity_correlation(&records).unwrap();
        assert!((corr + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_summary_without_budget_metric() {
        let records = vec![record("IT", 0, STAFF_HOURS, 8.0)];
        let summary = summarize(&["IT".to_string()], &records, &[], &[]);
        assert_eq!(summary.total_budget, None);
        assert_eq!(summary.avg_utilization, None);
        assert_eq!(summary.departments.len(), 1);
        assert_eq!(summary.departments[0].mean_staff_hours, Some(8.0));
    }
}
