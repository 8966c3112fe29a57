use std::collections::HashMap;

use crate::config::ForecastConfig;
use crate::errors::OpscastError;
use crate::models::{ForecastResult, HistoricalWindow, MetricRecord, SkipReason, SkippedForecast};
use super::provider::Forecaster;
use tracing::{debug, info, warn};

/// Minimum number of trailing points averaged into a forecast baseline.
const MIN_BASELINE_POINTS: usize = 7;

/// Identifies one (department, metric) series.
#[derive(Debug, Clone)]
pub struct SeriesKey {
    pub department: String,
    pub metric_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct ForecastBatch {
    pub results: Vec<ForecastResult>,
    pub skipped: Vec<SkippedForecast>,
}

impl ForecastBatch {
    pub fn push(&mut self, outcome: Result<ForecastResult, SkippedForecast>) {
        match outcome {
            Ok(result) => self.results.push(result),
            Err(skipped) => self.skipped.push(skipped),
        }
    }
}

/// Group records into per-pair series, keeping first-seen pair order and
/// sorting each series by date.
pub fn group_series(records: &[MetricRecord], config: &ForecastConfig) -> Vec<(SeriesKey, Vec<f64>)> {
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut groups: Vec<(SeriesKey, Vec<&MetricRecord>)> = Vec::new();

    for record in records.iter().filter(|r| config.includes(&r.metric_name)) {
        let key = (record.department.as_str(), record.metric_name.as_str());
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push((
                SeriesKey {
                    department: record.department.clone(),
                    metric_name: record.metric_name.clone(),
                },
                Vec::new(),
            ));
            groups.len() - 1
        });
        groups[slot].1.push(record);
    }

    groups
        .into_iter()
        .map(|(key, mut rows)| {
            rows.sort_by_key(|r| r.date);
            (key, rows.into_iter().map(|r| r.value).collect())
        })
        .collect()
}

/// Forecast a single series. Pairs that cannot be forecast come back as a
/// [`SkippedForecast`] with the reason logged.
pub fn forecast_pair(
    key: &SeriesKey,
    series: &[f64],
    window: &HistoricalWindow,
    config: &ForecastConfig,
    baseline_points: usize,
    forecaster: &dyn Forecaster,
) -> Result<ForecastResult, SkippedForecast> {
    let skip = |reason: SkipReason, detail: String| SkippedForecast {
        department: key.department.clone(),
        metric_name: key.metric_name.clone(),
        reason,
        detail,
    };

    if series.len() < config.min_history {
        info!(
            department = %key.department,
            metric = %key.metric_name,
            points = series.len(),
            required = config.min_history,
            "Skipping forecast: insufficient history"
        );
        return Err(skip(
            SkipReason::InsufficientHistory,
            format!("{} points, need {}", series.len(), config.min_history),
        ));
    }

    let horizon = config.horizon_days as usize;
    let output = forecaster.forecast(series, horizon).and_then(|output| {
        output
            .validate(horizon)
            .map(|_| output)
            .map_err(|e| OpscastError::Forecast(format!("malformed output: {}", e)))
    });

    let output = match output {
        Ok(output) => output,
        Err(e) => {
            warn!(
                department = %key.department,
                metric = %key.metric_name,
                forecaster = forecaster.name(),
                error = %e,
                "Forecast unavailable"
            );
            return Err(skip(SkipReason::ForecastUnavailable, e.to_string()));
        }
    };

    let tail = baseline_points.max(MIN_BASELINE_POINTS).min(series.len());
    let baseline = series[series.len() - tail..].iter().sum::<f64>() / tail as f64;

    debug!(department = %key.department, metric = %key.metric_name, horizon, "Forecast produced");
    Ok(ForecastResult {
        department: key.department.clone(),
        metric_name: key.metric_name.clone(),
        horizon_dates: window.horizon_dates(horizon),
        point_forecast: output.forecast,
        lower_bound: output.lower,
        upper_bound: output.upper,
        confidence_level: output.confidence_level,
        baseline,
    })
}

/// Forecast every (department, metric) pair in `records`.
pub fn forecast_all(
    records: &[MetricRecord],
    window: &HistoricalWindow,
    config: &ForecastConfig,
    baseline_points: usize,
    forecaster: &dyn Forecaster,
) -> ForecastBatch {
    let mut batch = ForecastBatch::default();
    for (key, series) in group_series(records, config) {
        batch.push(forecast_pair(&key, &series, window, config, baseline_points, forecaster));
    }
    info!(
        forecasts = batch.results.len(),
        skipped = batch.skipped.len(),
        "Forecasting complete"
    );
    batch
}
