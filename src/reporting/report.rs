use chrono::{DateTime, NaiveDate, Utc};

use crate::forecast::ForecastBatch;
use crate::models::{
    AnomalySummary, HistoricalWindow, MetricsSummary, Recommendation, Report, WindowSummary,
};

pub const GENERATOR: &str = concat!("opscast ", env!("CARGO_PKG_VERSION"));

/// Run-specific values kept out of report assembly so it stays deterministic.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub analysis_date: NaiveDate,
    pub seed: u64,
}

impl RunContext {
    pub fn new(seed: u64) -> Self {
        let generated_at = Utc::now();
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            analysis_date: generated_at.date_naive(),
            generated_at,
            seed,
        }
    }
}

/// Sum of estimated savings in recommendation order.
pub fn total_savings(recommendations: &[Recommendation]) -> f64 {
    recommendations.iter().fold(0.0, |acc, r| acc + r.estimated_savings)
}

pub fn assemble_report(
    ctx: &RunContext,
    window: &HistoricalWindow,
    recommendations: Vec<Recommendation>,
    batch: &ForecastBatch,
    metrics_summary: MetricsSummary,
    anomalies: AnomalySummary,
) -> Report {
    Report {
        run_id: ctx.run_id.clone(),
        generator: GENERATOR.to_string(),
        analysis_date: ctx.analysis_date,
        generated_at: ctx.generated_at,
        seed: ctx.seed,
        historical_window: WindowSummary {
            start: window.start,
            end: window.end(),
            days: window.days,
        },
        total_savings: total_savings(&recommendations),
        recommendations,
        forecasts: batch.results.iter().map(|f| f.summary()).collect(),
        skipped_forecasts: batch.skipped.clone(),
        metrics_summary,
        anomalies,
    }
}
