use crate::models::Report;
use super::state::PipelineSummary;

pub fn compute_summary(
    report: &Report,
    records: usize,
    total_duration_ms: u64,
    phases_completed: usize,
) -> PipelineSummary {
    PipelineSummary {
        total_duration_ms,
        records,
        anomalies_injected: report.anomalies.injected,
        anomalies_detected: report.anomalies.detected,
        forecasts: report.forecasts.len(),
        skipped_forecasts: report.skipped_forecasts.len(),
        recommendations: report.recommendations.len(),
        placeholder_recommendations: report
            .recommendations
            .iter()
            .filter(|r| r.is_placeholder())
            .count(),
        total_savings: report.total_savings,
        phases_completed,
    }
}
