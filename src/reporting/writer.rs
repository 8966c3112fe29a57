use std::path::{Path, PathBuf};

use crate::errors::OpscastError;
use crate::models::{ForecastResult, MetricRecord, Report};
use super::charts::{budget_trend_chart, render_html, utilization_chart};
use tracing::info;

pub const UTILIZATION_CHART_FILE: &str = "utilization_by_dept.html";
pub const BUDGET_CHART_FILE: &str = "budget_trend.html";
pub const REPORT_FILE: &str = "efficiency_report.json";
pub const FORECASTS_FILE: &str = "forecasts.json";

/// Paths of every artifact written by a run.
#[derive(Debug, Clone)]
pub struct WrittenFiles {
    pub utilization_chart: PathBuf,
    pub budget_chart: PathBuf,
    pub report: PathBuf,
    pub forecasts: PathBuf,
}

impl WrittenFiles {
    pub fn all(&self) -> [&Path; 4] {
        [
            self.utilization_chart.as_path(),
            self.budget_chart.as_path(),
            self.report.as_path(),
            self.forecasts.as_path(),
        ]
    }
}

/// Write to a sibling temp file then rename over the target.
pub async fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), OpscastError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{}.tmp", file_name));
    tokio::fs::write(&tmp, contents)
        .await
        .map_err(|e| OpscastError::output(path, e))?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(OpscastError::output(path, e));
    }
    Ok(())
}

/// Render the charts and serialize the report into `dir`, creating it if needed.
pub async fn write_outputs(
    dir: &Path,
    report: &Report,
    forecasts: &[ForecastResult],
    records: &[MetricRecord],
    departments: &[String],
) -> Result<WrittenFiles, OpscastError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| OpscastError::output(dir, e))?;

    let files = WrittenFiles {
        utilization_chart: dir.join(UTILIZATION_CHART_FILE),
        budget_chart: dir.join(BUDGET_CHART_FILE),
        report: dir.join(REPORT_FILE),
        forecasts: dir.join(FORECASTS_FILE),
    };

    let utilization = render_html(&utilization_chart(records, departments))?;
    write_atomic(&files.utilization_chart, utilization.as_bytes()).await?;

    let budget = render_html(&budget_trend_chart(records))?;
    write_atomic(&files.budget_chart, budget.as_bytes()).await?;

    write_atomic(&files.report, serde_json::to_string_pretty(report)?.as_bytes()).await?;
    write_atomic(&files.forecasts, serde_json::to_string_pretty(forecasts)?.as_bytes()).await?;

    for path in files.all() {
        info!(path = %path.display(), "Output written");
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_atomic_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_atomic(&path, b"first").await.unwrap();
        write_atomic(&path, b"second").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[tokio::test]
    async fn test_write_failure_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");
        let err = write_atomic(&path, b"x").await.unwrap_err();
        match err {
            OpscastError::Output { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_output_dir_blocked_by_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, "not a directory").unwrap();
        let err = write_outputs(&blocker.join("out"), &sample_report(), &[], &[], &[]).await.unwrap_err();
        assert!(matches!(err, OpscastError::Output { .. }));
    }

    fn sample_report() -> Report {
        use crate::models::{AnomalySummary, MetricsSummary, WindowSummary};
        use chrono::{NaiveDate, Utc};
        let day = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        Report {
            run_id: "r".into(),
            generator: "opscast".into(),
            analysis_date: day,
            generated_at: Utc::now(),
            seed: 1,
            historical_window: WindowSummary { start: day, end: day, days: 1 },
            recommendations: vec![],
            total_savings: 0.0,
            forecasts: vec![],
            skipped_forecasts: vec![],
            metrics_summary: MetricsSummary { avg_utilization: None, total_budget: None, productivity_correlation: None, departments: vec![] },
            anomalies: AnomalySummary { injected: 0, detected: 0, detected_injected: 0, z_threshold: 2.0 },
        }
    }

    #[tokio::test]
    async fn test_writes_all_four_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("output");
        let files = write_outputs(&out, &sample_report(), &[], &[], &["IT".into()]).await.unwrap();
        for path in files.all() {
            assert!(path.exists(), "{} missing", path.display());
        }
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&files.report).unwrap()).unwrap();
        assert_eq!(json["runId"], "r");
        assert!(std::fs::read_to_string(&files.utilization_chart).unwrap().contains("Plotly.newPlot"));
    }
}
