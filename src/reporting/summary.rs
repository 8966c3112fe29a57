use std::path::Path;

use console::style;

use crate::models::{Priority, Report};
use crate::utils::formatting::{format_currency, format_duration, format_percent};

const TOP_ACTIONS: usize = 3;

/// Key findings printed after a successful run.
pub fn render_summary(report: &Report, files: &[&Path], elapsed_ms: u64) -> String {
    let mut out = String::new();
    let summary = &report.metrics_summary;

    out.push_str(&format!("\n{}\n", style("Key Findings").white().bold()));
    out.push_str(&format!(
        "  Average utilization:   {}\n",
        style(format_percent(summary.avg_utilization)).cyan()
    ));
    out.push_str(&format!(
        "  Potential savings:     {}\n",
        style(format_currency(report.total_savings)).green().bold()
    ));
    out.push_str(&format!(
        "  Anomalies detected:    {} ({} injected)\n",
        report.anomalies.detected, report.anomalies.injected
    ));
    out.push_str(&format!(
        "  Forecasts:             {} produced, {} skipped\n",
        report.forecasts.len(),
        report.skipped_forecasts.len()
    ));

    let placeholders = report.recommendations.iter().filter(|r| r.is_placeholder()).count();
    if placeholders > 0 {
        out.push_str(&format!(
            "  {} {} of {} recommendations unavailable\n",
            style("⚠").yellow(),
            placeholders,
            report.recommendations.len()
        ));
    }

    let mut ranked: Vec<_> = report
        .recommendations
        .iter()
        .filter(|r| !r.is_placeholder())
        .collect();
    ranked.sort_by_key(|r| r.priority.rank());
    if !ranked.is_empty() {
        out.push_str(&format!("\n{}\n", style("Top Priority Actions").white().bold()));
        for rec in ranked.into_iter().take(TOP_ACTIONS) {
            let label = match rec.priority {
                Priority::High => style(rec.priority.as_str()).red().bold(),
                Priority::Medium => style(rec.priority.as_str()).yellow(),
                Priority::Low => style(rec.priority.as_str()).dim(),
            };
            let action = rec.priority_actions.first().unwrap_or(&rec.text);
            out.push_str(&format!("  [{}] {}: {}\n", label, rec.department, action));
        }
    }

    out.push_str(&format!("\n{}\n", style("Files Generated").white().bold()));
    for path in files {
        out.push_str(&format!("  {}\n", path.display()));
    }
    out.push_str(&format!(
        "\n{} Run {} finished in {}\n",
        style("\u{2714}").green().bold(),
        style(&report.run_id).dim(),
        format_duration(elapsed_ms)
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnomalySummary, MetricsSummary, Recommendation, RecommendationSource, WindowSummary};
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_summary_lists_actions_by_priority() {
        console::set_colors_enabled(false);
        let day = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let rec = |dept: &str, priority, text: &str, actions: &[&str]| Recommendation {
            department: dept.into(),
            priority,
            text: text.into(),
            estimated_savings: 100.0,
            savings_percent: 1.0,
            inefficiencies: vec![],
            priority_actions: actions.iter().map(|a| a.to_string()).collect(),
            source: RecommendationSource::Service,
        };
        let report = Report {
            run_id: "abc".into(),
            generator: "opscast".into(),
            analysis_date: day,
            generated_at: Utc::now(),
            seed: 7,
            historical_window: WindowSummary { start: day, end: day, days: 1 },
            recommendations: vec![
                rec("HR", Priority::Low, "Trim meetings", &[]),
                rec("IT", Priority::High, "Modernize infrastructure", &["Retire old servers", "Consolidate racks"]),
                Recommendation::placeholder("Sales"),
            ],
            total_savings: 1234.5,
            forecasts: vec![],
            skipped_forecasts: vec![],
            metrics_summary: MetricsSummary { avg_utilization: Some(75.0), total_budget: None, productivity_correlation: None, departments: vec![] },
            anomalies: AnomalySummary { injected: 4, detected: 3, detected_injected: 2, z_threshold: 2.0 },
        };
        let text = render_summary(&report, &[Path::new("output/efficiency_report.json")], 1500);
        assert!(text.contains("$1,234.50"));
        assert!(text.contains("75.0%"));
        assert!(text.contains("1 of 3 recommendations unavailable"));
        let high = text.find("Retire old servers").unwrap();
        let low = text.find("Trim meetings").unwrap();
        assert!(high < low);
        assert!(!text.contains("Modernize infrastructure"));
        assert!(text.contains("efficiency_report.json"));
    }
}
