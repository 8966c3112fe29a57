use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::errors::OpscastError;
use crate::models::{DepartmentStats, Priority, Recommendation, RecommendationSource};

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid regex"));

/// Savings percentage from a number or a string such as `"12%"` or
/// `"10-15%"` (midpoint). Clamped to `[0, 100]`.
pub fn parse_savings_percent(value: &Value) -> Option<f64> {
    let pct = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let numbers: Vec<f64> = NUMBER
                .find_iter(s)
                .filter_map(|m| m.as_str().parse::<f64>().ok())
                .take(2)
                .collect();
            match numbers.as_slice() {
                [single] => *single,
                [low, high] => (low + high) / 2.0,
                _ => return None,
            }
        }
        _ => return None,
    };
    pct.is_finite().then(|| pct.clamp(0.0, 100.0))
}

/// `(100 - utilization) * budget * percent / 10000`, or 0 without both inputs.
pub fn estimated_savings(stats: &DepartmentStats, savings_percent: f64) -> f64 {
    match (stats.mean_utilization, stats.total_budget) {
        (Some(util), Some(budget)) => (100.0 - util) * budget * savings_percent / 10000.0,
        _ => 0.0,
    }
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

/// Turn a structured reply into a [`Recommendation`].
pub fn parse_recommendation(stats: &DepartmentStats, reply: &Value) -> Result<Recommendation, OpscastError> {
    let label = reply["priority"].as_str().unwrap_or_default();
    let priority = Priority::parse(label).ok_or_else(|| {
        OpscastError::OutputValidation(format!("unknown priority '{}'", label))
    })?;

    let text = reply["recommendation"].as_str().unwrap_or_default().trim();
    if text.is_empty() {
        return Err(OpscastError::OutputValidation("empty recommendation text".into()));
    }

    let savings_percent = parse_savings_percent(&reply["potential_savings_percent"]).unwrap_or(0.0);

    Ok(Recommendation {
        department: stats.department.clone(),
        priority,
        text: text.to_string(),
        estimated_savings: estimated_savings(stats, savings_percent),
        savings_percent,
        inefficiencies: string_list(&reply["identified_inefficiencies"]),
        priority_actions: string_list(&reply["priority_actions"]),
        source: RecommendationSource::Service,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrendDirection;
    use serde_json::json;

    fn stats(util: Option<f64>, budget: Option<f64>) -> DepartmentStats {
        DepartmentStats {
            department: "IT".into(),
            mean_utilization: util,
            total_budget: budget,
            mean_staff_hours: None,
            mean_productivity: None,
            injected_anomalies: 0,
            detected_anomalies: 0,
            forecast_trend: TrendDirection::Stable,
        }
    }

    #[test]
    fn test_savings_percent_forms() {
        assert_eq!(parse_savings_percent(&json!(12)), Some(12.0));
        assert_eq!(parse_savings_percent(&json!("12%")), Some(12.0));
        assert_eq!(parse_savings_percent(&json!("10-15%")), Some(12.5));
        assert_eq!(parse_savings_percent(&json!("about 7.5 percent")), Some(7.5));
        assert_eq!(parse_savings_percent(&json!(250)), Some(100.0));
        assert_eq!(parse_savings_percent(&json!(-5)), Some(0.0));
        assert_eq!(parse_savings_percent(&json!("none")), None);
        assert_eq!(parse_savings_percent(&Value::Null), None);
    }

    #[test]
    fn test_estimated_savings_formula() {
        // (100 - 75) * 1_000_000 * 10 / 10000
        assert!((estimated_savings(&stats(Some(75.0), Some(1_000_000.0)), 10.0) - 25_000.0).abs() < 1e-9);
        assert_eq!(estimated_savings(&stats(None, Some(1000.0)), 10.0), 0.0);
        assert_eq!(estimated_savings(&stats(Some(50.0), None), 10.0), 0.0);
    }

    #[test]
    fn test_parse_full_reply() {
        let reply = json!({
            "priority": "HIGH",
            "recommendation": "  Consolidate idle servers.  ",
            "potential_savings_percent": "10-20%",
            "identified_inefficiencies": ["idle capacity", ""],
            "priority_actions": "Audit hosts"
        });
        let rec = parse_recommendation(&stats(Some(60.0), Some(10_000.0)), &reply).unwrap();
        assert_eq!(rec.priority, Priority::High);
        assert_eq!(rec.text, "Consolidate idle servers.");
        assert_eq!(rec.savings_percent, 15.0);
        assert!((rec.estimated_savings - 600.0).abs() < 1e-9);
        assert_eq!(rec.inefficiencies, vec!["idle capacity"]);
        assert_eq!(rec.priority_actions, vec!["Audit hosts"]);
        assert_eq!(rec.source, RecommendationSource::Service);
    }

    #[test]
    fn test_rejects_unknown_priority_and_empty_text() {
        let s = stats(None, None);
        let bad_priority = json!({"priority": "urgent-ish", "recommendation": "x"});
        assert!(matches!(parse_recommendation(&s, &bad_priority), Err(OpscastError::OutputValidation(_))));
        let empty = json!({"priority": "low", "recommendation": "   "});
        assert!(matches!(parse_recommendation(&s, &empty), Err(OpscastError::OutputValidation(_))));
    }
}
