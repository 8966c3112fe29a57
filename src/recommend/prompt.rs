use serde_json::{json, Value};

use crate::models::DepartmentStats;

pub const SYSTEM_PROMPT: &str = "You are an operational efficiency expert.";

const USER_TEMPLATE: &str = "\
Analyze the following operational metrics for the {{DEPARTMENT}} department:

- Average resource utilization: {{UTILIZATION}}
- Total budget spent: {{BUDGET}}
- Average staff hours per day: {{STAFF_HOURS}}
- Average productivity score: {{PRODUCTIVITY}}
- Injected anomalies: {{INJECTED}}; statistically detected anomalies: {{DETECTED}}
- Forecast trend for the coming period: {{TREND}}

Identify inefficiencies and recommend improvements. Respond with a JSON object with
the keys priority (high, medium or low), recommendation, potential_savings_percent,
identified_inefficiencies and priority_actions.";

fn fmt_opt(value: Option<f64>, suffix: &str) -> String {
    match value {
        Some(v) => format!("{:.2}{}", v, suffix),
        None => "not available".to_string(),
    }
}

/// Render the per-department user prompt.
pub fn build_prompt(stats: &DepartmentStats) -> String {
    let replacements: [(&str, String); 8] = [
        ("{{DEPARTMENT}}", stats.department.clone()),
        ("{{UTILIZATION}}", fmt_opt(stats.mean_utilization, "%")),
        ("{{BUDGET}}", fmt_opt(stats.total_budget, "")),
        ("{{STAFF_HOURS}}", fmt_opt(stats.mean_staff_hours, "")),
        ("{{PRODUCTIVITY}}", fmt_opt(stats.mean_productivity, "")),
        ("{{INJECTED}}", stats.injected_anomalies.to_string()),
        ("{{DETECTED}}", stats.detected_anomalies.to_string()),
        ("{{TREND}}", stats.forecast_trend.to_string()),
    ];
    let mut result = USER_TEMPLATE.to_string();
    for (placeholder, value) in &replacements {
        result = result.replace(placeholder, value);
    }
    result
}

/// JSON schema the structured completion is asked to follow.
pub fn response_schema() -> Value {
    json!({
        "type": "object",
        "required": ["priority", "recommendation"],
        "properties": {
            "priority": { "type": "string", "enum": ["high", "medium", "low"] },
            "recommendation": { "type": "string" },
            "potential_savings_percent": { "type": ["number", "string"] },
            "identified_inefficiencies": { "type": "array", "items": { "type": "string" } },
            "priority_actions": { "type": "array", "items": { "type": "string" } }
        }
    })
}
