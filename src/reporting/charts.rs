use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::config::{BUDGET_SPENT, RESOURCE_UTILIZATION};
use crate::errors::OpscastError;
use crate::models::MetricRecord;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// A single Plotly figure: trace list plus layout.
#[derive(Debug, Clone)]
pub struct Chart {
    pub title: String,
    pub traces: Value,
    pub layout: Value,
}

/// Box plot of resource utilization, one box per department in `departments` order.
pub fn utilization_chart(records: &[MetricRecord], departments: &[String]) -> Chart {
    let traces: Vec<Value> = departments
        .iter()
        .map(|dept| {
            let values: Vec<f64> = records
                .iter()
                .filter(|r| r.metric_name == RESOURCE_UTILIZATION && &r.department == dept)
                .map(|r| r.value)
                .collect();
            json!({ "type": "box", "name": dept, "y": values, "boxpoints": "outliers" })
        })
        .collect();

    let title = "Resource Utilization by Department".to_string();
    Chart {
        layout: json!({
            "title": { "text": title },
            "yaxis": { "title": { "text": "Utilization (%)" } },
            "showlegend": false,
        }),
        title,
        traces: Value::Array(traces),
    }
}

/// Daily budget spend summed across departments.
pub fn daily_budget_totals(records: &[MetricRecord]) -> BTreeMap<NaiveDate, f64> {
    let mut totals = BTreeMap::new();
    for r in records.iter().filter(|r| r.metric_name == BUDGET_SPENT) {
        *totals.entry(r.date).or_insert(0.0) += r.value;
    }
    totals
}

pub fn budget_trend_chart(records: &[MetricRecord]) -> Chart {
    let totals = daily_budget_totals(records);
    let dates: Vec<String> = totals.keys().map(|d| d.format("%Y-%m-%d").to_string()).collect();
    let values: Vec<f64> = totals.values().copied().collect();

    let title = "Daily Budget Spend Trend".to_string();
    Chart {
        layout: json!({
            "title": { "text": title },
            "xaxis": { "title": { "text": "Date" } },
            "yaxis": { "title": { "text": "Budget spent" } },
        }),
        title,
        traces: json!([{ "type": "scatter", "mode": "lines", "name": "Total", "x": dates, "y": values }]),
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// JSON safe to embed inside a `<script>` element.
fn script_json(value: &Value) -> Result<String, OpscastError> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// Render a standalone HTML page that loads Plotly from its CDN.
pub fn render_html(chart: &Chart) -> Result<String, OpscastError> {
    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <script src="{cdn}"></script>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 20px; }}
        #chart {{ width: 100%; height: 90vh; }}
    </style>
</head>
<body>
    <div id="chart"></div>
    <script>
        Plotly.newPlot("chart", {traces}, {layout}, {{"responsive": true}});
    </script>
</body>
</html>
"#,
        title = escape_html(&chart.title),
        cdn = PLOTLY_CDN,
        traces = script_json(&chart.traces)?,
        layout = script_json(&chart.layout)?,
    ))
}
