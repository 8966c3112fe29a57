use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::MetricRecord;
use super::stats::{mean, sample_std};
use tracing::debug;

/// A record whose value sits more than the threshold of standard deviations
/// from its series mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedAnomaly {
    pub department: String,
    pub date: NaiveDate,
    pub metric_name: String,
    pub value: f64,
    pub z_score: f64,
    pub injected: bool,
}

/// Z-score detection over each (department, metric) series.
pub fn detect_anomalies(records: &[MetricRecord], z_threshold: f64) -> Vec<DetectedAnomaly> {
    let mut series: Vec<((&str, &str), Vec<&MetricRecord>)> = Vec::new();
    for record in records {
        let key = (record.department.as_str(), record.metric_name.as_str());
        match series.iter_mut().find(|(k, _)| *k == key) {
            Some((_, rows)) => rows.push(record),
            None => series.push((key, vec![record])),
        }
    }

    let mut detected = Vec::new();
    for ((department, metric), rows) in series {
        let values: Vec<f64> = rows.iter().map(|r| r.value).collect();
        let (Some(m), Some(sd)) = (mean(&values), sample_std(&values)) else {
            continue;
        };
        if sd == 0.0 {
            continue;
        }
        let before = detected.len();
        for row in rows {
            let z = (row.value - m) / sd;
            if z.abs() > z_threshold {
                detected.push(DetectedAnomaly {
                    department: row.department.clone(),
                    date: row.date,
                    metric_name: row.metric_name.clone(),
                    value: row.value,
                    z_score: z,
                    injected: row.is_anomaly,
                });
            }
        }
        debug!(department, metric, count = detected.len() - before, "Anomalies detected");
    }
    detected
}
