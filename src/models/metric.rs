use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One synthetic observation for a (department, metric, date) triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRecord {
    pub department: String,
    pub date: NaiveDate,
    pub metric_name: String,
    pub value: f64,
    /// Set when the generator replaced the value with an injected outlier.
    pub is_anomaly: bool,
}

/// The inclusive range of dates covered by the generated history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalWindow {
    pub start: NaiveDate,
    pub days: u32,
}

impl HistoricalWindow {
    pub fn new(start: NaiveDate, days: u32) -> Self {
        Self { start, days }
    }

    /// Last date inside the window. Equal to `start` for an empty window.
    pub fn end(&self) -> NaiveDate {
        self.start + chrono::Days::new(self.days.saturating_sub(1) as u64)
    }

    pub fn date_at(&self, index: u32) -> NaiveDate {
        self.start + chrono::Days::new(index as u64)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days > 0 && date >= self.start && date <= self.end()
    }

    /// `count` consecutive dates starting the day after the window ends.
    pub fn horizon_dates(&self, count: usize) -> Vec<NaiveDate> {
        let first = self.end() + chrono::Days::new(1);
        (0..count as u64).map(|i| first + chrono::Days::new(i)).collect()
    }
}
