pub mod stats;
pub mod anomaly;
pub mod summary;

pub use anomaly::{detect_anomalies, DetectedAnomaly};
pub use summary::{anomaly_summary, department_stats, summarize};
