use serde::{Deserialize, Serialize};

/// Progress of a run. `current_phase` stays set when a phase fails.
#[derive(Debug, Clone)]
pub struct PipelineState {
    pub status: PipelineStatus,
    pub current_phase: Option<PhaseName>,
    pub completed_phases: Vec<PhaseName>,
    pub error: Option<String>,
}

impl PipelineState {
    pub fn new() -> Self {
        Self {
            status: PipelineStatus::Queued,
            current_phase: None,
            completed_phases: Vec::new(),
            error: None,
        }
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseName {
    DataGeneration,
    Forecasting,
    Recommendations,
    Reporting,
}

impl std::fmt::Display for PhaseName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataGeneration => write!(f, "data-generation"),
            Self::Forecasting => write!(f, "forecasting"),
            Self::Recommendations => write!(f, "recommendations"),
            Self::Reporting => write!(f, "reporting"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub total_duration_ms: u64,
    pub records: usize,
    pub anomalies_injected: usize,
    pub anomalies_detected: usize,
    pub forecasts: usize,
    pub skipped_forecasts: usize,
    pub recommendations: usize,
    pub placeholder_recommendations: usize,
    pub total_savings: f64,
    pub phases_completed: usize,
}
