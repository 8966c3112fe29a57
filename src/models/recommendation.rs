use serde::{Deserialize, Serialize};

/// Text used in place of advice when the recommendation service could not answer.
pub const PLACEHOLDER_TEXT: &str = "unavailable";

/// Priority of a recommendation, ordered from most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Returns a numeric rank where lower values indicate higher priority.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Case-insensitive parse of the service's priority label.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" | "critical" => Some(Priority::High),
            "medium" | "moderate" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the recommendation came from the service or was substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    Service,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub department: String,
    pub priority: Priority,
    pub text: String,
    pub estimated_savings: f64,
    pub savings_percent: f64,
    #[serde(default)]
    pub inefficiencies: Vec<String>,
    #[serde(default)]
    pub priority_actions: Vec<String>,
    pub source: RecommendationSource,
}

impl Recommendation {
    pub fn placeholder(department: &str) -> Self {
        Self {
            department: department.to_string(),
            priority: Priority::Low,
            text: PLACEHOLDER_TEXT.to_string(),
            estimated_savings: 0.0,
            savings_percent: 0.0,
            inefficiencies: Vec::new(),
            priority_actions: Vec::new(),
            source: RecommendationSource::Placeholder,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.source == RecommendationSource::Placeholder
    }
}
