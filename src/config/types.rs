use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const STAFF_HOURS: &str = "staff_hours";
pub const BUDGET_SPENT: &str = "budget_spent";
pub const RESOURCE_UTILIZATION: &str = "resource_utilization";
pub const PRODUCTIVITY_SCORE: &str = "productivity_score";

/// Upper bound on the generated history, about a century of days.
pub const MAX_DAYS: u32 = 36_600;
/// Upper bound on departments × metrics × days.
pub const MAX_RECORDS: usize = 50_000_000;
/// Upper bound on the forecast horizon.
pub const MAX_HORIZON_DAYS: u32 = 3_660;

/// Contents of an optional YAML configuration file. Every field may be omitted.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct FileConfig {
    pub generator: Option<GeneratorSection>,
    pub forecast: Option<ForecastSection>,
    pub analysis: Option<AnalysisSection>,
    pub llm: Option<LLMSection>,
    pub output: Option<OutputSection>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct GeneratorSection {
    pub departments: Option<Vec<String>>,
    pub metrics: Option<Vec<MetricProfile>>,
    pub start_date: Option<NaiveDate>,
    pub days: Option<u32>,
    pub seasonal_amplitude: Option<f64>,
    pub seasonal_period_days: Option<u32>,
    pub trend_slope: Option<f64>,
    pub anomaly_rate: Option<f64>,
    pub anomaly_min_sigma: Option<f64>,
    pub anomaly_max_sigma: Option<f64>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ForecastSection {
    pub horizon_days: Option<u32>,
    pub min_history: Option<usize>,
    pub confidence_level: Option<f64>,
    pub metrics: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AnalysisSection {
    pub z_threshold: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct LLMSection {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct OutputSection {
    pub directory: Option<String>,
}

/// Shape of one synthetic metric series.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MetricProfile {
    pub name: String,
    pub base: f64,
    pub noise_sd: f64,
    /// Multiplier applied to the shared seasonal amplitude and trend slope.
    #[serde(default = "default_seasonal_scale")]
    pub seasonal_scale: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

fn default_seasonal_scale() -> f64 {
    1.0
}

impl MetricProfile {
    pub fn new(name: &str, base: f64, noise_sd: f64, seasonal_scale: f64) -> Self {
        Self {
            name: name.to_string(),
            base,
            noise_sd,
            seasonal_scale,
            min: None,
            max: None,
        }
    }

    pub fn bounded(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn clamp(&self, value: f64) -> f64 {
        let value = match self.min {
            Some(min) => value.max(min),
            None => value,
        };
        match self.max {
            Some(max) => value.min(max),
            None => value,
        }
    }

    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new(STAFF_HOURS, 80.0, 10.0, 1.0).bounded(Some(0.0), None),
            Self::new(BUDGET_SPENT, 10_000.0, 1_000.0, 100.0).bounded(Some(0.0), None),
            Self::new(RESOURCE_UTILIZATION, 75.0, 15.0, 1.0).bounded(Some(0.0), Some(100.0)),
            Self::new(PRODUCTIVITY_SCORE, 85.0, 5.0, 0.0),
        ]
    }
}

/// Fully resolved run configuration. Built once at startup and never mutated.
#[derive(Debug, Clone, Default)]
pub struct AnalyzerConfig {
    pub generator: GeneratorConfig,
    pub forecast: ForecastConfig,
    pub analysis: AnalysisConfig,
    pub llm: LLMConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub departments: Vec<String>,
    pub metrics: Vec<MetricProfile>,
    pub start_date: NaiveDate,
    pub days: u32,
    pub seasonal_amplitude: f64,
    pub seasonal_period_days: u32,
    pub trend_slope: f64,
    pub anomaly_rate: f64,
    pub anomaly_min_sigma: f64,
    pub anomaly_max_sigma: f64,
    /// `None` draws a fresh seed per run.
    pub seed: Option<u64>,
}

impl GeneratorConfig {
    /// Number of records a run produces, `None` on overflow.
    pub fn record_count(&self) -> Option<usize> {
        self.departments
            .len()
            .checked_mul(self.metrics.len())?
            .checked_mul(self.days as usize)
    }

    /// The day after the history ends plus `extra_days`, `None` past the calendar's range.
    pub fn date_after(&self, extra_days: u32) -> Option<NaiveDate> {
        self.start_date
            .checked_add_days(chrono::Days::new(self.days as u64 + extra_days as u64))
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            departments: ["IT", "Sales", "Operations", "HR", "Marketing"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
            metrics: MetricProfile::defaults(),
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            days: 365,
            seasonal_amplitude: 10.0,
            seasonal_period_days: 7,
            trend_slope: 0.01,
            anomaly_rate: 0.02,
            anomaly_min_sigma: 3.0,
            anomaly_max_sigma: 5.0,
            seed: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ForecastConfig {
    pub horizon_days: u32,
    pub min_history: usize,
    pub confidence_level: f64,
    /// Restricts forecasting to these metrics; `None` forecasts every metric.
    pub metrics: Option<Vec<String>>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_days: 90,
            min_history: 14,
            confidence_level: 0.95,
            metrics: None,
        }
    }
}

impl ForecastConfig {
    pub fn includes(&self, metric: &str) -> bool {
        match &self.metrics {
            Some(list) => list.iter().any(|m| m == metric),
            None => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub z_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { z_threshold: 2.0 }
    }
}

#[derive(Clone)]
pub struct LLMConfig {
    pub provider: String,
    pub model: Option<String>,
    /// Empty when no credential was supplied.
    pub api_key: String,
    pub base_url: Option<String>,
    pub timeout: Duration,
    pub max_retries: u32,
    pub temperature: f64,
    /// Skip the recommendation service entirely.
    pub offline: bool,
}

impl LLMConfig {
    pub fn is_configured(&self) -> bool {
        !self.offline && (!self.api_key.is_empty() || self.provider == "local")
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: None,
            api_key: String::new(),
            base_url: None,
            timeout: Duration::from_secs(30),
            max_retries: 1,
            temperature: 0.3,
            offline: false,
        }
    }
}

impl std::fmt::Debug for LLMConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LLMConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "[REDACTED]" })
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("temperature", &self.temperature)
            .field("offline", &self.offline)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./output"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_metric_profiles() {
        let profiles = MetricProfile::defaults();
        let names: Vec<&str> = profiles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec![STAFF_HOURS, BUDGET_SPENT, RESOURCE_UTILIZATION, PRODUCTIVITY_SCORE]);
    }

    #[test]
    fn test_profile_clamp() {
        let util = MetricProfile::new(RESOURCE_UTILIZATION, 75.0, 15.0, 1.0).bounded(Some(0.0), Some(100.0));
        assert_eq!(util.clamp(130.0), 100.0);
        assert_eq!(util.clamp(-4.0), 0.0);
        assert_eq!(util.clamp(42.0), 42.0);
        let open = MetricProfile::new(PRODUCTIVITY_SCORE, 85.0, 5.0, 0.0);
        assert_eq!(open.clamp(-4.0), -4.0);
    }

    #[test]
    fn test_generator_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.departments.len(), 5);
        assert_eq!(config.days, 365);
        assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_forecast_metric_filter() {
        let mut config = ForecastConfig::default();
        assert!(config.includes(BUDGET_SPENT));
        config.metrics = Some(vec![RESOURCE_UTILIZATION.to_string()]);
        assert!(config.includes(RESOURCE_UTILIZATION));
        assert!(!config.includes(BUDGET_SPENT));
    }

    #[test]
    fn test_llm_config_debug_redacts_key() {
        let config = LLMConfig {
            api_key: "sk-very-secret".to_string(),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-very-secret"));
        assert!(config.is_configured());
    }

    #[test]
    fn test_llm_config_unconfigured_without_key() {
        assert!(!LLMConfig::default().is_configured());
        let offline = LLMConfig { api_key: "k".into(), offline: true, ..Default::default() };
        assert!(!offline.is_configured());
    }

    #[test]
    fn test_file_config_from_yaml() {
        let yaml = "generator:\n  days: 30\n  anomaly_rate: 0.0\n  departments: [A, B]\nllm:\n  provider: local\n";
        let parsed: FileConfig = serde_yaml::from_str(yaml).unwrap();
        let generator = parsed.generator.unwrap();
        assert_eq!(generator.days, Some(30));
        assert_eq!(generator.departments.unwrap(), vec!["A", "B"]);
        assert_eq!(parsed.llm.unwrap().provider.as_deref(), Some("local"));
    }
}
