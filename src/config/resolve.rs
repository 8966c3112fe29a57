use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::OpscastError;
use super::credentials::resolve_credential_with;
use super::parser::parse_config;
use super::types::*;
use tracing::info;

/// Values supplied on the command line. They take precedence over everything else.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub output_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub offline: bool,
}

/// Load the optional config file, layer env vars and CLI overrides on top of it,
/// and validate the result.
pub async fn load_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<AnalyzerConfig, OpscastError> {
    let file = match path {
        Some(p) => {
            info!(path = %p.display(), "Loading config file");
            Some(parse_config(p).await?)
        }
        None => None,
    };
    let config = resolve_config(file.as_ref(), overrides, |name| std::env::var(name).ok())?;
    validate_config(&config)?;
    Ok(config)
}

/// Merge defaults < file < environment < CLI into one config.
pub fn resolve_config(
    file: Option<&FileConfig>,
    overrides: &ConfigOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> Result<AnalyzerConfig, OpscastError> {
    let mut config = AnalyzerConfig::default();

    if let Some(file) = file {
        apply_file(&mut config, file, &env);
    }
    apply_env(&mut config, &env)?;

    if let Some(dir) = &overrides.output_dir {
        config.output.directory = dir.clone();
    }
    if let Some(seed) = overrides.seed {
        config.generator.seed = Some(seed);
    }
    config.llm.offline = overrides.offline;

    Ok(config)
}

fn apply_file(config: &mut AnalyzerConfig, file: &FileConfig, env: &impl Fn(&str) -> Option<String>) {
    if let Some(g) = &file.generator {
        let target = &mut config.generator;
        if let Some(v) = &g.departments { target.departments = v.clone(); }
        if let Some(v) = &g.metrics { target.metrics = v.clone(); }
        if let Some(v) = g.start_date { target.start_date = v; }
        if let Some(v) = g.days { target.days = v; }
        if let Some(v) = g.seasonal_amplitude { target.seasonal_amplitude = v; }
        if let Some(v) = g.seasonal_period_days { target.seasonal_period_days = v; }
        if let Some(v) = g.trend_slope { target.trend_slope = v; }
        if let Some(v) = g.anomaly_rate { target.anomaly_rate = v; }
        if let Some(v) = g.anomaly_min_sigma { target.anomaly_min_sigma = v; }
        if let Some(v) = g.anomaly_max_sigma { target.anomaly_max_sigma = v; }
        if g.seed.is_some() { target.seed = g.seed; }
    }

    if let Some(f) = &file.forecast {
        let target = &mut config.forecast;
        if let Some(v) = f.horizon_days { target.horizon_days = v; }
        if let Some(v) = f.min_history { target.min_history = v; }
        if let Some(v) = f.confidence_level { target.confidence_level = v; }
        if f.metrics.is_some() { target.metrics = f.metrics.clone(); }
    }

    if let Some(a) = &file.analysis {
        if let Some(v) = a.z_threshold { config.analysis.z_threshold = v; }
    }

    if let Some(l) = &file.llm {
        let target = &mut config.llm;
        if let Some(v) = &l.provider { target.provider = v.clone(); }
        if l.model.is_some() { target.model = l.model.clone(); }
        if let Some(v) = &l.api_key { target.api_key = resolve_credential_with(v, env); }
        if l.base_url.is_some() { target.base_url = l.base_url.clone(); }
        if let Some(v) = l.timeout_secs { target.timeout = Duration::from_secs(v); }
        if let Some(v) = l.max_retries { target.max_retries = v; }
        if let Some(v) = l.temperature { target.temperature = v; }
    }

    if let Some(o) = &file.output {
        if let Some(v) = &o.directory { config.output.directory = PathBuf::from(v); }
    }
}

fn apply_env(config: &mut AnalyzerConfig, env: &impl Fn(&str) -> Option<String>) -> Result<(), OpscastError> {
    let non_empty = |name: &str| env(name).filter(|v| !v.trim().is_empty());

    if let Some(key) = non_empty("OPSCAST_API_KEY").or_else(|| {
        // The file's key wins over the generic provider variable
        if config.llm.api_key.is_empty() { non_empty("OPENAI_API_KEY") } else { None }
    }) {
        config.llm.api_key = key;
    }
    if let Some(v) = non_empty("OPSCAST_PROVIDER") { config.llm.provider = v; }
    if let Some(v) = non_empty("OPSCAST_MODEL") { config.llm.model = Some(v); }
    if let Some(v) = non_empty("OPSCAST_BASE_URL") { config.llm.base_url = Some(v); }
    if let Some(v) = non_empty("OPSCAST_OUTPUT_DIR") { config.output.directory = PathBuf::from(v); }

    if let Some(v) = non_empty("OPSCAST_SEED") {
        let seed = v.trim().parse::<u64>()
            .map_err(|_| OpscastError::Config(format!("OPSCAST_SEED is not a valid seed: {}", v)))?;
        config.generator.seed = Some(seed);
    }
    if let Some(v) = non_empty("OPSCAST_DAYS") {
        let days = v.trim().parse::<u32>()
            .map_err(|_| OpscastError::Config(format!("OPSCAST_DAYS is not a valid day count: {}", v)))?;
        config.generator.days = days;
    }
    if let Some(v) = non_empty("OPSCAST_DEPARTMENTS") {
        config.generator.departments = v
            .split(',')
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();
    }
    Ok(())
}

/// Reject parameter ranges the pipeline cannot work with.
pub fn validate_config(config: &AnalyzerConfig) -> Result<(), OpscastError> {
    validate_generator(&config.generator)?;

    let f = &config.forecast;
    if f.horizon_days == 0 || f.horizon_days > MAX_HORIZON_DAYS {
        return Err(OpscastError::Config(format!(
            "forecast.horizon_days must be in [1, {}], got {}",
            MAX_HORIZON_DAYS, f.horizon_days
        )));
    }
    if config.generator.date_after(f.horizon_days).is_none() {
        return Err(OpscastError::Config(format!(
            "history from {} plus {} forecast days runs past the supported date range",
            config.generator.start_date, f.horizon_days
        )));
    }
    if f.min_history < 2 {
        return Err(OpscastError::Config("forecast.min_history must be at least 2".into()));
    }
    if !(f.confidence_level > 0.0 && f.confidence_level < 1.0) {
        return Err(OpscastError::Config(format!(
            "forecast.confidence_level must be in (0, 1), got {}",
            f.confidence_level
        )));
    }

    let z = config.analysis.z_threshold;
    if !(z.is_finite() && z > 0.0) {
        return Err(OpscastError::Config(format!("analysis.z_threshold must be positive, got {}", z)));
    }

    let l = &config.llm;
    if l.timeout.is_zero() {
        return Err(OpscastError::Config("llm.timeout_secs must be at least 1".into()));
    }
    if !(0.0..=2.0).contains(&l.temperature) {
        return Err(OpscastError::Config(format!("llm.temperature must be in [0, 2], got {}", l.temperature)));
    }
    if !matches!(l.provider.as_str(), "openai" | "local" | "openai_compatible") {
        return Err(OpscastError::Config(format!("Unknown LLM provider: {}", l.provider)));
    }
    if l.provider == "openai_compatible" && l.base_url.is_none() {
        return Err(OpscastError::Config("llm.base_url is required for openai_compatible".into()));
    }

    Ok(())
}

fn validate_generator(g: &GeneratorConfig) -> Result<(), OpscastError> {
    if !(g.anomaly_rate.is_finite() && (0.0..=1.0).contains(&g.anomaly_rate)) {
        return Err(OpscastError::Config(format!(
            "generator.anomaly_rate must be in [0, 1], got {}",
            g.anomaly_rate
        )));
    }
    if g.days == 0 || g.days > MAX_DAYS {
        return Err(OpscastError::Config(format!(
            "generator.days must be in [1, {}], got {}",
            MAX_DAYS, g.days
        )));
    }
    if g.departments.is_empty() {
        return Err(OpscastError::Config("generator.departments must not be empty".into()));
    }
    let mut seen = HashSet::new();
    for dept in &g.departments {
        if dept.trim().is_empty() {
            return Err(OpscastError::Config("department names must not be blank".into()));
        }
        if !seen.insert(dept.as_str()) {
            return Err(OpscastError::Config(format!("Duplicate department: {}", dept)));
        }
    }
    if g.metrics.is_empty() {
        return Err(OpscastError::Config("generator.metrics must not be empty".into()));
    }
    let mut seen = HashSet::new();
    for metric in &g.metrics {
        if metric.name.trim().is_empty() {
            return Err(OpscastError::Config("metric names must not be blank".into()));
        }
        if !seen.insert(metric.name.as_str()) {
            return Err(OpscastError::Config(format!("Duplicate metric: {}", metric.name)));
        }
        if !(metric.noise_sd.is_finite() && metric.noise_sd >= 0.0) {
            return Err(OpscastError::Config(format!("{}: noise_sd must be non-negative", metric.name)));
        }
        if !metric.base.is_finite() || !metric.seasonal_scale.is_finite() {
            return Err(OpscastError::Config(format!("{}: base and seasonal_scale must be finite", metric.name)));
        }
        if let (Some(min), Some(max)) = (metric.min, metric.max) {
            if min > max {
                return Err(OpscastError::Config(format!("{}: min {} exceeds max {}", metric.name, min, max)));
            }
        }
    }
    if g.record_count().map_or(true, |n| n > MAX_RECORDS) {
        return Err(OpscastError::Config(format!(
            "{} departments x {} metrics x {} days exceeds {} records",
            g.departments.len(),
            g.metrics.len(),
            g.days,
            MAX_RECORDS
        )));
    }
    if g.seasonal_period_days < 2 {
        return Err(OpscastError::Config("generator.seasonal_period_days must be at least 2".into()));
    }
    if !g.seasonal_amplitude.is_finite() || !g.trend_slope.is_finite() {
        return Err(OpscastError::Config("seasonal_amplitude and trend_slope must be finite".into()));
    }
    if !(g.anomaly_min_sigma >= 0.0 && g.anomaly_min_sigma <= g.anomaly_max_sigma && g.anomaly_max_sigma.is_finite()) {
        return Err(OpscastError::Config(format!(
            "anomaly sigma range [{}, {}] is invalid",
            g.anomaly_min_sigma, g.anomaly_max_sigma
        )));
    }
    Ok(())
}
