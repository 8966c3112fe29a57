//! Synthetic operational metrics.
//!
//! Each (department, metric) series is `base + trend + seasonal + noise`, with a
//! Bernoulli chance per record of being replaced by an outlier several standard
//! deviations away. All randomness flows from a single seeded [`StdRng`], so a
//! seed and a configuration fully determine the output.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, Uniform};
use tracing::{debug, info};

use crate::config::{GeneratorConfig, MetricProfile, MAX_RECORDS};
use crate::errors::OpscastError;
use crate::models::{HistoricalWindow, MetricRecord};

/// Output of one generation pass.
#[derive(Debug, Clone)]
pub struct GeneratedData {
    pub records: Vec<MetricRecord>,
    pub window: HistoricalWindow,
    pub seed: u64,
}

impl GeneratedData {
    pub fn anomaly_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_anomaly).count()
    }
}

/// Pick the configured seed or draw a fresh one.
pub fn resolve_seed(config: &GeneratorConfig) -> u64 {
    config.seed.unwrap_or_else(rand::random)
}

/// Generate `departments × metrics × days` records, department-major, then
/// metric in profile order, then date ascending.
pub fn generate(config: &GeneratorConfig, seed: u64) -> Result<GeneratedData, OpscastError> {
    if !(config.anomaly_rate.is_finite() && (0.0..=1.0).contains(&config.anomaly_rate)) {
        return Err(OpscastError::Config(format!(
            "anomaly rate must be in [0, 1], got {}",
            config.anomaly_rate
        )));
    }
    if config.seasonal_period_days < 2 {
        return Err(OpscastError::Config("seasonal period must be at least 2 days".into()));
    }
    let (min_sigma, max_sigma) = (config.anomaly_min_sigma, config.anomaly_max_sigma);
    if !(min_sigma >= 0.0 && min_sigma <= max_sigma && max_sigma.is_finite()) {
        return Err(OpscastError::Config(format!(
            "anomaly sigma range [{}, {}] is invalid",
            min_sigma, max_sigma
        )));
    }
    let magnitude = Uniform::new_inclusive(min_sigma, max_sigma);

    if config.date_after(0).is_none() {
        return Err(OpscastError::Config(format!(
            "{} days from {} runs past the supported date range",
            config.days, config.start_date
        )));
    }
    let capacity = config
        .record_count()
        .filter(|n| *n <= MAX_RECORDS)
        .ok_or_else(|| OpscastError::Config(format!("at most {} records can be generated", MAX_RECORDS)))?;

    let window = HistoricalWindow::new(config.start_date, config.days);
    let mut records = Vec::with_capacity(capacity);
    let mut rng = StdRng::seed_from_u64(seed);

    for department in &config.departments {
        for profile in &config.metrics {
            let noise = Normal::new(0.0, profile.noise_sd).map_err(|e| {
                OpscastError::Config(format!("{}: invalid noise_sd: {}", profile.name, e))
            })?;
            let before = records.len();
            for day in 0..config.days {
                let mut value = expected_value(config, profile, day) + noise.sample(&mut rng);
                let is_anomaly = rng.gen_bool(config.anomaly_rate);
                if is_anomaly {
                    let sigma = profile.noise_sd.max(1.0);
                    let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
                    value += direction * magnitude.sample(&mut rng) * sigma;
                }
                records.push(MetricRecord {
                    department: department.clone(),
                    date: window.date_at(day),
                    metric_name: profile.name.clone(),
                    value: profile.clamp(value),
                    is_anomaly,
                });
            }
            debug!(
                department = %department,
                metric = %profile.name,
                anomalies = records[before..].iter().filter(|r| r.is_anomaly).count(),
                "Generated series"
            );
        }
    }

    let data = GeneratedData { records, window, seed };
    info!(
        records = data.records.len(),
        anomalies = data.anomaly_count(),
        start = %window.start,
        end = %window.end(),
        seed,
        "Synthetic data generated"
    );
    Ok(data)
}

/// Noise-free value of a series on a given day.
pub fn expected_value(config: &GeneratorConfig, profile: &MetricProfile, day: u32) -> f64 {
    let t = day as f64;
    let phase = 2.0 * PI * t / config.seasonal_period_days as f64;
    profile.base
        + config.trend_slope * profile.seasonal_scale * t
        + config.seasonal_amplitude * profile.seasonal_scale * phase.sin()
}
