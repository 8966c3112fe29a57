//! Exponential smoothing models.
//!
//! - **Holt's linear trend**: level + trend, used for short series
//! - **Holt-Winters (additive)**: level + trend + seasonal component
//!
//! Both keep the one-step-ahead in-sample residuals so prediction intervals can
//! be derived from them.

use serde::{Deserialize, Serialize};

use crate::errors::OpscastError;

/// Smoothing parameters shared by both models.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingParams {
    /// Level smoothing (0 < alpha < 1)
    pub alpha: f64,
    /// Trend smoothing (0 < beta < 1)
    pub beta: f64,
    /// Seasonal smoothing (0 < gamma < 1)
    pub gamma: f64,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self { alpha: 0.3, beta: 0.1, gamma: 0.2 }
    }
}

impl SmoothingParams {
    pub fn validate(&self) -> Result<(), OpscastError> {
        for (name, value) in [("alpha", self.alpha), ("beta", self.beta), ("gamma", self.gamma)] {
            if !(0.0 < value && value < 1.0) {
                return Err(OpscastError::Config(format!(
                    "{} must be between 0 and 1 (exclusive), got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// A fitted smoothing model.
#[derive(Debug, Clone)]
pub enum FittedModel {
    Holt {
        level: f64,
        trend: f64,
    },
    HoltWinters {
        level: f64,
        trend: f64,
        /// Seasonal components aligned so that index 0 is the season of the
        /// first forecast step.
        seasonal: Vec<f64>,
    },
}

#[derive(Debug, Clone)]
pub struct Fit {
    pub model: FittedModel,
    /// One-step-ahead in-sample errors.
    pub residuals: Vec<f64>,
}

impl Fit {
    pub fn predict(&self, steps: usize) -> Vec<f64> {
        match &self.model {
            FittedModel::Holt { level, trend } => {
                (1..=steps).map(|h| level + h as f64 * trend).collect()
            }
            FittedModel::HoltWinters { level, trend, seasonal } => (1..=steps)
                .map(|h| level + h as f64 * trend + seasonal[(h - 1) % seasonal.len()])
                .collect(),
        }
    }

    pub fn is_seasonal(&self) -> bool {
        matches!(self.model, FittedModel::HoltWinters { .. })
    }
}

/// Holt's linear trend method. Needs at least 3 points.
pub fn fit_holt(data: &[f64], params: &SmoothingParams) -> Result<Fit, OpscastError> {
    if data.len() < 3 {
        return Err(OpscastError::InsufficientData { required: 3, actual: data.len() });
    }

    let mut level = data[0];
    let mut trend = data[1] - data[0];
    let mut residuals = Vec::with_capacity(data.len() - 1);

    for &value in &data[1..] {
        residuals.push(value - (level + trend));
        let prev_level = level;
        level = params.alpha * value + (1.0 - params.alpha) * (level + trend);
        trend = params.beta * (level - prev_level) + (1.0 - params.beta) * trend;
    }

    Ok(Fit { model: FittedModel::Holt { level, trend }, residuals })
}

/// Additive Holt-Winters. Needs at least two full seasons.
pub fn fit_holt_winters(data: &[f64], params: &SmoothingParams, period: usize) -> Result<Fit, OpscastError> {
    if period < 2 {
        return Err(OpscastError::Forecast("seasonal period must be at least 2".into()));
    }
    let min_required = period * 2;
    if data.len() < min_required {
        return Err(OpscastError::InsufficientData { required: min_required, actual: data.len() });
    }

    // Level is the first season's mean, trend the per-step change between the first two seasons
    let first_avg = data[..period].iter().sum::<f64>() / period as f64;
    let second_avg = data[period..2 * period].iter().sum::<f64>() / period as f64;
    let mut level = first_avg;
    let mut trend = (second_avg - first_avg) / period as f64;
    let mut seasonal: Vec<f64> = data[..period].iter().map(|v| v - first_avg).collect();
    let mut residuals = Vec::with_capacity(data.len() - period);

    for (i, &value) in data.iter().enumerate().skip(period) {
        let season_idx = i % period;
        let prev_level = level;
        let prev_seasonal = seasonal[season_idx];

        residuals.push(value - (level + trend + prev_seasonal));

        level = params.alpha * (value - prev_seasonal) + (1.0 - params.alpha) * (level + trend);
        trend = params.beta * (level - prev_level) + (1.0 - params.beta) * trend;
        seasonal[season_idx] = params.gamma * (value - level) + (1.0 - params.gamma) * prev_seasonal;
    }

    // Rotate so the first forecast step (index data.len()) reads seasonal[0]
    let offset = data.len() % period;
    seasonal.rotate_left(offset);

    Ok(Fit {
        model: FittedModel::HoltWinters { level, trend, seasonal },
        residuals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_params_validation() {
        assert!(SmoothingParams::default().validate().is_ok());
        let bad = SmoothingParams { alpha: 1.0, ..Default::default() };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_holt_follows_linear_trend() {
        let data: Vec<f64> = (0..20).map(|i| 10.0 + 2.0 * i as f64).collect();
        let fit = fit_holt(&data, &SmoothingParams::default()).unwrap();
        let forecast = fit.predict(3);
        assert!((forecast[0] - 50.0).abs() < 1e-6);
        assert!((forecast[2] - 54.0).abs() < 1e-6);
        assert!(fit.residuals.iter().all(|r| r.abs() < 1e-9));
    }

    #[test]
    fn test_holt_insufficient_data() {
        let result = fit_holt(&[1.0, 2.0], &SmoothingParams::default());
        assert!(matches!(result, Err(OpscastError::InsufficientData { required: 3, actual: 2 })));
    }

    #[test]
    fn test_holt_winters_tracks_pure_seasonality() {
        let period = 7;
        let data: Vec<f64> = (0..70)
            .map(|i| 100.0 + 10.0 * (2.0 * PI * i as f64 / period as f64).sin())
            .collect();
        let fit = fit_holt_winters(&data, &SmoothingParams::default(), period).unwrap();
        assert!(fit.is_seasonal());
        let forecast = fit.predict(14);
        for (h, value) in forecast.iter().enumerate() {
            let t = (70 + h) as f64;
            let expected = 100.0 + 10.0 * (2.0 * PI * t / period as f64).sin();
            assert!((value - expected).abs() < 1.0, "step {}: {} vs {}", h, value, expected);
        }
    }

    #[test]
    fn test_holt_winters_phase_with_partial_season() {
        // 23 points is not a multiple of the period; forecast must stay in phase
        let period = 5;
        let pattern = [0.0, 4.0, 8.0, 4.0, 0.0];
        let data: Vec<f64> = (0..23).map(|i| 50.0 + pattern[i % period]).collect();
        let fit = fit_holt_winters(&data, &SmoothingParams::default(), period).unwrap();
        let forecast = fit.predict(5);
        for (h, value) in forecast.iter().enumerate() {
            let expected = 50.0 + pattern[(23 + h) % period];
            assert!((value - expected).abs() < 1e-6, "step {}: {} vs {}", h, value, expected);
        }
    }

    #[test]
    fn test_holt_winters_needs_two_seasons() {
        let data = vec![1.0; 13];
        let result = fit_holt_winters(&data, &SmoothingParams::default(), 7);
        assert!(matches!(result, Err(OpscastError::InsufficientData { required: 14, actual: 13 })));
    }
}
