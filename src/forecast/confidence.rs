//! Prediction intervals derived from in-sample residuals.

use serde::{Deserialize, Serialize};

/// Point forecast with symmetric prediction bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastOutput {
    pub forecast: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    /// Confidence level (e.g., 0.95 for 95%)
    pub confidence_level: f64,
}

impl ForecastOutput {
    /// Create from point forecast and per-step standard errors.
    pub fn from_standard_errors(forecast: Vec<f64>, std_errors: &[f64], confidence_level: f64) -> Self {
        let z = z_score(confidence_level);

        let lower = forecast.iter().zip(std_errors).map(|(&f, &se)| f - z * se).collect();
        let upper = forecast.iter().zip(std_errors).map(|(&f, &se)| f + z * se).collect();

        Self { forecast, lower, upper, confidence_level }
    }

    /// Intervals widen with the square root of the horizon step.
    pub fn from_residuals(forecast: Vec<f64>, residuals: &[f64], confidence_level: f64) -> Self {
        let std_dev = residual_std(residuals);
        let std_errors: Vec<f64> = (0..forecast.len())
            .map(|h| std_dev * ((h + 1) as f64).sqrt())
            .collect();
        Self::from_standard_errors(forecast, &std_errors, confidence_level)
    }

    /// Check the shape invariants a downstream consumer relies on.
    pub fn validate(&self, horizon: usize) -> Result<(), String> {
        if self.forecast.len() != horizon || self.lower.len() != horizon || self.upper.len() != horizon {
            return Err(format!(
                "expected {} points, got forecast={} lower={} upper={}",
                horizon,
                self.forecast.len(),
                self.lower.len(),
                self.upper.len()
            ));
        }
        for i in 0..horizon {
            let (lo, f, hi) = (self.lower[i], self.forecast[i], self.upper[i]);
            if !(lo.is_finite() && f.is_finite() && hi.is_finite()) {
                return Err(format!("non-finite value at step {}", i + 1));
            }
            if lo > f || f > hi {
                return Err(format!("bounds out of order at step {}: {} <= {} <= {}", i + 1, lo, f, hi));
            }
        }
        Ok(())
    }
}

fn residual_std(residuals: &[f64]) -> f64 {
    if residuals.is_empty() {
        return 0.0;
    }
    let n = residuals.len() as f64;
    let mean = residuals.iter().sum::<f64>() / n;
    let variance = residuals.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Two-sided standard normal quantile for a confidence level.
///
/// Abramowitz & Stegun 26.2.23; absolute error below 4.5e-4.
pub fn z_score(confidence_level: f64) -> f64 {
    let p = ((1.0 - confidence_level) / 2.0).clamp(1e-12, 0.5);
    let t = (-2.0 * p.ln()).sqrt();
    let numerator = 2.515517 + 0.802853 * t + 0.010328 * t * t;
    let denominator = 1.0 + 1.432788 * t + 0.189269 * t * t + 0.001308 * t * t * t;
    (t - numerator / denominator).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_z_score_common_levels() {
        assert!((z_score(0.95) - 1.96).abs() < 1e-3);
        assert!((z_score(0.99) - 2.576).abs() < 1e-3);
        assert!((z_score(0.90) - 1.645).abs() < 1e-3);
        assert!((z_score(0.80) - 1.282).abs() < 1e-3);
    }

    #[test]
    fn test_from_standard_errors() {
        let forecast = vec![100.0, 110.0, 120.0];
        let result = ForecastOutput::from_standard_errors(forecast.clone(), &[5.0, 10.0, 15.0], 0.95);
        assert_eq!(result.forecast, forecast);
        assert!(result.lower[0] < 100.0 && result.upper[0] > 100.0);
        assert!(result.upper[2] - result.lower[2] > result.upper[0] - result.lower[0]);
        assert!(result.validate(3).is_ok());
    }

    #[test]
    fn test_from_residuals_widens_with_horizon() {
        let residuals = vec![1.0, -1.0, 2.0, -2.0];
        let result = ForecastOutput::from_residuals(vec![10.0; 4], &residuals, 0.95);
        let widths: Vec<f64> = result.upper.iter().zip(&result.lower).map(|(u, l)| u - l).collect();
        assert!(widths.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_zero_residuals_give_degenerate_bounds() {
        let result = ForecastOutput::from_residuals(vec![5.0, 6.0], &[], 0.95);
        assert_eq!(result.lower, vec![5.0, 6.0]);
        assert_eq!(result.upper, vec![5.0, 6.0]);
        assert!(result.validate(2).is_ok());
    }

    #[test]
    fn test_validate_rejects_malformed_output() {
        let mut output = ForecastOutput::from_residuals(vec![1.0, 2.0], &[0.5, -0.5], 0.95);
        assert!(output.validate(3).is_err());
        output.forecast[1] = f64::NAN;
        assert!(output.validate(2).is_err());
    }
}
