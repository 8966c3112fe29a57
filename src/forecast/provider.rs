use crate::errors::OpscastError;
use super::confidence::ForecastOutput;
use super::model::{fit_holt, fit_holt_winters, SmoothingParams};
use tracing::debug;

/// Anything that can extend an ordered series by `horizon` periods with bounds.
pub trait Forecaster: Send + Sync {
    fn forecast(&self, series: &[f64], horizon: usize) -> Result<ForecastOutput, OpscastError>;

    /// Forecaster name for logging
    fn name(&self) -> &str;
}

/// Additive Holt-Winters with a Holt's-trend fallback for series shorter than
/// two seasons.
pub struct HoltWintersForecaster {
    params: SmoothingParams,
    period: usize,
    confidence_level: f64,
}

impl HoltWintersForecaster {
    pub fn new(period: usize, confidence_level: f64) -> Self {
        Self {
            params: SmoothingParams::default(),
            period,
            confidence_level,
        }
    }
}

impl Forecaster for HoltWintersForecaster {
    fn forecast(&self, series: &[f64], horizon: usize) -> Result<ForecastOutput, OpscastError> {
        self.params.validate()?;
        if series.iter().any(|v| !v.is_finite()) {
            return Err(OpscastError::Forecast("series contains non-finite values".into()));
        }

        let fit = if series.len() >= self.period * 2 {
            fit_holt_winters(series, &self.params, self.period)?
        } else {
            debug!(points = series.len(), period = self.period, "Series shorter than two seasons, using Holt's trend");
            fit_holt(series, &self.params)?
        };

        let point = fit.predict(horizon);
        Ok(ForecastOutput::from_residuals(point, &fit.residuals, self.confidence_level))
    }

    fn name(&self) -> &str {
        "holt-winters"
    }
}
