pub mod model;
pub mod confidence;
pub mod provider;
pub mod adapter;

pub use confidence::ForecastOutput;
pub use provider::{Forecaster, HoltWintersForecaster};
pub use adapter::{forecast_all, forecast_pair, group_series, ForecastBatch, SeriesKey};
