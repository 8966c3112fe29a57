use std::sync::Arc;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::RwLock;

use crate::analysis::{anomaly_summary, detect_anomalies, summarize};
use crate::config::{validate_config, AnalyzerConfig};
use crate::errors::OpscastError;
use crate::forecast::{forecast_all, Forecaster, HoltWintersForecaster};
use crate::generator::{generate, resolve_seed};
use crate::llm::{self, LLMProvider};
use crate::models::{ForecastResult, Report};
use crate::recommend::RecommendationAdapter;
use crate::reporting::{assemble_report, write_outputs, RunContext, WrittenFiles};
use super::metrics::compute_summary;
use super::phase::{display_name, PHASES};
use super::state::*;
use tracing::{error, info};

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub report: Report,
    pub forecasts: Vec<ForecastResult>,
    pub files: WrittenFiles,
    pub summary: PipelineSummary,
}

pub struct PipelineOrchestrator {
    config: AnalyzerConfig,
    state: RwLock<PipelineState>,
    llm: Option<Arc<dyn LLMProvider>>,
    forecaster: Arc<dyn Forecaster>,
    show_progress: bool,
}

impl PipelineOrchestrator {
    pub fn new(config: AnalyzerConfig) -> Result<Self, OpscastError> {
        validate_config(&config)?;
        let llm = llm::create_provider(&config.llm)?;
        match &llm {
            Some(provider) => info!(
                provider = provider.provider_name(),
                model = provider.model_name(),
                "Recommendation service configured"
            ),
            None if config.llm.offline => info!("Offline mode, recommendations will be placeholders"),
            None => info!("No API key configured, recommendations will be placeholders"),
        }

        let forecaster = Arc::new(HoltWintersForecaster::new(
            config.generator.seasonal_period_days as usize,
            config.forecast.confidence_level,
        ));

        Ok(Self {
            config,
            state: RwLock::new(PipelineState::new()),
            llm,
            forecaster,
            show_progress: true,
        })
    }

    /// Replace the recommendation provider. `None` forces placeholders.
    pub fn with_llm(mut self, llm: Option<Arc<dyn LLMProvider>>) -> Self {
        self.llm = llm;
        self
    }

    pub fn with_forecaster(mut self, forecaster: Arc<dyn Forecaster>) -> Self {
        self.forecaster = forecaster;
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub async fn state(&self) -> PipelineState {
        self.state.read().await.clone()
    }

    async fn update_status(&self, status: PipelineStatus) {
        self.state.write().await.status = status;
    }

    async fn set_phase(&self, phase: PhaseName, bar: &ProgressBar) {
        info!(phase = %phase, "{}", display_name(phase));
        bar.set_message(display_name(phase));
        self.state.write().await.current_phase = Some(phase);
    }

    async fn complete_phase(&self, phase: PhaseName, bar: &ProgressBar) {
        bar.inc(1);
        let mut state = self.state.write().await;
        state.completed_phases.push(phase);
        state.current_phase = None;
    }

    fn progress_bar(&self) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(PHASES.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("  {bar:30.cyan/dark_gray} {pos}/{len} phases | {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        bar.enable_steady_tick(Duration::from_millis(120));
        bar
    }

    /// Execute every phase in order. Recommendation failures degrade to
    /// placeholders; generation, configuration and output errors abort the run.
    pub async fn run(&self) -> Result<PipelineOutcome, OpscastError> {
        self.update_status(PipelineStatus::Running).await;
        let bar = self.progress_bar();

        match self.run_phases(&bar).await {
            Ok(outcome) => {
                bar.finish_with_message("All phases complete");
                self.update_status(PipelineStatus::Completed).await;
                Ok(outcome)
            }
            Err(e) => {
                bar.abandon_with_message("Failed");
                let mut state = self.state.write().await;
                error!(
                    phase = state.current_phase.map(display_name).unwrap_or("none"),
                    completed = state.completed_phases.len(),
                    error = %e,
                    "Pipeline failed"
                );
                state.status = PipelineStatus::Failed;
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn run_phases(&self, bar: &ProgressBar) -> Result<PipelineOutcome, OpscastError> {
        let started = Instant::now();
        let config = &self.config;

        // Phase 1: synthetic data
        self.set_phase(PhaseName::DataGeneration, bar).await;
        let seed = resolve_seed(&config.generator);
        let data = generate(&config.generator, seed)?;
        let detected = detect_anomalies(&data.records, config.analysis.z_threshold);
        info!(
            injected = data.anomaly_count(),
            detected = detected.len(),
            z_threshold = config.analysis.z_threshold,
            "Anomaly detection complete"
        );
        self.complete_phase(PhaseName::DataGeneration, bar).await;

        // Phase 2: forecasts
        self.set_phase(PhaseName::Forecasting, bar).await;
        let batch = forecast_all(
            &data.records,
            &data.window,
            &config.forecast,
            config.generator.seasonal_period_days as usize,
            self.forecaster.as_ref(),
        );
        self.complete_phase(PhaseName::Forecasting, bar).await;

        // Phase 3: recommendations
        self.set_phase(PhaseName::Recommendations, bar).await;
        let metrics_summary = summarize(&config.generator.departments, &data.records, &detected, &batch.results);
        let adapter = RecommendationAdapter::from_config(self.llm.clone(), &config.llm);
        let recommendations = adapter
            .recommend_all(&metrics_summary.departments, |rec| {
                bar.set_message(format!("Recommendations ({})", rec.department));
            })
            .await;
        self.complete_phase(PhaseName::Recommendations, bar).await;

        // Phase 4: report and charts
        self.set_phase(PhaseName::Reporting, bar).await;
        let ctx = RunContext::new(seed);
        let anomalies = anomaly_summary(&data.records, &detected, config.analysis.z_threshold);
        let report = assemble_report(&ctx, &data.window, recommendations, &batch, metrics_summary, anomalies);
        let files = write_outputs(
            &config.output.directory,
            &report,
            &batch.results,
            &data.records,
            &config.generator.departments,
        )
        .await?;
        self.complete_phase(PhaseName::Reporting, bar).await;

        let summary = compute_summary(
            &report,
            data.records.len(),
            started.elapsed().as_millis() as u64,
            PHASES.len(),
        );
        info!(
            run_id = %report.run_id,
            total_savings = report.total_savings,
            forecasts = summary.forecasts,
            placeholders = summary.placeholder_recommendations,
            "Pipeline complete"
        );

        Ok(PipelineOutcome {
            report,
            forecasts: batch.results,
            files,
            summary,
        })
    }
}
