use std::sync::Arc;
use std::time::Duration;

use crate::config::LLMConfig;
use crate::errors::{OpscastError, RetryConfig, with_retry};
use crate::llm::LLMProvider;
use crate::models::{DepartmentStats, Recommendation};
use super::parse::parse_recommendation;
use super::prompt::{build_prompt, response_schema, SYSTEM_PROMPT};
use tracing::{info, warn};

/// Fetches one recommendation per department from the configured service.
/// Never fails: any error, timeout or missing provider yields a placeholder.
pub struct RecommendationAdapter {
    provider: Option<Arc<dyn LLMProvider>>,
    timeout: Duration,
    retry: RetryConfig,
}

impl RecommendationAdapter {
    pub fn new(provider: Option<Arc<dyn LLMProvider>>, timeout: Duration, retry: RetryConfig) -> Self {
        Self { provider, timeout, retry }
    }

    pub fn from_config(provider: Option<Arc<dyn LLMProvider>>, config: &LLMConfig) -> Self {
        let retry = RetryConfig { max_retries: config.max_retries, ..Default::default() };
        Self::new(provider, config.timeout, retry)
    }

    pub async fn recommend(&self, stats: &DepartmentStats) -> Recommendation {
        let Some(provider) = self.provider.as_deref() else {
            info!(department = %stats.department, "No recommendation service configured, using placeholder");
            return Recommendation::placeholder(&stats.department);
        };

        match self.request(provider, stats).await {
            Ok(rec) => {
                info!(
                    department = %rec.department,
                    priority = %rec.priority,
                    savings_percent = rec.savings_percent,
                    "Recommendation received"
                );
                rec
            }
            Err(e) => {
                warn!(
                    department = %stats.department,
                    provider = provider.provider_name(),
                    error = %e,
                    "Recommendation unavailable, using placeholder"
                );
                Recommendation::placeholder(&stats.department)
            }
        }
    }

    /// One recommendation per entry of `stats`, in the same order.
    pub async fn recommend_all<F>(&self, stats: &[DepartmentStats], mut on_done: F) -> Vec<Recommendation>
    where
        F: FnMut(&Recommendation),
    {
        let mut recommendations = Vec::with_capacity(stats.len());
        for dept in stats {
            let rec = self.recommend(dept).await;
            on_done(&rec);
            recommendations.push(rec);
        }
        recommendations
    }

    async fn request(&self, provider: &dyn LLMProvider, stats: &DepartmentStats) -> Result<Recommendation, OpscastError> {
        let prompt = build_prompt(stats);
        let schema = response_schema();
        let prompt = prompt.as_str();
        let schema = &schema;
        let timeout = self.timeout;
        let operation = format!("recommendation:{}", stats.department);

        with_retry(&operation, &self.retry, || async move {
            let reply = tokio::time::timeout(timeout, provider.complete_structured(prompt, schema, Some(SYSTEM_PROMPT)))
                .await
                .map_err(|_| OpscastError::Timeout(format!("no reply within {}s", timeout.as_secs_f64())))??;
            parse_recommendation(stats, &reply)
        })
        .await
    }
}
