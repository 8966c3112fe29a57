use std::sync::Arc;

use crate::config::LLMConfig;
use crate::errors::OpscastError;
use super::local::LocalProvider;
use super::openai::OpenAIProvider;
use super::provider::LLMProvider;

/// Build the provider named in the config. Returns `Ok(None)` when the
/// service is switched off or has no credential, in which case every
/// recommendation becomes a placeholder.
pub fn create_provider(config: &LLMConfig) -> Result<Option<Arc<dyn LLMProvider>>, OpscastError> {
    if !config.is_configured() {
        return Ok(None);
    }
    let model = config.model.as_deref();

    let provider: Arc<dyn LLMProvider> = match config.provider.as_str() {
        "openai" => {
            let provider = match config.base_url.as_deref() {
                Some(url) => OpenAIProvider::with_base_url(&config.api_key, model, url),
                None => OpenAIProvider::new(&config.api_key, model),
            };
            Arc::new(provider.with_temperature(config.temperature).with_request_timeout(config.timeout)?)
        }
        "openai_compatible" => {
            let url = config.base_url.as_deref().ok_or_else(|| {
                OpscastError::Config("openai_compatible provider requires llm.base_url".into())
            })?;
            Arc::new(
                OpenAIProvider::with_base_url(&config.api_key, model, url)
                    .with_temperature(config.temperature)
                    .with_request_timeout(config.timeout)?,
            )
        }
        "local" => Arc::new(
            LocalProvider::new(config.base_url.as_deref(), model, &config.api_key)
                .with_temperature(config.temperature)
                .with_request_timeout(config.timeout)?,
        ),
        other => return Err(OpscastError::Config(format!("Unknown LLM provider: {}", other))),
    };
    Ok(Some(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_key_means_no_provider() {
        let config = LLMConfig::default();
        assert!(create_provider(&config).unwrap().is_none());
    }

    #[test]
    fn test_offline_wins_over_key() {
        let config = LLMConfig { api_key: "sk-test".into(), offline: true, ..Default::default() };
        assert!(create_provider(&config).unwrap().is_none());
    }

    #[test]
    fn test_openai_provider_selected() {
        let config = LLMConfig { api_key: "sk-test".into(), ..Default::default() };
        let provider = create_provider(&config).unwrap().unwrap();
        assert_eq!(provider.provider_name(), "openai");
        assert_eq!(provider.model_name(), "gpt-3.5-turbo");
    }

    #[test]
    fn test_local_needs_no_key() {
        let config = LLMConfig { provider: "local".into(), ..Default::default() };
        let provider = create_provider(&config).unwrap().unwrap();
        assert_eq!(provider.provider_name(), "local");
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let config = LLMConfig { provider: "carrier-pigeon".into(), api_key: "k".into(), ..Default::default() };
        assert!(matches!(create_provider(&config), Err(OpscastError::Config(_))));
    }
}
