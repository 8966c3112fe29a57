use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use crate::errors::OpscastError;
use super::openai::{chat_response, check_status, request_error};
use super::provider::LLMProvider;
use super::types::{chat_messages, extract_json, LLMResponse};

const DEFAULT_LOCAL_URL: &str = "http://localhost:11434/v1";
const DEFAULT_LOCAL_MODEL: &str = "llama3.2";

/// OpenAI-style server on the local machine (Ollama, llama.cpp, vLLM).
/// No API key is required.
pub struct LocalProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    temperature: f64,
}

impl LocalProvider {
    pub fn new(base_url: Option<&str>, model: Option<&str>, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.unwrap_or(DEFAULT_LOCAL_URL).trim_end_matches('/').to_string(),
            model: model.unwrap_or(DEFAULT_LOCAL_MODEL).to_string(),
            api_key: api_key.to_string(),
            temperature: 0.3,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Result<Self, OpscastError> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OpscastError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(self)
    }

    async fn chat(&self, prompt: &str, system: Option<&str>) -> Result<LLMResponse, OpscastError> {
        let body = json!({
            "model": self.model,
            "messages": chat_messages(prompt, system),
            "temperature": self.temperature,
        });

        let mut req = self.client.post(format!("{}/chat/completions", self.base_url)).json(&body);
        if !self.api_key.is_empty() {
            req = req.bearer_auth(&self.api_key);
        }
        let resp = req.send().await.map_err(|e| request_error("local", e))?;
        check_status("local", resp.status())?;

        let data: Value = resp.json().await
            .map_err(|e| OpscastError::LLMApi(format!("Parse error: {}", e)))?;

        chat_response("local", &self.model, &data)
    }
}

#[async_trait]
impl LLMProvider for LocalProvider {
    async fn complete_structured(&self, prompt: &str, schema: &Value, system: Option<&str>) -> Result<Value, OpscastError> {
        let augmented = format!("{}\n\nRespond with ONLY valid JSON:\n{}", prompt, serde_json::to_string_pretty(schema)?);
        let response = self.chat(&augmented, system).await?;
        extract_json(&response.content)
            .ok_or_else(|| OpscastError::OutputValidation("No valid JSON in local LLM response".into()))
    }

    fn provider_name(&self) -> &str { "local" }
    fn model_name(&self) -> &str { &self.model }
}
