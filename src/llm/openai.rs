use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use crate::errors::OpscastError;
use super::provider::LLMProvider;
use super::types::{chat_messages, extract_json, LLMResponse};
use tracing::debug;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const MAX_TOKENS: u32 = 1024;

/// Chat-completions client for OpenAI and any endpoint speaking the same API.
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f64,
    label: &'static str,
}

impl OpenAIProvider {
    pub fn new(api_key: &str, model: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.3,
            label: "openai",
        }
    }

    pub fn with_base_url(api_key: &str, model: Option<&str>, base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            label: "openai_compatible",
            ..Self::new(api_key, model)
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Bound each HTTP request. The recommendation adapter applies its own
    /// deadline on top of this.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Result<Self, OpscastError> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OpscastError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(self)
    }

    async fn chat(&self, prompt: &str, system: Option<&str>, json_mode: bool) -> Result<LLMResponse, OpscastError> {
        let mut body = json!({
            "model": self.model,
            "messages": chat_messages(prompt, system),
            "max_tokens": MAX_TOKENS,
            "temperature": self.temperature,
        });
        if json_mode {
            body["response_format"] = json!({ "type": "json_object" });
        }

        let resp = self.client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| request_error(self.label, e))?;

        check_status(self.label, resp.status())?;

        let data: Value = resp.json().await
            .map_err(|e| OpscastError::LLMApi(format!("Failed to parse {} response: {}", self.label, e)))?;

        if let Some(error) = data.get("error") {
            return Err(OpscastError::LLMApi(
                error["message"].as_str().unwrap_or("Unknown").to_string(),
            ));
        }
        chat_response(self.label, &self.model, &data)
    }
}

pub(crate) fn request_error(label: &str, e: reqwest::Error) -> OpscastError {
    if e.is_timeout() {
        OpscastError::Timeout(format!("{} request timed out", label))
    } else {
        OpscastError::Network(format!("{} request failed: {}", label, e))
    }
}

pub(crate) fn check_status(label: &str, status: StatusCode) -> Result<(), OpscastError> {
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::TOO_MANY_REQUESTS => Err(OpscastError::RateLimit(format!("{} rate limit", label))),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(OpscastError::Authentication(format!("{} rejected the API key", label)))
        }
        s => Err(OpscastError::LLMApi(format!("{} returned HTTP {}", label, s.as_u16()))),
    }
}

fn message_content(label: &str, data: &Value) -> Result<String, OpscastError> {
    data["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| OpscastError::LLMApi(format!("No content in {} response", label)))
}

/// Reply text plus token usage, when the server reports it.
pub(crate) fn chat_response(label: &str, model: &str, data: &Value) -> Result<LLMResponse, OpscastError> {
    let response = LLMResponse {
        content: message_content(label, data)?,
        input_tokens: data["usage"]["prompt_tokens"].as_u64(),
        output_tokens: data["usage"]["completion_tokens"].as_u64(),
        model: data["model"].as_str().unwrap_or(model).to_string(),
    };
    debug!(
        provider = label,
        model = %response.model,
        input_tokens = ?response.input_tokens,
        output_tokens = ?response.output_tokens,
        "Chat completion received"
    );
    Ok(response)
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn complete_structured(&self, prompt: &str, schema: &Value, system: Option<&str>) -> Result<Value, OpscastError> {
        let prompt = format!(
            "{}\n\nRespond ONLY with valid JSON matching this schema:\n{}",
            prompt,
            serde_json::to_string_pretty(schema)?
        );
        let response = self.chat(&prompt, system, true).await?;
        extract_json(&response.content)
            .ok_or_else(|| OpscastError::OutputValidation(format!("{} reply was not valid JSON", self.label)))
    }

    fn provider_name(&self) -> &str { self.label }
    fn model_name(&self) -> &str { &self.model }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(check_status("openai", StatusCode::OK).is_ok());
        assert!(matches!(check_status("openai", StatusCode::TOO_MANY_REQUESTS), Err(OpscastError::RateLimit(_))));
        assert!(matches!(check_status("openai", StatusCode::UNAUTHORIZED), Err(OpscastError::Authentication(_))));
        assert!(matches!(check_status("openai", StatusCode::BAD_GATEWAY), Err(OpscastError::LLMApi(_))));
    }

    #[test]
    fn test_message_content() {
        let data = json!({"choices": [{"message": {"content": "hello"}}]});
        assert_eq!(message_content("openai", &data).unwrap(), "hello");
        assert!(message_content("openai", &json!({"choices": []})).is_err());
    }

    #[test]
    fn test_chat_response_usage() {
        let data = json!({
            "model": "gpt-3.5-turbo-0125",
            "choices": [{"message": {"content": "{}"}}],
            "usage": {"prompt_tokens": 120, "completion_tokens": 40}
        });
        let response = chat_response("openai", DEFAULT_MODEL, &data).unwrap();
        assert_eq!(response.model, "gpt-3.5-turbo-0125");
        assert_eq!(response.input_tokens, Some(120));
        assert_eq!(response.output_tokens, Some(40));

        let bare = json!({"choices": [{"message": {"content": "{}"}}]});
        let response = chat_response("local", "llama3.2", &bare).unwrap();
        assert_eq!(response.model, "llama3.2");
        assert_eq!(response.input_tokens, None);
    }

    #[test]
    fn test_base_url_override() {
        let p = OpenAIProvider::with_base_url("k", None, "http://proxy.local/v1/");
        assert_eq!(p.base_url, "http://proxy.local/v1");
        assert_eq!(p.model_name(), DEFAULT_MODEL);
        assert_eq!(p.provider_name(), "openai_compatible");
    }
}
