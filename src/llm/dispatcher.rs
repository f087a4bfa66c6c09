use std::sync::Arc;

use tracing::warn;

use crate::config::Config;
use crate::llm::client::ChatBackend;
use crate::llm::error::LlmError;
use crate::llm::types::{ChatMessage, ChatParams, Completion, ModelFamily, ModelRequest, TokenLimit};
use crate::utils::timing::log_llm_timing;

/// Defaults copied out of [`Config`] at construction time.
#[derive(Debug, Clone)]
pub struct ModelDefaults {
    pub model: String,
    pub fallback_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub reasoning_max_tokens: u32,
    pub reasoning_effort: String,
}

impl ModelDefaults {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.openai_model.clone(),
            fallback_model: config.openai_fallback_model.clone(),
            temperature: config.openai_temperature,
            max_tokens: config.openai_max_tokens,
            reasoning_max_tokens: config.openai_reasoning_max_tokens,
            reasoning_effort: config.openai_reasoning_effort.clone(),
        }
    }
}

pub fn standard_params(
    defaults: &ModelDefaults,
    model: String,
    messages: Vec<ChatMessage>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
) -> ChatParams {
    ChatParams {
        model,
        messages,
        temperature: Some(temperature.unwrap_or(defaults.temperature)),
        token_limit: TokenLimit::MaxTokens(max_tokens.unwrap_or(defaults.max_tokens)),
        reasoning_effort: None,
    }
}

/// Reasoning models reject `temperature` and spend part of the budget on
/// hidden reasoning, so they get the larger limit and a bounded effort.
pub fn reasoning_params(
    defaults: &ModelDefaults,
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: Option<u32>,
) -> ChatParams {
    ChatParams {
        model,
        messages,
        temperature: None,
        token_limit: TokenLimit::MaxCompletionTokens(
            max_tokens.unwrap_or(defaults.reasoning_max_tokens),
        ),
        reasoning_effort: Some(defaults.reasoning_effort.clone()),
    }
}

pub struct Dispatcher {
    backend: Arc<dyn ChatBackend>,
    defaults: ModelDefaults,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn ChatBackend>, config: &Config) -> Self {
        Self {
            backend,
            defaults: ModelDefaults::from_config(config),
        }
    }

    fn resolve_model(&self, requested: Option<&str>) -> String {
        requested
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .unwrap_or(self.defaults.model.as_str())
            .to_string()
    }

    fn build_params(&self, request: &ModelRequest, model: String) -> ChatParams {
        let messages = request.messages.clone();
        match ModelFamily::classify(&model) {
            ModelFamily::Standard => standard_params(
                &self.defaults,
                model,
                messages,
                request.temperature,
                request.max_tokens,
            ),
            ModelFamily::Reasoning => {
                reasoning_params(&self.defaults, model, messages, request.max_tokens)
            }
        }
    }

    async fn send(&self, params: &ChatParams, operation: &str) -> Result<String, LlmError> {
        log_llm_timing("openai", &params.model, operation, || {
            self.backend.chat(params)
        })
        .await
    }

    /// Runs one logical completion. Blank output triggers a single retry on
    /// the fallback model with standard parameters; every other failure is
    /// returned as-is.
    pub async fn complete(
        &self,
        request: ModelRequest,
        operation: &str,
    ) -> Result<Completion, LlmError> {
        let model = self.resolve_model(request.model.as_deref());
        let params = self.build_params(&request, model.clone());

        let text = self.send(&params, operation).await?;
        if !text.trim().is_empty() {
            return Ok(Completion {
                text,
                model,
                fell_back: false,
            });
        }

        let fallback_model = self.defaults.fallback_model.clone();
        if model == fallback_model {
            warn!("Model {model} returned empty content for {operation}; no fallback left");
            return Err(LlmError::EmptyResponse {
                models: vec![model],
            });
        }

        warn!(
            "Model {model} returned empty content for {operation}; retrying once with {fallback_model}"
        );
        let fallback_params = standard_params(
            &self.defaults,
            fallback_model.clone(),
            request.messages,
            request.temperature,
            None,
        );
        let text = self.send(&fallback_params, operation).await?;
        if text.trim().is_empty() {
            warn!("Fallback model {fallback_model} also returned empty content for {operation}");
            return Err(LlmError::EmptyResponse {
                models: vec![model, fallback_model],
            });
        }

        warn!("Fallback model {fallback_model} answered {operation} after {model} returned nothing");
        Ok(Completion {
            text,
            model: fallback_model,
            fell_back: true,
        })
    }
}
