use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::llm::client::ChatBackend;
use crate::llm::error::LlmError;
use crate::llm::types::ChatParams;
use crate::utils::http::build_http_client;

fn truncate_for_log(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let truncated: String = value.chars().take(limit).collect();
    format!("{truncated}... (truncated)")
}

fn summarize_params(params: &ChatParams) -> String {
    let images = params
        .messages
        .iter()
        .filter(|message| message.image_url.is_some())
        .count();
    format!(
        "model={}, messages={}, images={}, temperature={:?}, token_limit={:?}, reasoning_effort={:?}",
        params.model,
        params.messages.len(),
        images,
        params.temperature,
        params.token_limit,
        params.reasoning_effort
    )
}

fn summarize_error_body(body: &str) -> (Option<String>, String) {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return (None, "empty response body".to_string());
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        let message = value
            .pointer("/error/message")
            .and_then(|v| v.as_str())
            .map(|v| v.to_string())
            .or_else(|| {
                value
                    .get("message")
                    .and_then(|v| v.as_str())
                    .map(|v| v.to_string())
            });
        return (message, truncate_for_log(&value.to_string(), 2000));
    }

    (None, truncate_for_log(trimmed, 2000))
}

/// Pulls `choices[0].message.content` out of a chat completions response.
/// Content may be a plain string or a list of text parts; a missing or null
/// content is returned as an empty string.
fn extract_message_content(response: &Value) -> String {
    let Some(content) = response.pointer("/choices/0/message/content") else {
        return String::new();
    };

    match content {
        Value::String(text) => text.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|part| part.get("text").and_then(|v| v.as_str()))
            .collect::<Vec<_>>()
            .join(""),
        _ => String::new(),
    }
}

/// Chat completions client for OpenAI and API-compatible gateways.
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        Ok(Self {
            client: build_http_client(config.openai_timeout)?,
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            api_key: config.openai_api_key.clone(),
        })
    }
}

#[async_trait]
impl ChatBackend for OpenAiClient {
    async fn chat(&self, params: &ChatParams) -> Result<String, LlmError> {
        debug!("OpenAI request: {}", summarize_params(params));

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&params.to_payload())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let (message, body_summary) = summarize_error_body(&body);
            warn!(
                "OpenAI API error: model={}, status={}, body={}",
                params.model, status, body_summary
            );
            return Err(LlmError::Api {
                model: params.model.clone(),
                status: status.as_u16(),
                message: message.unwrap_or(body_summary),
            });
        }

        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body).map_err(|err| {
            LlmError::InvalidBody(format!("{err}: {}", truncate_for_log(&body, 500)))
        })?;

        let content = extract_message_content(&value);
        if content.trim().is_empty() {
            let finish_reason = value
                .pointer("/choices/0/finish_reason")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown");
            warn!(
                "OpenAI response had empty content: model={}, finish_reason={}",
                params.model, finish_reason
            );
        } else {
            debug!(
                "OpenAI response received for model={} ({} chars)",
                params.model,
                content.chars().count()
            );
        }
        Ok(content)
    }
}
