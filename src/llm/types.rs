use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
        }
    }
}

/// One role-tagged turn. A user turn may carry a single image as a data URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    pub image_url: Option<String>,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            text: text.into(),
            image_url: None,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            image_url: None,
        }
    }

    pub fn user_with_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            image_url: Some(image_url.into()),
        }
    }

    fn to_wire(&self) -> Value {
        let content = match &self.image_url {
            None => Value::String(self.text.clone()),
            Some(url) => json!([
                { "type": "text", "text": self.text },
                { "type": "image_url", "image_url": { "url": url } }
            ]),
        };
        json!({ "role": self.role.as_str(), "content": content })
    }
}

/// A logical call: what to say, and optional overrides of the configured defaults.
#[derive(Debug, Clone, Default)]
pub struct ModelRequest {
    pub messages: Vec<ChatMessage>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl ModelRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    #[cfg(test)]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    #[cfg(test)]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Model families differ in which sampling parameters the API accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    Standard,
    Reasoning,
}

const REASONING_MODEL_PREFIXES: &[&str] = &["gpt-5", "o1", "o3", "o4"];

impl ModelFamily {
    pub fn classify(model: &str) -> Self {
        let lowered = model.trim().to_lowercase();
        if REASONING_MODEL_PREFIXES
            .iter()
            .any(|prefix| lowered.starts_with(prefix))
        {
            ModelFamily::Reasoning
        } else {
            ModelFamily::Standard
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLimit {
    /// `max_tokens`, accepted by standard chat models.
    MaxTokens(u32),
    /// `max_completion_tokens`, which also covers hidden reasoning tokens.
    MaxCompletionTokens(u32),
}

/// Fully resolved wire parameters for one upstream call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatParams {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub token_limit: TokenLimit,
    pub reasoning_effort: Option<String>,
}

impl ChatParams {
    pub fn to_payload(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("model".to_string(), json!(self.model));
        payload.insert(
            "messages".to_string(),
            Value::Array(self.messages.iter().map(ChatMessage::to_wire).collect()),
        );
        if let Some(temperature) = self.temperature {
            payload.insert("temperature".to_string(), json!(temperature));
        }
        match self.token_limit {
            TokenLimit::MaxTokens(value) => {
                payload.insert("max_tokens".to_string(), json!(value));
            }
            TokenLimit::MaxCompletionTokens(value) => {
                payload.insert("max_completion_tokens".to_string(), json!(value));
            }
        }
        if let Some(effort) = &self.reasoning_effort {
            payload.insert("reasoning_effort".to_string(), json!(effort));
        }
        Value::Object(payload)
    }
}

/// Text returned by the dispatcher, tagged with the model that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub model: String,
    pub fell_back: bool,
}
