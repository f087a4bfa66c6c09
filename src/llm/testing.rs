use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::llm::client::ChatBackend;
use crate::llm::error::LlmError;
use crate::llm::types::ChatParams;

/// Replays queued replies in order and records every request it receives.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<Vec<ChatParams>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: impl Into<String>) -> Self {
        self.replies.lock().push_back(Ok(text.into()));
        self
    }

    pub fn fail(self, err: LlmError) -> Self {
        self.replies.lock().push_back(Err(err));
        self
    }

    pub fn calls(&self) -> Vec<ChatParams> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn chat(&self, params: &ChatParams) -> Result<String, LlmError> {
        self.calls.lock().push(params.clone());
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::InvalidBody("no scripted reply left".to_string())))
    }
}
