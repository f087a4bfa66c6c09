use async_trait::async_trait;

use crate::llm::error::LlmError;
use crate::llm::types::ChatParams;

/// Sends fully resolved parameters upstream and returns the raw reply text,
/// which may be empty. Blank replies are the dispatcher's concern.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat(&self, params: &ChatParams) -> Result<String, LlmError>;
}
