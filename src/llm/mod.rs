pub mod client;
pub mod dispatcher;
pub mod error;
pub mod json_extract;
pub mod openai;
#[cfg(test)]
pub mod testing;
pub mod types;

pub use dispatcher::Dispatcher;
pub use error::LlmError;
pub use json_extract::{extract_as, ExtractError};
pub use openai::OpenAiClient;
pub use types::{ChatMessage, ModelRequest};
