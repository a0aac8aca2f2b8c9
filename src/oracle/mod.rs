//! Access to the external generative-text service.
//!
//! Every component of the engine talks to the service through [`TextOracle`],
//! so tests can swap in a scripted implementation.

pub mod openai;
pub mod retry;

pub use openai::OpenAiOracle;
pub use retry::{RetryPolicy, RetryingOracle};

use crate::error::OracleError;

/// Temperature used for every judging call.
pub const JUDGE_TEMPERATURE: f32 = 0.0;

/// One completion call: system instructions plus user content.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl CompletionRequest {
    pub fn new(model: &str, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            model: model.to_string(),
            system: system.into(),
            user: user.into(),
            temperature: JUDGE_TEMPERATURE,
            max_output_tokens: 256,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }
}

/// A generative-text service. Implementations must be shareable across the
/// worker pool that runs variation operators.
pub trait TextOracle: Send + Sync {
    fn complete(&self, request: &CompletionRequest) -> Result<String, OracleError>;
}

impl<T: TextOracle + ?Sized> TextOracle for &T {
    fn complete(&self, request: &CompletionRequest) -> Result<String, OracleError> {
        (**self).complete(request)
    }
}

impl<T: TextOracle + ?Sized> TextOracle for Box<T> {
    fn complete(&self, request: &CompletionRequest) -> Result<String, OracleError> {
        (**self).complete(request)
    }
}

impl<T: TextOracle + ?Sized> TextOracle for std::sync::Arc<T> {
    fn complete(&self, request: &CompletionRequest) -> Result<String, OracleError> {
        (**self).complete(request)
    }
}
