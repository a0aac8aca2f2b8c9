use super::traits::ConfigSection;
use crate::error::GapmaError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    /// Upper bound on oracle calls in flight during one expansion step.
    pub max_concurrency: usize,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 60,
            max_retries: 3,
            initial_backoff_ms: 500,
            max_backoff_ms: 8000,
            max_concurrency: 4,
        }
    }
}

impl OracleConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ConfigSection for OracleConfig {
    fn section_name() -> &'static str {
        "oracle"
    }

    fn validate(&self) -> Result<(), GapmaError> {
        if self.base_url.trim().is_empty() {
            return Err(GapmaError::Configuration(
                "Oracle base URL must not be empty".to_string()
            ));
        }
        if self.model.trim().is_empty() {
            return Err(GapmaError::Configuration(
                "Model identifier must not be empty".to_string()
            ));
        }
        if self.max_concurrency < 1 {
            return Err(GapmaError::Configuration(
                "max_concurrency must be at least 1".to_string()
            ));
        }
        if self.timeout_secs == 0 {
            return Err(GapmaError::Configuration(
                "Oracle timeout must be positive".to_string()
            ));
        }
        if self.initial_backoff_ms > self.max_backoff_ms {
            return Err(GapmaError::Configuration(
                "initial_backoff_ms cannot exceed max_backoff_ms".to_string()
            ));
        }
        Ok(())
    }
}
