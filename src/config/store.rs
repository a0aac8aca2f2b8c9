use super::traits::ConfigSection;
use crate::error::GapmaError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("tool_descriptions.json"),
        }
    }
}

impl ConfigSection for StoreConfig {
    fn section_name() -> &'static str {
        "store"
    }

    fn validate(&self) -> Result<(), GapmaError> {
        if self.path.as_os_str().is_empty() {
            return Err(GapmaError::Configuration(
                "Store path must not be empty".to_string()
            ));
        }
        Ok(())
    }
}
