use super::{
    evolution::EvolutionConfig,
    oracle::OracleConfig,
    store::StoreConfig,
    traits::ConfigSection,
};
use crate::error::GapmaError;
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENV_PREFIX: &str = "GAPMA";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub oracle: OracleConfig,
    pub evolution: EvolutionConfig,
    pub store: StoreConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), GapmaError> {
        self.oracle.validate()?;
        self.evolution.validate()?;
        self.store.validate()?;
        Ok(())
    }

    /// Layer defaults, an optional TOML file, then `GAPMA__SECTION__FIELD` env overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, GapmaError> {
        let defaults = config::Config::try_from(&AppConfig::default())
            .map_err(|e| GapmaError::Configuration(format!("Failed to build defaults: {}", e)))?;

        let mut builder = config::Config::builder().add_source(defaults);
        if let Some(path) = path {
            if !path.exists() {
                return Err(GapmaError::Configuration(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(
                config::File::from(path).format(config::FileFormat::Toml),
            );
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| GapmaError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        log::debug!(
            "Loaded config: sections [{}, {}, {}]",
            OracleConfig::section_name(),
            EvolutionConfig::section_name(),
            StoreConfig::section_name()
        );
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GapmaError> {
        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| GapmaError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| GapmaError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }
}
