use super::traits::ConfigSection;
use crate::error::GapmaError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub pool_size: usize,
    pub iterations: usize,
    pub top_k: usize,
    pub generative_temperature: f32,
    /// Output budget per input unit for mutation and crossover.
    pub token_multiplier: u32,
    pub min_output_tokens: u32,
    pub seed_tokens_per_candidate: u32,
    pub select_top_k_tokens: u32,
    pub select_top_1_tokens: u32,
    pub max_description_chars: usize,
    pub selection_fidelity: SelectionFidelity,
    pub seed: Option<u64>,
    pub checkpoint_dir: Option<PathBuf>,
}

/// How much the judge's reply is trusted when it names survivors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionFidelity {
    /// Only text matching a pool member survives selection.
    #[default]
    PoolMembersOnly,
    /// Whatever the judge returns is taken as the selection.
    Lenient,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            pool_size: 10,
            iterations: 5,
            top_k: 10,
            generative_temperature: 0.7,
            token_multiplier: 2,
            min_output_tokens: 16,
            seed_tokens_per_candidate: 60,
            select_top_k_tokens: 1024,
            select_top_1_tokens: 512,
            max_description_chars: 1000,
            selection_fidelity: SelectionFidelity::PoolMembersOnly,
            seed: None,
            checkpoint_dir: None,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), GapmaError> {
        if self.pool_size < 1 {
            return Err(GapmaError::Configuration(
                "Pool size must be at least 1".to_string()
            ));
        }
        if self.top_k < 1 {
            return Err(GapmaError::Configuration(
                "top_k must be at least 1".to_string()
            ));
        }
        if self.generative_temperature <= 0.0 || self.generative_temperature > 2.0 {
            return Err(GapmaError::Configuration(
                "Generative temperature must be in (0, 2]".to_string()
            ));
        }
        if self.max_description_chars == 0 {
            return Err(GapmaError::Configuration(
                "max_description_chars must be positive".to_string()
            ));
        }
        Ok(())
    }
}
