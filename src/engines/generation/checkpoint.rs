use super::strategy::Strategy;
use crate::error::Result;
use crate::types::Population;
use crate::utils::fs::write_atomic;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The last complete population of a run, saved so a crash can resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub raw_description: String,
    pub strategy: Strategy,
    pub completed_generations: usize,
    pub population: Population,
    pub saved_at: String,
}

impl Checkpoint {
    pub fn new(
        raw_description: &str,
        strategy: Strategy,
        completed_generations: usize,
        population: &[String],
    ) -> Self {
        Self {
            raw_description: raw_description.to_string(),
            strategy,
            completed_generations,
            population: population.to_vec(),
            saved_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// `Ok(None)` when no checkpoint exists; a corrupt file is treated the same way.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)?;
        match serde_json::from_str(&contents) {
            Ok(checkpoint) => Ok(Some(checkpoint)),
            Err(e) => {
                log::warn!("Ignoring unreadable checkpoint {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)?;
        write_atomic(path, &json)?;
        Ok(())
    }

    pub fn belongs_to(&self, raw_description: &str, strategy: Strategy) -> bool {
        self.raw_description == raw_description && self.strategy == strategy
    }

    pub fn clear(path: &Path) -> Result<()> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// `{server}-{tool}-{tag}.json`, flattened to a single path component.
    pub fn file_name(server: &str, tool: &str, strategy: Strategy) -> String {
        format!(
            "{}-{}-{}.json",
            path_safe(server),
            path_safe(tool),
            strategy.tag()
        )
    }
}

fn path_safe(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    match cleaned.as_str() {
        "" | "." | ".." => cleaned.replace('.', "_") + "_",
        _ => cleaned,
    }
}
