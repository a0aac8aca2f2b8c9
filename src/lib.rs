//! GAPMA: genetic-algorithm search for persuasive tool descriptions.
//!
//! A run seeds a population of strategy-flavored rewrites of a raw tool
//! description, expands it each generation with oracle-driven mutation and
//! crossover, keeps the judge's top-k, and finally asks the judge for the
//! single best survivor.

pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod oracle;
pub mod types;
pub mod utils;

pub use config::AppConfig;
pub use data::DescriptionStore;
pub use engines::generation::{EvolutionEngine, RunReport, RunRequest, Strategy};
pub use error::{GapmaError, OracleError, Result};
pub use oracle::{CompletionRequest, TextOracle};
pub use types::{Description, Population};
