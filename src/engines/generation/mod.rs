pub mod strategy;
pub mod parsing;
pub mod seeder;
pub mod operators;
pub mod selection;
pub mod checkpoint;
pub mod evolution_engine;
pub mod progress;

pub use strategy::Strategy;
pub use parsing::{ListParser, ParserChain, Parsed, Preprocess};
pub use seeder::{PopulationSeeder, SeedParams};
pub use operators::{crossover, mutate, VariationParams};
pub use selection::{SelectionOracle, SelectionParams};
pub use checkpoint::Checkpoint;
pub use evolution_engine::{
    build_workers, run_concurrently, EvolutionEngine, ProgressCallback, RunReport, RunRequest,
};
pub use progress::{LoggingProgress, SilentProgress};
