use crate::config::EvolutionConfig;
use crate::engines::generation::{
    checkpoint::Checkpoint,
    operators::{crossover, mutate, pick_partner, VariationParams},
    progress::LoggingProgress,
    seeder::{PopulationSeeder, SeedParams},
    selection::{SelectionOracle, SelectionParams},
    strategy::Strategy,
};
use crate::error::{GapmaError, OracleError, Result};
use crate::oracle::TextOracle;
use crate::types::{Description, Population};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use rayon::ThreadPool;
use std::path::PathBuf;
use std::sync::Arc;

/// What the caller asks of one run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub raw_description: String,
    pub strategy: Strategy,
    pub model: String,
    pub pool_size: usize,
    pub iterations: usize,
    pub top_k: usize,
    pub checkpoint: Option<PathBuf>,
}

impl RunRequest {
    /// Sizes taken from `config`.
    pub fn new(raw_description: &str, strategy: Strategy, model: &str, config: &EvolutionConfig) -> Self {
        Self {
            raw_description: raw_description.to_string(),
            strategy,
            model: model.to_string(),
            pool_size: config.pool_size,
            iterations: config.iterations,
            top_k: config.top_k,
            checkpoint: None,
        }
    }

    /// Build a request from a strategy tag; unknown tags fail before any oracle call.
    pub fn from_tag(
        raw_description: &str,
        strategy_tag: &str,
        model: &str,
        pool_size: usize,
        iterations: usize,
        top_k: usize,
    ) -> Result<Self> {
        Ok(Self {
            raw_description: raw_description.to_string(),
            strategy: strategy_tag.parse()?,
            model: model.to_string(),
            pool_size,
            iterations,
            top_k,
            checkpoint: None,
        })
    }

    pub fn with_checkpoint(mut self, path: impl Into<PathBuf>) -> Self {
        self.checkpoint = Some(path.into());
        self
    }

    fn validate(&self) -> Result<()> {
        if self.raw_description.trim().is_empty() {
            return Err(GapmaError::Configuration(
                "Raw description must not be empty".to_string()
            ));
        }
        if self.model.trim().is_empty() {
            return Err(GapmaError::Configuration(
                "Model identifier must not be empty".to_string()
            ));
        }
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
        Ok(())
    }
}

/// Outcome of a finished run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub description: Description,
    /// The population the final pick was made from.
    pub final_population: Population,
    pub generations_completed: usize,
    pub resumed_from: Option<usize>,
}

pub trait ProgressCallback: Send {
    fn on_seeded(&mut self, population_size: usize);
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, generation: usize, expanded_size: usize, survivors: usize);
}

#[derive(Debug, Clone, Copy)]
enum Variation {
    Mutate { parent: usize },
    Crossover { parent: usize, partner: usize },
}

pub struct EvolutionEngine<'o, O: TextOracle> {
    config: EvolutionConfig,
    oracle: &'o O,
    workers: Arc<ThreadPool>,
    rng: StdRng,
}

/// Worker pool bounding the number of variation calls in flight.
pub fn build_workers(max_concurrency: usize) -> Result<Arc<ThreadPool>> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(max_concurrency.max(1))
        .thread_name(|i| format!("gapma-variation-{}", i))
        .build()
        .map(Arc::new)
        .map_err(|e| GapmaError::Configuration(format!("Failed to build worker pool: {}", e)))
}

impl<'o, O: TextOracle> EvolutionEngine<'o, O> {
    pub fn new(config: EvolutionConfig, oracle: &'o O, max_concurrency: usize) -> Result<Self> {
        let workers = build_workers(max_concurrency)?;
        Ok(Self::with_workers(config, oracle, workers))
    }

    /// Share an existing worker pool, e.g. across concurrent runs.
    pub fn with_workers(config: EvolutionConfig, oracle: &'o O, workers: Arc<ThreadPool>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            config,
            oracle,
            workers,
            rng,
        }
    }

    /// Run seed -> N generations -> final pick.
    pub fn run<C: ProgressCallback>(
        &mut self,
        request: &RunRequest,
        callback: &mut C,
    ) -> Result<RunReport> {
        request.validate()?;

        let variation = VariationParams {
            model: &request.model,
            temperature: self.config.generative_temperature,
            token_multiplier: self.config.token_multiplier,
            min_output_tokens: self.config.min_output_tokens,
            max_description_chars: self.config.max_description_chars,
        };
        let selection_params = SelectionParams {
            model: &request.model,
            top_k_tokens: self.config.select_top_k_tokens,
            top_1_tokens: self.config.select_top_1_tokens,
            max_description_chars: self.config.max_description_chars,
            fidelity: self.config.selection_fidelity,
        };
        let selector = SelectionOracle::new(self.oracle);

        // Seeding (or resume)
        let resumed = match &request.checkpoint {
            Some(path) => Checkpoint::load(path)?
                .filter(|cp| cp.belongs_to(&request.raw_description, request.strategy))
                .filter(|cp| cp.completed_generations <= request.iterations),
            None => None,
        };
        let (mut population, start, resumed_from) = match resumed {
            Some(checkpoint) => {
                log::info!(
                    "[{}] Resuming from checkpoint after generation {}",
                    request.strategy,
                    checkpoint.completed_generations
                );
                let done = checkpoint.completed_generations;
                (checkpoint.population, done, Some(done))
            }
            None => {
                let seeder = PopulationSeeder::new(self.oracle);
                let params = SeedParams {
                    model: &request.model,
                    temperature: self.config.generative_temperature,
                    tokens_per_candidate: self.config.seed_tokens_per_candidate,
                    max_description_chars: self.config.max_description_chars,
                };
                let seeded = seeder.seed(
                    &request.raw_description,
                    request.strategy,
                    request.pool_size,
                    &params,
                )?;
                if seeded.len() < request.pool_size {
                    log::warn!(
                        "[{}] Seeder returned {} of {} requested candidates",
                        request.strategy,
                        seeded.len(),
                        request.pool_size
                    );
                }
                (seeded, 0, None)
            }
        };
        callback.on_seeded(population.len());

        // Evolution loop
        for generation in start..request.iterations {
            callback.on_generation_start(generation);

            if let Some(path) = &request.checkpoint {
                Checkpoint::new(&request.raw_description, request.strategy, generation, &population)
                    .save(path)?;
            }

            let expanded = self.expand(&population, &variation)?;
            population = selector.select_top_k(&expanded, request.top_k, &selection_params)?;

            if population.is_empty() {
                log::warn!(
                    "[{}] Generation {} left no survivors",
                    request.strategy,
                    generation + 1
                );
            }
            callback.on_generation_complete(generation, expanded.len(), population.len());
        }

        // Finalizing
        if let Some(path) = &request.checkpoint {
            Checkpoint::new(&request.raw_description, request.strategy, request.iterations, &population)
                .save(path)?;
        }
        let description = selector.select_top_1(&population, &selection_params)?;
        if let Some(path) = &request.checkpoint {
            Checkpoint::clear(path)?;
        }

        Ok(RunReport {
            description,
            final_population: population,
            generations_completed: request.iterations,
            resumed_from,
        })
    }

    /// Survivors, then each description's mutation and crossover: exactly 3m entries.
    ///
    /// Partners are drawn before fan-out so a seeded run pairs the same way
    /// regardless of worker scheduling. Every task must finish before the
    /// expanded pool is returned.
    pub fn expand(
        &mut self,
        population: &[Description],
        params: &VariationParams<'_>,
    ) -> Result<Population> {
        let tasks: Vec<Variation> = (0..population.len())
            .flat_map(|parent| {
                let partner = pick_partner(population.len(), &mut self.rng);
                [
                    Variation::Mutate { parent },
                    Variation::Crossover { parent, partner },
                ]
            })
            .collect();

        let oracle = self.oracle;
        let children: Vec<Description> = self.workers.install(|| {
            tasks
                .par_iter()
                .map(|task| match *task {
                    Variation::Mutate { parent } => mutate(oracle, &population[parent], params),
                    Variation::Crossover { parent, partner } => {
                        crossover(oracle, &population[parent], &population[partner], params)
                    }
                })
                .collect::<std::result::Result<Vec<_>, OracleError>>()
        })?;

        let mut expanded = Vec::with_capacity(population.len() * 3);
        expanded.extend_from_slice(population);
        expanded.extend(children);
        Ok(expanded)
    }
}

/// Run one independent evolution per request concurrently, sharing a worker pool.
///
/// Each run gets its own RNG (the configured seed offset by the request's
/// index); a failure in one run does not affect the others.
pub fn run_concurrently<O: TextOracle>(
    oracle: &O,
    config: &EvolutionConfig,
    workers: Arc<ThreadPool>,
    requests: &[RunRequest],
) -> Vec<(Strategy, Result<RunReport>)> {
    std::thread::scope(|scope| {
        let handles: Vec<_> = requests
            .iter()
            .enumerate()
            .map(|(index, request)| {
                let mut run_config = config.clone();
                run_config.seed = config.seed.map(|seed| seed.wrapping_add(index as u64));
                let workers = Arc::clone(&workers);
                scope.spawn(move || {
                    let mut engine = EvolutionEngine::with_workers(run_config, oracle, workers);
                    let mut progress = LoggingProgress::new(request.strategy.tag());
                    (request.strategy, engine.run(request, &mut progress))
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect()
    })
}
