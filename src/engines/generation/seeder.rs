use super::parsing::{validate_candidate, ParserChain};
use super::strategy::Strategy;
use crate::oracle::{CompletionRequest, TextOracle};
use crate::types::Population;
use crate::error::OracleError;

const FORMAT_CONSTRAINT: &str = " Do NOT number the descriptions. Return them as a JSON array of strings with no numbering prefixes, \
for example [\"description one\", \"description two\"] and NOT [\"1. description one\", \"2. description two\"].";

/// Generation parameters shared by every seeding call of a run.
#[derive(Debug, Clone)]
pub struct SeedParams<'a> {
    pub model: &'a str,
    pub temperature: f32,
    pub tokens_per_candidate: u32,
    pub max_description_chars: usize,
}

/// Produces the first population of a run.
pub struct PopulationSeeder<'o, O: TextOracle> {
    oracle: &'o O,
    chain: ParserChain,
}

impl<'o, O: TextOracle> PopulationSeeder<'o, O> {
    pub fn new(oracle: &'o O) -> Self {
        Self {
            oracle,
            chain: ParserChain::for_seeding(),
        }
    }

    /// One oracle call asking for `pool_size` strategy-flavored variants.
    ///
    /// The result holds at most `pool_size` entries and may hold fewer,
    /// including none when the reply cannot be parsed.
    pub fn seed(
        &self,
        raw_description: &str,
        strategy: Strategy,
        pool_size: usize,
        params: &SeedParams<'_>,
    ) -> Result<Population, OracleError> {
        let system = format!("{}{}", strategy.instructions(), FORMAT_CONSTRAINT);
        let user = format!(
            "Original description: \"{}\"\nGenerate {} variants in a JSON array.",
            raw_description, pool_size
        );
        let max_tokens = params
            .tokens_per_candidate
            .saturating_mul(u32::try_from(pool_size).unwrap_or(u32::MAX));

        let request = CompletionRequest::new(params.model, system, user)
            .with_temperature(params.temperature)
            .with_max_output_tokens(max_tokens);

        let reply = self.oracle.complete(&request)?;
        Ok(parse_population(
            &self.chain,
            &reply,
            pool_size,
            params.max_description_chars,
        ))
    }
}

/// Parse, validate and truncate (never pad) a list reply.
pub fn parse_population(
    chain: &ParserChain,
    reply: &str,
    limit: usize,
    max_description_chars: usize,
) -> Population {
    let parsed = match chain.parse(reply) {
        Some(parsed) => parsed,
        None => {
            log::warn!("Could not recover any candidates from oracle reply");
            return Vec::new();
        }
    };
    if parsed.parser != "strict-json" {
        log::warn!("Oracle reply was not clean JSON, recovered with {}", parsed.parser);
    }

    let total = parsed.items.len();
    let population: Population = parsed
        .items
        .iter()
        .filter_map(|item| validate_candidate(item, max_description_chars))
        .take(limit)
        .collect();

    let rejected = total - population.len();
    if rejected > 0 {
        log::debug!("Dropped {} of {} parsed candidates (invalid or over limit)", rejected, total);
    }
    population
}
