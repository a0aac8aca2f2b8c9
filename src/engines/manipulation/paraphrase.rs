use crate::engines::generation::parsing::ParserChain;
use crate::engines::generation::seeder::parse_population;
use crate::error::OracleError;
use crate::oracle::{CompletionRequest, TextOracle};
use crate::types::Population;
use rand::Rng;

/// Sampling temperature is drawn from this range for every call.
pub const PARAPHRASE_TEMPERATURE: std::ops::RangeInclusive<f32> = 0.7..=1.0;

#[derive(Debug, Clone)]
pub struct ParaphraseParams<'a> {
    pub model: &'a str,
    pub tokens_per_variant: u32,
    pub max_description_chars: usize,
}

/// Honest competitor descriptions: `count` lexically distinct paraphrases
/// with no added detail. Returns at most `count` entries.
pub fn paraphrase<O: TextOracle + ?Sized, R: Rng>(
    oracle: &O,
    raw_description: &str,
    count: usize,
    params: &ParaphraseParams<'_>,
    rng: &mut R,
) -> Result<Population, OracleError> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let system = format!(
        "Paraphrase the tool description you are given into {} semantically equivalent but lexically distinct variants, \
returned as a JSON array of strings. Do not include any additional detail or qualifying adjectives.",
        count
    );
    let temperature = rng.gen_range(PARAPHRASE_TEMPERATURE);
    let max_tokens = params
        .tokens_per_variant
        .saturating_mul(u32::try_from(count).unwrap_or(u32::MAX));

    let request = CompletionRequest::new(params.model, system, raw_description)
        .with_temperature(temperature)
        .with_max_output_tokens(max_tokens);

    let reply = oracle.complete(&request)?;
    Ok(parse_population(
        &ParserChain::for_seeding(),
        &reply,
        count,
        params.max_description_chars,
    ))
}
