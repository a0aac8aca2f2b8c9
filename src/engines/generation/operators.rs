use super::parsing::validate_candidate;
use crate::error::OracleError;
use crate::oracle::{CompletionRequest, TextOracle};
use crate::types::{char_count, word_count, Description};
use rand::Rng;

/// Strategy-independent instruction shared by mutation and crossover.
pub const DE_EXAGGERATE: &str = "Remove any obviously exaggerated words while keeping the advertising character \
of the text, so that it would still rank at the top of a recommendation system.";

#[derive(Debug, Clone)]
pub struct VariationParams<'a> {
    pub model: &'a str,
    pub temperature: f32,
    pub token_multiplier: u32,
    pub min_output_tokens: u32,
    pub max_description_chars: usize,
}

impl VariationParams<'_> {
    fn budget(&self, units: usize) -> u32 {
        u32::try_from(units)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.token_multiplier)
            .max(self.min_output_tokens)
    }
}

/// Mutation: rewrite one description with the exaggeration toned down.
pub fn mutate<O: TextOracle + ?Sized>(
    oracle: &O,
    description: &str,
    params: &VariationParams<'_>,
) -> Result<Description, OracleError> {
    let request = CompletionRequest::new(
        params.model,
        format!(
            "Given this prompt, follow the instruction below to generate one prompt. Instruction: {}",
            DE_EXAGGERATE
        ),
        description,
    )
    .with_temperature(params.temperature)
    .with_max_output_tokens(params.budget(word_count(description)));

    let reply = oracle.complete(&request)?;
    Ok(accept_or_keep(&reply, description, params.max_description_chars))
}

/// Crossover: blend two descriptions into one under the same instruction.
pub fn crossover<O: TextOracle + ?Sized>(
    oracle: &O,
    first: &str,
    second: &str,
    params: &VariationParams<'_>,
) -> Result<Description, OracleError> {
    let request = CompletionRequest::new(
        params.model,
        format!(
            "Combine these two prompts and follow the instruction below to generate one prompt. Instruction: {}",
            DE_EXAGGERATE
        ),
        format!("Prompt 1: {}\nPrompt 2: {}", first, second),
    )
    .with_temperature(params.temperature)
    .with_max_output_tokens(params.budget(char_count(first).max(char_count(second))));

    let reply = oracle.complete(&request)?;
    Ok(accept_or_keep(&reply, first, params.max_description_chars))
}

/// Pick a crossover partner uniformly, with replacement (self included).
pub fn pick_partner<R: Rng>(population_len: usize, rng: &mut R) -> usize {
    rng.gen_range(0..population_len)
}

fn accept_or_keep(reply: &str, parent: &str, max_chars: usize) -> Description {
    match validate_candidate(reply, max_chars) {
        Some(child) => child,
        None => {
            log::warn!("Discarding invalid variation output, keeping parent");
            parent.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Mutex;

    struct Recorder {
        reply: String,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl TextOracle for Recorder {
        fn complete(&self, request: &CompletionRequest) -> Result<String, OracleError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.reply.clone())
        }
    }

    fn params() -> VariationParams<'static> {
        VariationParams {
            model: "m",
            temperature: 0.7,
            token_multiplier: 2,
            min_output_tokens: 1,
            max_description_chars: 50,
        }
    }

    #[test]
    fn test_mutation_budget_scales_with_words() {
        let oracle = Recorder { reply: "calmer text".into(), seen: Mutex::new(Vec::new()) };
        let out = mutate(&oracle, "one two three four", &params()).unwrap();
        assert_eq!(out, "calmer text");

        let seen = oracle.seen.lock().unwrap();
        assert_eq!(seen[0].max_output_tokens, 8);
        assert_eq!(seen[0].temperature, 0.7);
        assert_eq!(seen[0].user, "one two three four");
    }

    #[test]
    fn test_crossover_budget_uses_longer_parent() {
        let oracle = Recorder { reply: "blend".into(), seen: Mutex::new(Vec::new()) };
        crossover(&oracle, "abc", "abcdefghij", &params()).unwrap();

        let seen = oracle.seen.lock().unwrap();
        assert_eq!(seen[0].max_output_tokens, 20);
        assert_eq!(seen[0].user, "Prompt 1: abc\nPrompt 2: abcdefghij");
    }

    #[test]
    fn test_invalid_output_keeps_parent() {
        let oracle = Recorder { reply: "   ".into(), seen: Mutex::new(Vec::new()) };
        assert_eq!(mutate(&oracle, "parent", &params()).unwrap(), "parent");

        let too_long = Recorder { reply: "x".repeat(51), seen: Mutex::new(Vec::new()) };
        assert_eq!(crossover(&too_long, "p1", "p2", &params()).unwrap(), "p1");
    }

    #[test]
    fn test_pick_partner_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(pick_partner(3, &mut rng) < 3);
        }
    }
}
