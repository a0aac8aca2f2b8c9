use super::parsing::{clean_candidate, validate_candidate, ParserChain};
use crate::config::SelectionFidelity;
use crate::error::{GapmaError, Result};
use crate::oracle::{CompletionRequest, TextOracle, JUDGE_TEMPERATURE};
use crate::types::{Description, Population};
use std::collections::HashMap;

fn top_k_instructions(k: usize) -> String {
    format!(
        "Please provide a list of the top {k} most engaging product descriptions from the given set. \
Select each description for its ability to subtly enhance the product's appeal without being overtly exaggerated \
or misleading. The descriptions should be persuasive and compelling while remaining authentic. \
Output them ranked from best to worst as a JSON array of strings: [\"description1\", \"description2\", ..., \"description{k}\"]. \
Copy each selected description exactly as it appears in the given set. \
The list must contain only the top {k} descriptions that best meet the criteria."
    )
}

const TOP_1_INSTRUCTIONS: &str = "Please provide the single most engaging product description from the given set. \
Select it for its ability to subtly enhance the product's appeal without being overtly exaggerated or misleading. \
It should be persuasive and compelling while remaining authentic. Output the description directly, exactly as it \
appears in the set. Do NOT include any numbering prefixes or quotation marks.";

#[derive(Debug, Clone)]
pub struct SelectionParams<'a> {
    pub model: &'a str,
    pub top_k_tokens: u32,
    pub top_1_tokens: u32,
    pub max_description_chars: usize,
    pub fidelity: SelectionFidelity,
}

/// The zero-temperature judge that ranks and filters populations.
pub struct SelectionOracle<'o, O: TextOracle> {
    oracle: &'o O,
    chain: ParserChain,
}

impl<'o, O: TextOracle> SelectionOracle<'o, O> {
    pub fn new(oracle: &'o O) -> Self {
        Self {
            oracle,
            chain: ParserChain::for_selection(),
        }
    }

    /// Ask the judge for the `k` best entries of `pool`, best first.
    ///
    /// Returns at most `min(k, pool.len())` entries; fewer when the reply
    /// yields fewer usable candidates. A non-empty pool never yields an empty
    /// selection: when nothing usable comes back, the leading `min(k, len)`
    /// entries are kept (the previous survivors, in rank order). An empty
    /// pool makes no oracle call.
    pub fn select_top_k(
        &self,
        pool: &[Description],
        k: usize,
        params: &SelectionParams<'_>,
    ) -> Result<Population> {
        if pool.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        let cap = k.min(pool.len());

        let request = CompletionRequest::new(
            params.model,
            top_k_instructions(k),
            serde_json::to_string(pool)?,
        )
        .with_temperature(JUDGE_TEMPERATURE)
        .with_max_output_tokens(params.top_k_tokens);

        let reply = self.oracle.complete(&request)?;

        let candidates: Vec<String> = match self.chain.parse(&reply) {
            Some(parsed) => {
                if parsed.parser != "strict-json" {
                    log::warn!("Judge reply was not clean JSON, recovered with {}", parsed.parser);
                }
                parsed
                    .items
                    .iter()
                    .filter_map(|item| validate_candidate(item, params.max_description_chars))
                    .collect()
            }
            None => {
                log::warn!("Judge reply for top-{} held no recoverable candidates", k);
                Vec::new()
            }
        };

        let selected: Population = match params.fidelity {
            SelectionFidelity::Lenient => candidates.into_iter().take(cap).collect(),
            SelectionFidelity::PoolMembersOnly => {
                let members = MemberIndex::new(pool);
                let total = candidates.len();
                let kept: Population = candidates
                    .iter()
                    .filter_map(|candidate| members.lookup(candidate))
                    .take(cap)
                    .collect();
                if kept.len() < total.min(cap) {
                    log::warn!(
                        "Judge returned {} candidate(s) that are not pool members; dropped",
                        total.min(cap) - kept.len()
                    );
                }
                kept
            }
        };

        if selected.is_empty() {
            log::warn!("Judge selection recovered nothing; keeping the top {} entries in pool order", cap);
            return Ok(pool[..cap].to_vec());
        }
        Ok(selected)
    }

    /// Ask the judge for the single best entry of `pool`.
    pub fn select_top_1(
        &self,
        pool: &[Description],
        params: &SelectionParams<'_>,
    ) -> Result<Description> {
        let first = pool.first().ok_or(GapmaError::EmptyPopulation)?;

        let request = CompletionRequest::new(
            params.model,
            TOP_1_INSTRUCTIONS,
            serde_json::to_string(pool)?,
        )
        .with_temperature(JUDGE_TEMPERATURE)
        .with_max_output_tokens(params.top_1_tokens);

        let reply = self.oracle.complete(&request)?;
        let choice = clean_candidate(&reply);

        match params.fidelity {
            SelectionFidelity::Lenient => Ok(choice),
            SelectionFidelity::PoolMembersOnly => match MemberIndex::new(pool).lookup(&choice) {
                Some(member) => Ok(member),
                None => {
                    log::warn!("Judge's final pick is not a pool member; using top-ranked survivor");
                    Ok(first.clone())
                }
            },
        }
    }
}

/// Whitespace-insensitive lookup from judge text back to the pool's own text.
struct MemberIndex<'p> {
    by_key: HashMap<String, &'p str>,
}

impl<'p> MemberIndex<'p> {
    fn new(pool: &'p [Description]) -> Self {
        let mut by_key = HashMap::with_capacity(pool.len());
        for member in pool {
            by_key.entry(normalize(member)).or_insert(member.as_str());
        }
        Self { by_key }
    }

    fn lookup(&self, candidate: &str) -> Option<Description> {
        self.by_key
            .get(&normalize(candidate))
            .map(|member| member.to_string())
    }
}

fn normalize(text: &str) -> String {
    clean_candidate(text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
