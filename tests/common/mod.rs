#![allow(dead_code)]

use gapma::error::OracleError;
use gapma::oracle::{CompletionRequest, TextOracle};
use std::collections::HashMap;
use std::sync::Mutex;

/// Which engine step issued a request, recognised from its system prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    Seed,
    Mutate,
    Crossover,
    TopK,
    Top1,
    Paraphrase,
}

impl CallKind {
    pub fn classify(request: &CompletionRequest) -> CallKind {
        let system = request.system.as_str();
        if system.starts_with("Given this prompt") {
            CallKind::Mutate
        } else if system.starts_with("Combine these two prompts") {
            CallKind::Crossover
        } else if system.contains("provide a list of the top") {
            CallKind::TopK
        } else if system.contains("single most engaging") {
            CallKind::Top1
        } else if system.starts_with("Paraphrase") {
            CallKind::Paraphrase
        } else if system.contains("Do NOT number the descriptions") {
            CallKind::Seed
        } else {
            panic!("unrecognised request: {}", system)
        }
    }
}

type Responder = Box<dyn Fn(&CompletionRequest) -> Result<String, OracleError> + Send + Sync>;

/// Scripted, call-counting oracle. Thread-safe so variation can fan out.
#[derive(Default)]
pub struct MockOracle {
    responders: HashMap<CallKind, Responder>,
    calls: Mutex<Vec<(CallKind, CompletionRequest)>>,
}

impl MockOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(mut self, kind: CallKind, responder: F) -> Self
    where
        F: Fn(&CompletionRequest) -> Result<String, OracleError> + Send + Sync + 'static,
    {
        self.responders.insert(kind, Box::new(responder));
        self
    }

    pub fn reply(self, kind: CallKind, text: &str) -> Self {
        let text = text.to_string();
        self.on(kind, move |_| Ok(text.clone()))
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_of(&self, kind: CallKind) -> Vec<CompletionRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, r)| r.clone())
            .collect()
    }

    pub fn count(&self, kind: CallKind) -> usize {
        self.calls_of(kind).len()
    }
}

impl TextOracle for MockOracle {
    fn complete(&self, request: &CompletionRequest) -> Result<String, OracleError> {
        let kind = CallKind::classify(request);
        self.calls.lock().unwrap().push((kind, request.clone()));
        match self.responders.get(&kind) {
            Some(responder) => responder(request),
            None => panic!("no scripted reply for {:?}", kind),
        }
    }
}

/// Mutation that appends `!` to its input.
pub fn bang(request: &CompletionRequest) -> Result<String, OracleError> {
    Ok(format!("{}!", request.user))
}

/// Crossover that echoes both parents as `first|second`.
pub fn join_parents(request: &CompletionRequest) -> Result<String, OracleError> {
    let mut lines = request.user.lines();
    let first = lines.next().unwrap_or("").trim_start_matches("Prompt 1: ");
    let second = lines.next().unwrap_or("").trim_start_matches("Prompt 2: ");
    Ok(format!("{}|{}", first, second))
}
