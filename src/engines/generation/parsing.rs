//! Recovery of candidate lists from free-form oracle replies.
//!
//! Oracle output is untrusted. A [`ParserChain`] first normalises the reply,
//! then tries each [`ListParser`] in order; the first one that yields a list
//! wins. Nothing here returns an error: an unparseable reply is simply `None`.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""((?:[^"\\]|\\.)+)""#).expect("quoted-string pattern is valid"));

static LIST_NUMBERING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)(^|[\[",])([ \t]*)\d+\.\s+"#).expect("numbering pattern is valid"));

static ITEM_NUMBERING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.)]\s+").expect("item numbering pattern is valid"));

/// Normalisation applied to the raw reply before any parser runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preprocess {
    /// Drop a surrounding ```-fenced block.
    StripCodeFence,
    /// Remove `"<digits>. "` list numbering.
    StripNumbering,
}

impl Preprocess {
    fn apply(&self, text: &str) -> String {
        match self {
            Preprocess::StripCodeFence => strip_code_fence(text),
            Preprocess::StripNumbering => strip_list_numbering(text),
        }
    }
}

pub trait ListParser: Send + Sync {
    fn name(&self) -> &'static str;
    fn parse(&self, text: &str) -> Option<Vec<String>>;
}

/// The whole reply is JSON.
pub struct StrictJson;

/// JSON found between the first `[` and the last `]`.
pub struct BracketSlicedJson;

/// Every double-quoted substring.
pub struct QuotedStrings;

impl ListParser for StrictJson {
    fn name(&self) -> &'static str {
        "strict-json"
    }

    fn parse(&self, text: &str) -> Option<Vec<String>> {
        let value: Value = serde_json::from_str(text.trim()).ok()?;
        json_to_items(value)
    }
}

impl ListParser for BracketSlicedJson {
    fn name(&self) -> &'static str {
        "bracket-sliced-json"
    }

    fn parse(&self, text: &str) -> Option<Vec<String>> {
        let start = text.find('[')?;
        let end = text.rfind(']')?;
        if end <= start {
            return None;
        }
        match serde_json::from_str::<Value>(&text[start..=end]).ok()? {
            value @ Value::Array(_) => json_to_items(value),
            _ => None,
        }
    }
}

impl ListParser for QuotedStrings {
    fn name(&self) -> &'static str {
        "quoted-strings"
    }

    fn parse(&self, text: &str) -> Option<Vec<String>> {
        let items: Vec<String> = QUOTED
            .captures_iter(text)
            .map(|cap| unescape(&cap[1]))
            .collect();
        if items.is_empty() {
            None
        } else {
            Some(items)
        }
    }
}

/// Result of a successful chain run.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub items: Vec<String>,
    pub parser: &'static str,
}

pub struct ParserChain {
    preprocess: Vec<Preprocess>,
    parsers: Vec<Box<dyn ListParser>>,
}

impl ParserChain {
    pub fn new(preprocess: Vec<Preprocess>, parsers: Vec<Box<dyn ListParser>>) -> Self {
        Self { preprocess, parsers }
    }

    /// Chain for the seeding and paraphrase replies.
    pub fn for_seeding() -> Self {
        Self::new(
            vec![Preprocess::StripCodeFence],
            vec![
                Box::new(StrictJson),
                Box::new(BracketSlicedJson),
                Box::new(QuotedStrings),
            ],
        )
    }

    /// Chain for top-k selection replies.
    pub fn for_selection() -> Self {
        Self::new(
            vec![Preprocess::StripCodeFence, Preprocess::StripNumbering],
            vec![
                Box::new(StrictJson),
                Box::new(BracketSlicedJson),
                Box::new(QuotedStrings),
            ],
        )
    }

    pub fn parse(&self, raw: &str) -> Option<Parsed> {
        let text = self
            .preprocess
            .iter()
            .fold(raw.to_string(), |acc, step| step.apply(&acc));

        self.parsers.iter().find_map(|parser| {
            parser.parse(&text).map(|items| Parsed {
                items,
                parser: parser.name(),
            })
        })
    }
}

fn json_to_items(value: Value) -> Option<Vec<String>> {
    match value {
        Value::Array(values) => Some(values.into_iter().filter_map(scalar_to_text).collect()),
        other => scalar_to_text(other).map(|item| vec![item]),
    }
}

fn scalar_to_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn unescape(inner: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{}\"", inner)).unwrap_or_else(|_| inner.to_string())
}

pub fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }
    let mut lines: Vec<&str> = trimmed.lines().skip(1).collect();
    if lines.last().map(|line| line.trim_start().starts_with("```")).unwrap_or(false) {
        lines.pop();
    }
    lines.join("\n")
}

pub fn strip_list_numbering(text: &str) -> String {
    LIST_NUMBERING.replace_all(text, "$1$2").into_owned()
}

/// Trim a single candidate, drop a leading `1. ` or `1) ` and surrounding quotes.
pub fn clean_candidate(text: &str) -> String {
    let trimmed = text.trim();
    let unnumbered = ITEM_NUMBERING.replace(trimmed, "");
    let unnumbered = unnumbered.trim();
    let unquoted = unnumbered
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(unnumbered);
    unquoted.trim().to_string()
}

/// Clean a candidate and reject it if it is empty or longer than `max_chars`.
pub fn validate_candidate(text: &str, max_chars: usize) -> Option<String> {
    let cleaned = clean_candidate(text);
    if cleaned.is_empty() || cleaned.chars().count() > max_chars {
        None
    } else {
        Some(cleaned)
    }
}
