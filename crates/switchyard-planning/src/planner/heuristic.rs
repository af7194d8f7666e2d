//! Deterministic keyword planner. Pure, network-free, never fails.
//!
//! Always emits exactly two steps: a product vector_search binding `ids`,
//! then a select over those ids (suppliers or priced categories).

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use switchyard_core::config::PlannerConfig;
use switchyard_core::constants::{PRODUCT_CATEGORY_ENTITY, PRODUCT_ENTITY, SUPPLIER_ENTITY};
use switchyard_core::plan::{Operation, Plan, SortDirection, SortKey, DEFAULT_IDS_VARIABLE};

static QUOTED_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r#""([^"]+)""#).ok());
static FOR_CLAUSE_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\bfor\s+(.+)$").ok());
static TOP_N_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"\btop\s*(\d+)|\b(\d+)\s*(cheapest|expensive|items?)").ok()
});
static NON_WORD_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").ok());

const STOP_WORDS: &[&str] = &[
    "cheapest", "most", "expensive", "lowest", "highest", "price", "cost", "list", "show",
    "find", "me", "the", "a", "an", "of", "for", "under", "over", "top", "items", "item",
    "products", "product", "supplier", "suppliers", "with", "and", "or", "to", "please",
];

const SPELLED_NUMBERS: &[(&str, usize)] = &[
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
];

const DESCENDING_WORDS: &[&str] = &["expensive", "highest"];

/// Largest explicit result count honoured from the request text.
const MAX_EXPLICIT_COUNT: usize = 50;

/// Most trailing tokens kept in a search phrase.
const MAX_PHRASE_TOKENS: usize = 5;

/// Build the fallback plan for `text`.
pub fn heuristic_plan(text: &str, config: &PlannerConfig) -> Plan {
    let lower = text.to_lowercase();
    let search_text = extract_search_text(text);
    let want_supplier = lower.contains("supplier");

    let default_count = if want_supplier {
        config.supplier_result_limit
    } else {
        config.price_result_limit
    };
    let limit = extract_top_n(&lower).unwrap_or(default_count);

    let search = Operation::vector_search(
        PRODUCT_ENTITY,
        &search_text,
        config.heuristic_topk,
        DEFAULT_IDS_VARIABLE,
    );

    let select = if want_supplier {
        Operation::select(
            SUPPLIER_ENTITY,
            Some(DEFAULT_IDS_VARIABLE),
            vec![SortKey::asc("name")],
            Some(limit),
        )
    } else {
        let dir = if DESCENDING_WORDS.iter().any(|w| lower.contains(w)) {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        Operation::select(
            PRODUCT_CATEGORY_ENTITY,
            Some(DEFAULT_IDS_VARIABLE),
            vec![SortKey::new("price", dir)],
            Some(limit),
        )
    };

    Plan::new(vec![search, select])
}

/// Quoted phrase verbatim, else the cleaned `for ...` clause, else the
/// cleaned tail of the whole request.
pub fn extract_search_text(raw: &str) -> String {
    let text = raw.trim();
    if text.is_empty() {
        return String::new();
    }

    if let Some(quoted) = QUOTED_RE
        .as_ref()
        .and_then(|re| re.captures(text))
        .and_then(|c| c.get(1))
    {
        return quoted.as_str().trim().to_string();
    }

    let lower = text.to_lowercase();
    if let Some(after_for) = FOR_CLAUSE_RE
        .as_ref()
        .and_then(|re| re.captures(&lower))
        .and_then(|c| c.get(1))
    {
        return clean_tokens(after_for.as_str());
    }

    clean_tokens(&lower)
}

fn clean_tokens(s: &str) -> String {
    let cleaned = match NON_WORD_RE.as_ref() {
        Some(re) => re.replace_all(s, " ").trim().to_string(),
        None => s.trim().to_string(),
    };

    let stop: HashSet<&str> = STOP_WORDS.iter().copied().collect();
    let tokens: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|t| !t.chars().all(|c| c.is_ascii_digit()))
        .filter(|t| !stop.contains(t))
        .collect();

    if tokens.is_empty() {
        return cleaned;
    }

    let take = tokens.len().min(MAX_PHRASE_TOKENS);
    tokens[tokens.len() - take..].join(" ")
}

/// "top 3", "3 cheapest", "5 items", or a spelled-out one..ten.
pub fn extract_top_n(lower: &str) -> Option<usize> {
    if let Some(caps) = TOP_N_RE.as_ref().and_then(|re| re.captures(lower)) {
        let explicit = caps
            .iter()
            .skip(1)
            .flatten()
            .filter_map(|m| m.as_str().parse::<usize>().ok())
            .find(|n| (1..=MAX_EXPLICIT_COUNT).contains(n));
        if explicit.is_some() {
            return explicit;
        }
    }

    let words: Vec<&str> = lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    SPELLED_NUMBERS
        .iter()
        .find(|(word, _)| words.contains(word))
        .map(|(_, n)| *n)
}
