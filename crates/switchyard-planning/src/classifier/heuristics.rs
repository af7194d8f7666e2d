//! Local routing rules applied before any model call, in order.

use switchyard_core::constants::{
    strip_prefix_ignore_case, HYBRID_PREFIX, LISTING_SHORTCUTS, SIMILAR_PREFIX, SQL_PREFIX,
    VECTOR_PREFIX,
};
use switchyard_core::RouteDecision;

use super::ClassificationBasis;

/// Route-forcing prefixes.
const PREFIX_ROUTES: &[(&str, RouteDecision)] = &[
    (SQL_PREFIX, RouteDecision::Sql),
    (VECTOR_PREFIX, RouteDecision::Vector),
    (SIMILAR_PREFIX, RouteDecision::Vector),
    (HYBRID_PREFIX, RouteDecision::Hybrid),
];

/// Similarity vocabulary.
const SIMILARITY_PHRASES: &[&str] = &["find similar", "similar to", "looks like"];

/// Aggregation vocabulary.
const AGGREGATION_KEYWORDS: &[&str] = &["total", "average", "trend"];

/// First rule that fires, if any.
pub fn heuristic_route(text: &str) -> Option<(RouteDecision, ClassificationBasis)> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some((RouteDecision::ChitChat, ClassificationBasis::Empty));
    }

    for (prefix, route) in PREFIX_ROUTES {
        if strip_prefix_ignore_case(trimmed, prefix).is_some() {
            return Some((*route, ClassificationBasis::Prefix));
        }
    }

    let lower = trimmed.to_lowercase();
    if LISTING_SHORTCUTS.contains(&lower.as_str()) {
        return Some((RouteDecision::Sql, ClassificationBasis::Shortcut));
    }
    if lower.contains("compare") && lower.contains("similar") {
        return Some((RouteDecision::Hybrid, ClassificationBasis::Keyword));
    }
    if AGGREGATION_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Some((RouteDecision::Sql, ClassificationBasis::Keyword));
    }
    if SIMILARITY_PHRASES.iter().any(|p| lower.contains(p)) {
        return Some((RouteDecision::Vector, ClassificationBasis::Keyword));
    }
    None
}
