use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-request routing decision. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteDecision {
    /// Direct conversational reply.
    ChitChat,
    /// Relational-only service.
    Sql,
    /// Vector-only service.
    Vector,
    /// Planner + validator + executor.
    Hybrid,
}

impl RouteDecision {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ChitChat => "chitchat",
            Self::Sql => "sql",
            Self::Vector => "vector",
            Self::Hybrid => "hybrid",
        }
    }

    /// Parse a classifier label. Unrecognized labels fall to `ChitChat`.
    pub fn from_label(label: &str) -> Self {
        let cleaned: String = label
            .trim()
            .trim_matches(|c: char| !c.is_ascii_alphanumeric())
            .to_ascii_lowercase();
        match cleaned.as_str() {
            "structured" | "sql" => Self::Sql,
            "semantic" | "vector" => Self::Vector,
            "hybrid" => Self::Hybrid,
            _ => Self::ChitChat,
        }
    }
}

impl fmt::Display for RouteDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
