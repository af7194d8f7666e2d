use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default output variable of a vector_search step.
pub const DEFAULT_IDS_VARIABLE: &str = "ids";

/// Variable holding the final result of a plan.
pub const RESULT_VARIABLE: &str = "last";

/// Sort direction for select steps and table queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// `desc` (any case) is descending; everything else is ascending.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    pub fn is_desc(self) -> bool {
        matches!(self, Self::Desc)
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// One `(field, direction)` sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    pub dir: SortDirection,
}

impl SortKey {
    pub fn new(field: impl Into<String>, dir: SortDirection) -> Self {
        Self {
            field: field.into(),
            dir,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }
}

/// ANN search over an entity's embedding collection; binds identifiers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VectorSearchOp {
    pub entity: String,
    pub text: String,
    pub topk: usize,
    #[serde(rename = "return")]
    pub output: String,
}

/// Relational fetch restricted to the identifiers bound to `ids_in`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOp {
    pub entity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids_in: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// Payload of the reserved join/aggregate steps, kept verbatim.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ReservedOp {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A typed plan step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    VectorSearch(VectorSearchOp),
    Select(SelectOp),
    /// Reserved: accepted and executed as a no-op.
    Join(ReservedOp),
    /// Reserved: accepted and executed as a no-op.
    Aggregate(ReservedOp),
}

impl Operation {
    /// Wire tag of this step.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::VectorSearch(_) => "vector_search",
            Self::Select(_) => "select",
            Self::Join(_) => "join",
            Self::Aggregate(_) => "aggregate",
        }
    }

    pub fn vector_search(entity: &str, text: &str, topk: usize, output: &str) -> Self {
        Self::VectorSearch(VectorSearchOp {
            entity: entity.to_string(),
            text: text.to_string(),
            topk,
            output: output.to_string(),
        })
    }

    pub fn select(
        entity: &str,
        ids_in: Option<&str>,
        sort: Vec<SortKey>,
        limit: Option<usize>,
    ) -> Self {
        Self::Select(SelectOp {
            entity: entity.to_string(),
            ids_in: ids_in.map(str::to_string),
            sort,
            limit,
        })
    }
}
