use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::operation::SortDirection;

/// Single-table relational query. The only shape the relational store
/// executes for the SQL-only path; every identifier in it is checked by
/// the validator before it reaches SQL, and every value is bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableQuery {
    pub table: String,
    /// `None` selects every permitted column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterClause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterClause {
    pub column: String,
    pub operator: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl TableQuery {
    pub fn all(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: None,
            filters: Vec::new(),
            sort: None,
            limit: None,
        }
    }

    pub fn filter(mut self, column: &str, operator: &str, value: Value) -> Self {
        self.filters.push(FilterClause {
            column: column.to_string(),
            operator: operator.to_string(),
            value,
        });
        self
    }

    pub fn sorted_by(mut self, column: &str, direction: SortDirection) -> Self {
        self.sort = Some(SortSpec {
            column: column.to_string(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}
