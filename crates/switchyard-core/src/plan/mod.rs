//! Plan data model: an ordered, immutable list of typed operations.

pub mod operation;
pub mod table_query;
pub mod wire;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub use operation::{
    Operation, ReservedOp, SelectOp, SortDirection, SortKey, VectorSearchOp,
    DEFAULT_IDS_VARIABLE, RESULT_VARIABLE,
};
pub use table_query::{FilterClause, SortSpec, TableQuery};

/// An ordered sequence of operations. Never mutated once built; the
/// validator produces a new `Plan` instead of editing steps in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Plan {
    #[serde(rename = "plan")]
    operations: Vec<Operation>,
}

impl Plan {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self { operations }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl<'de> Deserialize<'de> for Plan {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let doc = Value::deserialize(deserializer)?;
        wire::decode_document(&doc).map_err(serde::de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let step = Value::deserialize(deserializer)?;
        wire::decode_operation(0, &step).map_err(serde::de::Error::custom)
    }
}
