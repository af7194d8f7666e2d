use serde::{Deserialize, Serialize};

/// One ANN result: the row id inside a collection and its distance
/// (negative inner product, lower is closer).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorHit {
    pub id: i64,
    pub distance: f64,
}
