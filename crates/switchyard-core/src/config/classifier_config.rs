use serde::{Deserialize, Serialize};

use super::defaults;

/// Query classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Ask the completion service when no local heuristic fires.
    pub use_model: bool,
    /// Upper bound on the classification call (milliseconds).
    pub timeout_ms: u64,
    pub temperature: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            use_model: defaults::DEFAULT_USE_MODEL_CLASSIFIER,
            timeout_ms: defaults::DEFAULT_CLASSIFY_TIMEOUT_MS,
            temperature: defaults::DEFAULT_CLASSIFIER_TEMPERATURE,
        }
    }
}
