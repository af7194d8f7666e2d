pub mod allowlist_config;
pub mod classifier_config;
pub mod completion_config;
pub mod defaults;
pub mod embedding_config;
pub mod observability_config;
pub mod planner_config;
pub mod storage_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use allowlist_config::AllowlistConfig;
pub use classifier_config::ClassifierConfig;
pub use completion_config::CompletionConfig;
pub use embedding_config::EmbeddingConfig;
pub use observability_config::ObservabilityConfig;
pub use planner_config::PlannerConfig;
pub use storage_config::StorageConfig;

use crate::errors::{SwitchyardError, SwitchyardResult};

/// Environment variables consulted by [`SwitchyardConfig::apply_env_overrides`].
pub mod env_keys {
    pub const COMPLETION_API_KEY: &str = "SWITCHYARD_COMPLETION_API_KEY";
    pub const COMPLETION_BASE_URL: &str = "SWITCHYARD_COMPLETION_BASE_URL";
    pub const COMPLETION_MODEL: &str = "SWITCHYARD_COMPLETION_MODEL";
    pub const EMBEDDING_BASE_URL: &str = "SWITCHYARD_EMBEDDING_BASE_URL";
    pub const EMBEDDING_MODEL: &str = "SWITCHYARD_EMBEDDING_MODEL";
    pub const DB_PATH: &str = "SWITCHYARD_DB_PATH";
}

/// Top-level configuration. Every section falls back to its defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchyardConfig {
    pub storage: StorageConfig,
    pub completion: CompletionConfig,
    pub embedding: EmbeddingConfig,
    pub classifier: ClassifierConfig,
    pub planner: PlannerConfig,
    pub allowlist: AllowlistConfig,
    pub observability: ObservabilityConfig,
}

impl SwitchyardConfig {
    /// Parse configuration from a TOML string. Missing keys take defaults.
    pub fn from_toml(toml_str: &str) -> SwitchyardResult<Self> {
        toml::from_str(toml_str).map_err(|e| SwitchyardError::ConfigError(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: &Path) -> SwitchyardResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SwitchyardError::ConfigError(format!("{}: {e}", path.display()))
        })?;
        Self::from_toml(&raw)
    }

    /// Overlay values from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Overlay values from an arbitrary lookup. Empty values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(env_keys::COMPLETION_API_KEY) {
            self.completion.api_key = Some(key);
        }
        if let Some(url) = get(env_keys::COMPLETION_BASE_URL) {
            self.completion.base_url = url;
        }
        if let Some(model) = get(env_keys::COMPLETION_MODEL) {
            self.completion.model = model;
        }
        if let Some(url) = get(env_keys::EMBEDDING_BASE_URL) {
            self.embedding.base_url = url;
        }
        if let Some(model) = get(env_keys::EMBEDDING_MODEL) {
            self.embedding.model = model;
        }
        if let Some(path) = get(env_keys::DB_PATH) {
            self.storage.db_path = path;
        }
    }
}
