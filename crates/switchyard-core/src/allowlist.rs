//! AllowlistRegistry is the static safety boundary for generated plans.
//!
//! Declares permitted tables, the columns permitted per table, permitted
//! comparison operators, and default/maximum row limits. Built once from
//! `AllowlistConfig` and never mutated afterwards, so it is shared across
//! concurrent requests behind an `Arc` without locking.
//!
//! Table, entity and column names are matched case-sensitively. Operators
//! are matched case-insensitively (`like` and `LIKE` are the same operator).

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{json, Value};

use crate::config::AllowlistConfig;
use crate::errors::{SwitchyardError, SwitchyardResult};

/// Read-only allowlist lookup.
#[derive(Debug, Clone)]
pub struct AllowlistRegistry {
    tables: BTreeMap<String, BTreeSet<String>>,
    operators: BTreeSet<String>,
    entities: BTreeMap<String, String>,
    sort_aliases: BTreeMap<String, BTreeMap<String, String>>,
    vector_entities: BTreeSet<String>,
    default_limit: usize,
    max_limit: usize,
}

impl AllowlistRegistry {
    /// Build a registry from configuration, rejecting inconsistent contents.
    pub fn from_config(config: &AllowlistConfig) -> SwitchyardResult<Self> {
        if config.max_limit == 0 {
            return Err(SwitchyardError::ConfigError(
                "allowlist.max_limit must be > 0".to_string(),
            ));
        }
        if config.default_limit == 0 || config.default_limit > config.max_limit {
            return Err(SwitchyardError::ConfigError(format!(
                "allowlist.default_limit must be in 1..={}, got {}",
                config.max_limit, config.default_limit
            )));
        }
        for (entity, table) in &config.entities {
            if !config.tables.contains_key(table) {
                return Err(SwitchyardError::ConfigError(format!(
                    "allowlist entity '{entity}' maps to unknown table '{table}'"
                )));
            }
        }
        for entity in &config.vector_entities {
            if !config.entities.contains_key(entity) {
                return Err(SwitchyardError::ConfigError(format!(
                    "allowlist vector entity '{entity}' is not a declared entity"
                )));
            }
        }
        Ok(Self::build(config))
    }

    /// The built-in catalog registry (`products`, `suppliers`, `productcategory`).
    pub fn builtin() -> Self {
        Self::build(&AllowlistConfig::default())
    }

    fn build(config: &AllowlistConfig) -> Self {
        Self {
            tables: config
                .tables
                .iter()
                .map(|(t, cols)| (t.clone(), cols.iter().cloned().collect()))
                .collect(),
            operators: config
                .operators
                .iter()
                .map(|op| op.to_ascii_uppercase())
                .collect(),
            entities: config.entities.clone(),
            sort_aliases: config.sort_aliases.clone(),
            vector_entities: config.vector_entities.iter().cloned().collect(),
            default_limit: config.default_limit,
            max_limit: config.max_limit,
        }
    }

    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn is_table_allowed(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    /// Permitted columns of `table`, empty for an unknown table.
    pub fn columns(&self, table: &str) -> Vec<&str> {
        self.tables
            .get(table)
            .map(|cols| cols.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn is_column_allowed(&self, table: &str, column: &str) -> bool {
        self.tables
            .get(table)
            .is_some_and(|cols| cols.contains(column))
    }

    pub fn is_operator_allowed(&self, operator: &str) -> bool {
        self.operators.contains(&operator.trim().to_ascii_uppercase())
    }

    /// Resolve a plan entity (or a bare table name) to its permitted table.
    pub fn table_for_entity(&self, entity: &str) -> Option<&str> {
        if let Some(table) = self.entities.get(entity) {
            return Some(table.as_str());
        }
        self.tables.get_key_value(entity).map(|(t, _)| t.as_str())
    }

    /// Resolve a sort field to its canonical column, following aliases.
    /// Returns `None` when neither the alias nor the column is permitted.
    pub fn resolve_sort_field(&self, table: &str, field: &str) -> Option<String> {
        if self.is_column_allowed(table, field) {
            return Some(field.to_string());
        }
        self.sort_aliases
            .get(table)
            .and_then(|aliases| aliases.get(field))
            .filter(|column| self.is_column_allowed(table, column))
            .cloned()
    }

    pub fn is_vector_entity(&self, entity: &str) -> bool {
        self.vector_entities.contains(entity)
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    pub fn max_limit(&self) -> usize {
        self.max_limit
    }

    /// Absent or zero → default limit; anything above the maximum → maximum.
    pub fn clamp_limit(&self, requested: Option<usize>) -> usize {
        match requested {
            None | Some(0) => self.default_limit,
            Some(n) => n.min(self.max_limit),
        }
    }

    /// Serialised schema snapshot handed to the planning model.
    pub fn snapshot_json(&self) -> Value {
        let tables: BTreeMap<&str, Vec<&str>> = self
            .tables
            .iter()
            .map(|(t, cols)| (t.as_str(), cols.iter().map(String::as_str).collect()))
            .collect();
        json!({
            "entities": self.entities,
            "tables": tables,
            "vector_entities": self.vector_entities,
            "operators": self.operators,
            "default_limit": self.default_limit,
            "max_limit": self.max_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_are_exact() {
        let reg = AllowlistRegistry::builtin();
        let tables: Vec<&str> = reg.tables().collect();
        assert_eq!(tables, vec!["productcategory", "products", "suppliers"]);
    }

    #[test]
    fn names_are_case_sensitive() {
        let reg = AllowlistRegistry::builtin();
        assert!(reg.is_table_allowed("products"));
        assert!(!reg.is_table_allowed("Products"));
        assert!(reg.is_column_allowed("productcategory", "price"));
        assert!(!reg.is_column_allowed("productcategory", "PRICE"));
    }

    #[test]
    fn operators_are_case_insensitive() {
        let reg = AllowlistRegistry::builtin();
        assert!(reg.is_operator_allowed("ilike"));
        assert!(reg.is_operator_allowed(">="));
        assert!(!reg.is_operator_allowed("!="));
        assert!(!reg.is_operator_allowed("; DROP"));
    }

    #[test]
    fn entity_aliases_resolve() {
        let reg = AllowlistRegistry::builtin();
        assert_eq!(reg.table_for_entity("product"), Some("products"));
        assert_eq!(reg.table_for_entity("suppliers"), Some("suppliers"));
        assert_eq!(reg.table_for_entity("orders"), None);
    }

    #[test]
    fn sort_aliases_follow_to_canonical_column() {
        let reg = AllowlistRegistry::builtin();
        assert_eq!(
            reg.resolve_sort_field("suppliers", "name").as_deref(),
            Some("suppliername")
        );
        assert_eq!(
            reg.resolve_sort_field("suppliers", "supplierid").as_deref(),
            Some("supplierid")
        );
        assert_eq!(reg.resolve_sort_field("productcategory", "name"), None);
    }

    #[test]
    fn clamp_limit_applies_default_and_max() {
        let reg = AllowlistRegistry::builtin();
        assert_eq!(reg.clamp_limit(None), 50);
        assert_eq!(reg.clamp_limit(Some(0)), 50);
        assert_eq!(reg.clamp_limit(Some(3)), 3);
        assert_eq!(reg.clamp_limit(Some(5_000)), 1_000);
    }

    #[test]
    fn inconsistent_config_is_rejected() {
        let mut config = AllowlistConfig::default();
        config
            .entities
            .insert("order".to_string(), "orders".to_string());
        assert!(AllowlistRegistry::from_config(&config).is_err());

        let mut config = AllowlistConfig::default();
        config.default_limit = 2_000;
        assert!(AllowlistRegistry::from_config(&config).is_err());
    }
}
