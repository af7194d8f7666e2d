use std::collections::HashMap;

use serde::Serialize;

use switchyard_core::models::ResultRow;

/// A value bound to a plan variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Binding {
    Ids(Vec<i64>),
    Rows(Vec<ResultRow>),
}

impl Binding {
    pub fn empty_rows() -> Self {
        Self::Rows(Vec::new())
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Ids(ids) => ids.len(),
            Self::Rows(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Named bindings shared by the steps of one plan execution. One table per
/// request; never shared across requests.
#[derive(Debug, Default)]
pub struct VariableTable {
    vars: HashMap<String, Binding>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, replacing any previous value.
    pub fn bind(&mut self, name: &str, value: Binding) {
        self.vars.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.vars.get(name)
    }

    /// Ids bound under `name`. A missing variable, or one holding rows,
    /// reads as the empty list.
    pub fn ids(&self, name: Option<&str>) -> Vec<i64> {
        match name.and_then(|n| self.vars.get(n)) {
            Some(Binding::Ids(ids)) => ids.clone(),
            _ => Vec::new(),
        }
    }

    pub fn take(&mut self, name: &str) -> Option<Binding> {
        self.vars.remove(name)
    }
}
