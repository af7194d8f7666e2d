use std::fmt;

/// A single allowlist violation found while validating a plan or table query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    UnknownOperation { index: usize, op: String },
    TableNotAllowed { index: usize, entity: String },
    ColumnNotAllowed { index: usize, table: String, column: String },
    OperatorNotAllowed { index: usize, operator: String },
    MissingField { index: usize, field: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOperation { index, op } => {
                write!(f, "step {index}: unknown operation '{op}'")
            }
            Self::TableNotAllowed { index, entity } => {
                write!(f, "step {index}: table '{entity}' is not allowed")
            }
            Self::ColumnNotAllowed {
                index,
                table,
                column,
            } => write!(f, "step {index}: column '{column}' is not allowed on '{table}'"),
            Self::OperatorNotAllowed { index, operator } => {
                write!(f, "step {index}: operator '{operator}' is not allowed")
            }
            Self::MissingField { index, field } => {
                write!(f, "step {index}: missing required field '{field}'")
            }
        }
    }
}

/// Plan rejected by the allowlist gate. The plan is never executed.
#[derive(Debug, Clone, thiserror::Error)]
#[error("plan rejected: {}", render(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn single(violation: Violation) -> Self {
        Self {
            violations: vec![violation],
        }
    }
}

fn render(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
