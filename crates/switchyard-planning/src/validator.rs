//! PlanValidator is the allowlist gate in front of the executor.
//!
//! Produces a corrected copy of the plan (entity aliases kept, sort aliases
//! rewritten to canonical columns, limits clamped) or rejects it with every
//! violation found. A rejected plan is never executed.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use switchyard_core::config::defaults::DEFAULT_HEURISTIC_TOPK;
use switchyard_core::errors::{PlanError, SwitchyardResult, ValidationError, Violation};
use switchyard_core::plan::{
    wire, FilterClause, Operation, Plan, SelectOp, SortKey, SortSpec, TableQuery, VectorSearchOp,
};
use switchyard_core::AllowlistRegistry;

pub struct PlanValidator {
    registry: Arc<AllowlistRegistry>,
}

impl PlanValidator {
    pub fn new(registry: Arc<AllowlistRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &AllowlistRegistry {
        &self.registry
    }

    /// Check every step; return the corrected plan or all violations.
    pub fn validate(&self, plan: &Plan) -> Result<Plan, ValidationError> {
        let mut violations = Vec::new();
        let mut corrected = Vec::with_capacity(plan.len());

        for (index, op) in plan.operations().iter().enumerate() {
            match op {
                Operation::VectorSearch(v) => {
                    if let Some(op) = self.check_vector_search(index, v, &mut violations) {
                        corrected.push(op);
                    }
                }
                Operation::Select(s) => {
                    if let Some(op) = self.check_select(index, s, &mut violations) {
                        corrected.push(op);
                    }
                }
                Operation::Join(_) | Operation::Aggregate(_) => corrected.push(op.clone()),
            }
        }

        if violations.is_empty() {
            debug!(steps = corrected.len(), "plan accepted");
            Ok(Plan::new(corrected))
        } else {
            warn!(violations = violations.len(), "plan rejected");
            Err(ValidationError::new(violations))
        }
    }

    /// Decode a wire document and validate it. Unknown op tags are reported
    /// as violations rather than decode errors.
    pub fn validate_document(&self, doc: &Value) -> SwitchyardResult<Plan> {
        let plan = match wire::decode_document(doc) {
            Ok(plan) => plan,
            Err(PlanError::UnknownOp { index, op }) => {
                return Err(ValidationError::single(Violation::UnknownOperation { index, op }).into())
            }
            Err(e) => return Err(e.into()),
        };
        Ok(self.validate(&plan)?)
    }

    fn check_vector_search(
        &self,
        index: usize,
        v: &VectorSearchOp,
        violations: &mut Vec<Violation>,
    ) -> Option<Operation> {
        if self.registry.table_for_entity(&v.entity).is_none() {
            violations.push(Violation::TableNotAllowed {
                index,
                entity: v.entity.clone(),
            });
            return None;
        }
        let topk = match v.topk {
            0 => DEFAULT_HEURISTIC_TOPK,
            n => n,
        }
        .min(self.registry.max_limit());

        Some(Operation::VectorSearch(VectorSearchOp {
            topk,
            ..v.clone()
        }))
    }

    fn check_select(
        &self,
        index: usize,
        s: &SelectOp,
        violations: &mut Vec<Violation>,
    ) -> Option<Operation> {
        let Some(table) = self.registry.table_for_entity(&s.entity) else {
            violations.push(Violation::TableNotAllowed {
                index,
                entity: s.entity.clone(),
            });
            return None;
        };

        let mut sort = Vec::with_capacity(s.sort.len());
        let before = violations.len();
        for key in &s.sort {
            match self.registry.resolve_sort_field(table, &key.field) {
                Some(column) => sort.push(SortKey::new(column, key.dir)),
                None => violations.push(Violation::ColumnNotAllowed {
                    index,
                    table: table.to_string(),
                    column: key.field.clone(),
                }),
            }
        }
        if violations.len() > before {
            return None;
        }

        Some(Operation::Select(SelectOp {
            entity: s.entity.clone(),
            ids_in: s.ids_in.clone(),
            sort,
            limit: Some(self.registry.clamp_limit(s.limit)),
        }))
    }

    /// Check a single-table query: table, every column, every operator.
    /// Absent columns become the full permitted list; the limit is clamped.
    pub fn validate_table_query(&self, query: &TableQuery) -> Result<TableQuery, ValidationError> {
        let table = query.table.as_str();
        if !self.registry.is_table_allowed(table) {
            return Err(ValidationError::single(Violation::TableNotAllowed {
                index: 0,
                entity: query.table.clone(),
            }));
        }

        let mut violations = Vec::new();
        let column_violation = |column: &str| Violation::ColumnNotAllowed {
            index: 0,
            table: table.to_string(),
            column: column.to_string(),
        };

        let columns = match &query.columns {
            Some(cols) if !cols.is_empty() => {
                for c in cols.iter().filter(|c| !self.registry.is_column_allowed(table, c)) {
                    violations.push(column_violation(c));
                }
                cols.clone()
            }
            _ => self
                .registry
                .columns(table)
                .into_iter()
                .map(str::to_string)
                .collect(),
        };

        let mut filters = Vec::with_capacity(query.filters.len());
        for f in &query.filters {
            if !self.registry.is_column_allowed(table, &f.column) {
                violations.push(column_violation(&f.column));
            }
            if !self.registry.is_operator_allowed(&f.operator) {
                violations.push(Violation::OperatorNotAllowed {
                    index: 0,
                    operator: f.operator.clone(),
                });
            }
            filters.push(FilterClause {
                column: f.column.clone(),
                operator: f.operator.trim().to_ascii_uppercase(),
                value: f.value.clone(),
            });
        }

        let sort = match &query.sort {
            Some(requested) => match self.registry.resolve_sort_field(table, &requested.column) {
                Some(column) => Some(SortSpec {
                    column,
                    direction: requested.direction,
                }),
                None => {
                    violations.push(column_violation(&requested.column));
                    None
                }
            },
            None => None,
        };

        if !violations.is_empty() {
            return Err(ValidationError::new(violations));
        }

        Ok(TableQuery {
            table: query.table.clone(),
            columns: Some(columns),
            filters,
            sort,
            limit: Some(self.registry.clamp_limit(query.limit)),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use switchyard_core::plan::SortDirection;

    use super::*;

    fn validator() -> PlanValidator {
        PlanValidator::new(Arc::new(AllowlistRegistry::builtin()))
    }

    #[test]
    fn rejects_unknown_table() {
        let plan = Plan::new(vec![Operation::select("orders", Some("ids"), vec![], None)]);
        let err = validator().validate(&plan).unwrap_err();
        assert_eq!(
            err.violations,
            vec![Violation::TableNotAllowed {
                index: 0,
                entity: "orders".into()
            }]
        );
    }

    #[test]
    fn rewrites_sort_alias_and_clamps_limit() {
        let plan = Plan::new(vec![Operation::select(
            "supplier",
            Some("ids"),
            vec![SortKey::asc("name")],
            Some(10_000),
        )]);
        let ok = validator().validate(&plan).unwrap();
        match &ok.operations()[0] {
            Operation::Select(s) => {
                assert_eq!(s.sort, vec![SortKey::asc("suppliername")]);
                assert_eq!(s.limit, Some(1_000));
            }
            other => panic!("expected select, got {other:?}"),
        }
    }

    #[test]
    fn absent_limit_gets_default() {
        let plan = Plan::new(vec![Operation::select("productcategory", Some("ids"), vec![], None)]);
        let ok = validator().validate(&plan).unwrap();
        match &ok.operations()[0] {
            Operation::Select(s) => assert_eq!(s.limit, Some(50)),
            other => panic!("expected select, got {other:?}"),
        }
    }

    #[test]
    fn rejects_disallowed_sort_column() {
        let plan = Plan::new(vec![Operation::select(
            "productcategory",
            Some("ids"),
            vec![SortKey::desc("margin")],
            Some(1),
        )]);
        let err = validator().validate(&plan).unwrap_err();
        assert!(matches!(
            &err.violations[0],
            Violation::ColumnNotAllowed { column, .. } if column == "margin"
        ));
    }

    #[test]
    fn zero_topk_gets_default() {
        let plan = Plan::new(vec![Operation::vector_search("product", "mug", 0, "ids")]);
        let ok = validator().validate(&plan).unwrap();
        match &ok.operations()[0] {
            Operation::VectorSearch(v) => assert_eq!(v.topk, 10),
            other => panic!("expected vector_search, got {other:?}"),
        }
    }

    #[test]
    fn document_with_unknown_op_is_a_violation() {
        let doc = json!({"plan": [{"op": "delete", "entity": "products"}]});
        let err = validator().validate_document(&doc).unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn table_query_checks_columns_and_operators() {
        let v = validator();
        let q = TableQuery::all("suppliers")
            .filter("suppliername", "ilike", json!("%a%"))
            .sorted_by("name", SortDirection::Asc);
        let ok = v.validate_table_query(&q).unwrap();
        assert_eq!(ok.filters[0].operator, "ILIKE");
        assert_eq!(ok.sort.as_ref().map(|s| s.column.as_str()), Some("suppliername"));
        assert_eq!(ok.limit, Some(50));
        assert!(ok.columns.as_ref().is_some_and(|c| c.contains(&"supplierid".to_string())));

        let bad = TableQuery::all("suppliers")
            .filter("password", "=", json!("x"))
            .filter("suppliername", "!=", json!("x"));
        let err = v.validate_table_query(&bad).unwrap_err();
        assert_eq!(err.violations.len(), 2);

        assert!(v.validate_table_query(&TableQuery::all("users")).is_err());
    }
}
