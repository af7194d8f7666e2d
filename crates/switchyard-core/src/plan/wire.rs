//! Plan wire format decoding.
//!
//! `{"plan": [ {op, entity, text?, topk?, return?, ids_in?, sort?, limit?} ... ]}`
//!
//! The `op` key and its value are matched case-insensitively. Every other
//! field name is exact, except the `IdsIn`/`idsIn` spellings of `ids_in`.

use serde_json::{Map, Value};

use super::operation::{
    Operation, ReservedOp, SelectOp, SortDirection, SortKey, VectorSearchOp, DEFAULT_IDS_VARIABLE,
};
use super::Plan;
use crate::config::defaults::DEFAULT_HEURISTIC_TOPK;
use crate::errors::PlanError;

/// Decode a full plan document.
pub fn decode_document(doc: &Value) -> Result<Plan, PlanError> {
    let steps = doc
        .as_object()
        .and_then(|obj| obj.get("plan"))
        .and_then(Value::as_array)
        .ok_or(PlanError::NotAPlanDocument)?;

    let operations = steps
        .iter()
        .enumerate()
        .map(|(index, step)| decode_operation(index, step))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Plan::new(operations))
}

/// Decode one step of a plan.
pub fn decode_operation(index: usize, step: &Value) -> Result<Operation, PlanError> {
    let obj = step
        .as_object()
        .ok_or(PlanError::StepNotObject { index })?;

    let op = obj
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("op"))
        .and_then(|(_, v)| v.as_str())
        .ok_or(PlanError::MissingOp { index })?;

    match op.trim().to_ascii_lowercase().as_str() {
        "vector_search" => decode_vector_search(index, obj).map(Operation::VectorSearch),
        "select" => decode_select(index, obj).map(Operation::Select),
        "join" => Ok(Operation::Join(reserved(obj))),
        "aggregate" => Ok(Operation::Aggregate(reserved(obj))),
        other => Err(PlanError::UnknownOp {
            index,
            op: other.to_string(),
        }),
    }
}

fn decode_vector_search(index: usize, obj: &Map<String, Value>) -> Result<VectorSearchOp, PlanError> {
    let entity = required_str(index, obj, "entity")?;
    let text = optional_str(index, obj, "text")?.unwrap_or_default();
    let topk = optional_count(index, obj, "topk")?.unwrap_or(DEFAULT_HEURISTIC_TOPK);
    let output = optional_str(index, obj, "return")?
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_IDS_VARIABLE.to_string());

    Ok(VectorSearchOp {
        entity,
        text,
        topk,
        output,
    })
}

fn decode_select(index: usize, obj: &Map<String, Value>) -> Result<SelectOp, PlanError> {
    let entity = required_str(index, obj, "entity")?;

    let ids_in = ["ids_in", "IdsIn", "idsIn"]
        .iter()
        .find_map(|key| obj.get(*key))
        .and_then(Value::as_str)
        .map(str::to_string)
        .filter(|s| !s.trim().is_empty());

    let sort = match obj.get("sort") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter_map(decode_sort_key).collect(),
        Some(single @ Value::Object(_)) => decode_sort_key(single).into_iter().collect(),
        Some(_) => {
            return Err(PlanError::InvalidField {
                index,
                field: "sort".to_string(),
                reason: "must be an array of {field, dir}".to_string(),
            })
        }
    };

    // Non-positive limits mean "no limit requested".
    let limit = match obj.get("limit") {
        None | Some(Value::Null) => None,
        Some(v) => match v.as_i64() {
            Some(n) if n > 0 => Some(n as usize),
            Some(_) => None,
            None => {
                return Err(PlanError::InvalidField {
                    index,
                    field: "limit".to_string(),
                    reason: "must be an integer".to_string(),
                })
            }
        },
    };

    Ok(SelectOp {
        entity,
        ids_in,
        sort,
        limit,
    })
}

/// Entries without a usable field are skipped.
fn decode_sort_key(value: &Value) -> Option<SortKey> {
    let obj = value.as_object()?;
    let field = obj.get("field").and_then(Value::as_str)?.trim();
    if field.is_empty() {
        return None;
    }
    let dir = obj
        .get("dir")
        .or_else(|| obj.get("direction"))
        .and_then(Value::as_str)
        .map(SortDirection::parse)
        .unwrap_or_default();
    Some(SortKey::new(field, dir))
}

fn reserved(obj: &Map<String, Value>) -> ReservedOp {
    ReservedOp {
        fields: obj
            .iter()
            .filter(|(k, _)| !k.eq_ignore_ascii_case("op"))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    }
}

fn required_str(index: usize, obj: &Map<String, Value>, field: &str) -> Result<String, PlanError> {
    optional_str(index, obj, field)?
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| PlanError::InvalidField {
            index,
            field: field.to_string(),
            reason: "is required".to_string(),
        })
}

fn optional_str(
    index: usize,
    obj: &Map<String, Value>,
    field: &str,
) -> Result<Option<String>, PlanError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(PlanError::InvalidField {
            index,
            field: field.to_string(),
            reason: "must be a string".to_string(),
        }),
    }
}

fn optional_count(
    index: usize,
    obj: &Map<String, Value>,
    field: &str,
) -> Result<Option<usize>, PlanError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .map(|n| Some(n as usize))
            .ok_or_else(|| PlanError::InvalidField {
                index,
                field: field.to_string(),
                reason: "must be a non-negative integer".to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_two_step_document() {
        let doc = json!({"plan": [
            {"op": "vector_search", "entity": "product", "text": "dino onesie", "topk": 10, "return": "ids"},
            {"op": "select", "entity": "productcategory", "ids_in": "ids",
             "sort": [{"field": "price", "dir": "asc"}], "limit": 1}
        ]});
        let plan = decode_document(&doc).unwrap();
        assert_eq!(plan.len(), 2);
        match &plan.operations()[1] {
            Operation::Select(s) => {
                assert_eq!(s.ids_in.as_deref(), Some("ids"));
                assert_eq!(s.sort, vec![SortKey::asc("price")]);
                assert_eq!(s.limit, Some(1));
            }
            other => panic!("expected select, got {other:?}"),
        }
    }

    #[test]
    fn op_tag_is_case_insensitive() {
        let step = json!({"Op": "Vector_Search", "entity": "product", "text": "x"});
        let op = decode_operation(0, &step).unwrap();
        assert_eq!(op.tag(), "vector_search");
    }

    #[test]
    fn unknown_op_is_an_error() {
        let step = json!({"op": "delete", "entity": "products"});
        assert!(matches!(
            decode_operation(3, &step),
            Err(PlanError::UnknownOp { index: 3, .. })
        ));
    }

    #[test]
    fn vector_search_defaults_topk_and_output() {
        let step = json!({"op": "vector_search", "entity": "product", "text": "mug"});
        match decode_operation(0, &step).unwrap() {
            Operation::VectorSearch(v) => {
                assert_eq!(v.topk, 10);
                assert_eq!(v.output, "ids");
            }
            other => panic!("expected vector_search, got {other:?}"),
        }
    }

    #[test]
    fn ids_in_alias_and_non_positive_limit() {
        let step = json!({"op": "select", "entity": "supplier", "IdsIn": "found", "limit": 0});
        match decode_operation(0, &step).unwrap() {
            Operation::Select(s) => {
                assert_eq!(s.ids_in.as_deref(), Some("found"));
                assert_eq!(s.limit, None);
            }
            other => panic!("expected select, got {other:?}"),
        }
    }

    #[test]
    fn reserved_ops_keep_payload() {
        let step = json!({"op": "aggregate", "fn": "sum", "field": "price"});
        match decode_operation(0, &step).unwrap() {
            Operation::Aggregate(r) => {
                assert_eq!(r.fields.get("fn"), Some(&json!("sum")));
                assert!(!r.fields.contains_key("op"));
            }
            other => panic!("expected aggregate, got {other:?}"),
        }
    }

    #[test]
    fn missing_plan_array_is_not_a_document() {
        assert!(matches!(
            decode_document(&json!({"steps": []})),
            Err(PlanError::NotAPlanDocument)
        ));
    }
}
