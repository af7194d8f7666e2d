use serde_json::json;
use switchyard_core::plan::*;

#[test]
fn plan_serializes_to_wire_shape() {
    let plan = Plan::new(vec![
        Operation::vector_search("product", "dino onesie", 10, "ids"),
        Operation::select(
            "productcategory",
            Some("ids"),
            vec![SortKey::asc("price")],
            Some(1),
        ),
    ]);
    let v = serde_json::to_value(&plan).unwrap();
    assert_eq!(
        v,
        json!({"plan": [
            {"op": "vector_search", "entity": "product", "text": "dino onesie", "topk": 10, "return": "ids"},
            {"op": "select", "entity": "productcategory", "ids_in": "ids",
             "sort": [{"field": "price", "dir": "asc"}], "limit": 1}
        ]})
    );
}

#[test]
fn plan_deserializes_through_wire_decoder() {
    let raw = r#"{"plan":[{"OP":"SELECT","entity":"supplier","ids_in":"ids","sort":{"field":"name","direction":"DESC"}}]}"#;
    let plan: Plan = serde_json::from_str(raw).unwrap();
    match &plan.operations()[0] {
        Operation::Select(s) => {
            assert_eq!(s.entity, "supplier");
            assert_eq!(s.sort, vec![SortKey::desc("name")]);
            assert_eq!(s.limit, None);
        }
        other => panic!("expected select, got {other:?}"),
    }
}

#[test]
fn entity_and_field_case_is_preserved() {
    let doc = json!({"plan": [{"op": "select", "entity": "Products", "sort": [{"field": "PRICE"}]}]});
    let plan = wire::decode_document(&doc).unwrap();
    match &plan.operations()[0] {
        Operation::Select(s) => {
            assert_eq!(s.entity, "Products");
            assert_eq!(s.sort[0].field, "PRICE");
        }
        other => panic!("expected select, got {other:?}"),
    }
}

#[test]
fn reserved_ops_serialize_with_payload() {
    let doc = json!({"plan": [{"op": "join", "left": "a", "right": "b"}]});
    let plan = wire::decode_document(&doc).unwrap();
    let v = serde_json::to_value(&plan).unwrap();
    assert_eq!(v, json!({"plan": [{"op": "join", "left": "a", "right": "b"}]}));
}

#[test]
fn empty_plan_array_decodes_to_empty_plan() {
    let plan = wire::decode_document(&json!({"plan": []})).unwrap();
    assert!(plan.is_empty());
    assert_eq!(plan, Plan::empty());
}

#[test]
fn table_query_builder_and_serde() {
    let q = TableQuery::all("suppliers")
        .filter("suppliername", "ILIKE", json!("%acme%"))
        .sorted_by("suppliername", SortDirection::Asc)
        .limit(Some(5));
    let back: TableQuery = serde_json::from_value(serde_json::to_value(&q).unwrap()).unwrap();
    assert_eq!(back, q);
    assert_eq!(back.filters[0].operator, "ILIKE");
}

mod limit_clamp {
    use proptest::prelude::*;
    use switchyard_core::AllowlistRegistry;

    proptest! {
        #[test]
        fn clamped_limit_stays_in_range(requested in proptest::option::of(0usize..100_000)) {
            let reg = AllowlistRegistry::builtin();
            let limit = reg.clamp_limit(requested);
            prop_assert!(limit >= 1);
            prop_assert!(limit <= reg.max_limit());
            if let Some(n) = requested.filter(|n| (1..=reg.max_limit()).contains(n)) {
                prop_assert_eq!(limit, n);
            }
        }
    }
}
