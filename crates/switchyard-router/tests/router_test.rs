//! End-to-end routing over the seeded catalog with scripted services.

use std::sync::Arc;

use serde_json::{json, Value};

use switchyard_core::constants::CHITCHAT_FALLBACK_REPLY;
use switchyard_core::traits::{Cancellable, CancellationToken, IEmbeddingProvider};
use switchyard_core::{RouteDecision, SwitchyardConfig};
use switchyard_router::{Collaborators, Router};
use test_fixtures::{seeded_storage, FailingEmbedder, Scripted, ScriptedCompletion, HashEmbedder};

async fn router_with(
    completion: Arc<ScriptedCompletion>,
    embedder: Arc<dyn IEmbeddingProvider>,
    config: SwitchyardConfig,
) -> Router {
    let storage = Arc::new(seeded_storage().await);
    let collab = Collaborators {
        completion,
        embedder,
        relational: storage.clone(),
        vectors: storage,
    };
    Router::new(collab, &config).unwrap()
}

async fn router(completion: Arc<ScriptedCompletion>) -> Router {
    router_with(completion, Arc::new(HashEmbedder::new()), SwitchyardConfig::default()).await
}

fn rows(data: Option<&Value>) -> &Vec<Value> {
    data.and_then(Value::as_array).expect("data array")
}

#[tokio::test]
async fn sql_prefix_routes_and_strips() {
    let completion = Arc::new(ScriptedCompletion::replying(&[]));
    let r = router(completion.clone()).await;

    let env = r.handle("sql: all products", &CancellationToken::new()).await;
    assert_eq!(env.route(), RouteDecision::Sql);
    assert_eq!(env.query(), Some("all products"));
    assert!(env.error().is_none());
    assert_eq!(rows(env.data()).len(), 10);
    assert_eq!(completion.calls(), 0);
}

#[tokio::test]
async fn sql_search_forms_and_limit() {
    let r = router(Arc::new(ScriptedCompletion::replying(&[]))).await;
    let cancel = CancellationToken::new();

    let env = r.handle("SQL: suppliers: coastal", &cancel).await;
    let found = rows(env.data());
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["suppliername"], "Coastal Gear");

    let env = r.handle("sql: all suppliers limit 2", &cancel).await;
    assert_eq!(env.route(), RouteDecision::Sql);
    assert_eq!(rows(env.data()).len(), 2);
}

#[tokio::test]
async fn greeting_skips_classifier() {
    let completion = Arc::new(ScriptedCompletion::replying(&["Hi! Ask me about the catalog."]));
    let r = router(completion.clone()).await;

    let env = r.handle("hello there", &CancellationToken::new()).await;
    assert_eq!(env.route(), RouteDecision::ChitChat);
    assert_eq!(env.data().unwrap()["reply"], "Hi! Ask me about the catalog.");
    assert_eq!(completion.calls(), 1);
    assert!(!completion.requests()[0].json_mode);
}

#[tokio::test]
async fn failed_chat_uses_fallback_reply() {
    let completion = Arc::new(ScriptedCompletion::new(vec![Scripted::Fail("502".into())]));
    let r = router(completion).await;

    let env = r.handle("hey", &CancellationToken::new()).await;
    assert!(env.is_success());
    assert_eq!(env.data().unwrap()["reply"], CHITCHAT_FALLBACK_REPLY);
    let components: Vec<&str> = env
        .meta()
        .degradations
        .iter()
        .map(|d| d.component.as_str())
        .collect();
    assert_eq!(components, vec!["chitchat"]);
}

#[tokio::test]
async fn unclassifiable_request_without_model_degrades_twice() {
    let r = router(Arc::new(ScriptedCompletion::unavailable())).await;
    let env = r.handle("what's new this week", &CancellationToken::new()).await;

    assert_eq!(env.route(), RouteDecision::ChitChat);
    assert_eq!(env.data().unwrap()["reply"], CHITCHAT_FALLBACK_REPLY);
    let components: Vec<&str> = env
        .meta()
        .degradations
        .iter()
        .map(|d| d.component.as_str())
        .collect();
    assert_eq!(components, vec!["classifier", "chitchat"]);
}

#[tokio::test]
async fn model_classification_dispatches() {
    let completion = Arc::new(ScriptedCompletion::replying(&["semantic"]));
    let r = router(completion).await;

    let env = r.handle("dino onesie topk:2", &CancellationToken::new()).await;
    assert_eq!(env.route(), RouteDecision::Vector);
    let ids: Vec<i64> = rows(env.data())
        .iter()
        .map(|h| h["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![5, 9]);
}

#[tokio::test]
async fn vector_results_carry_records_in_ann_order() {
    let r = router(Arc::new(ScriptedCompletion::replying(&[]))).await;
    let env = r
        .handle("vector: waterproof jacket topk:3", &CancellationToken::new())
        .await;

    assert_eq!(env.query(), Some("waterproof jacket topk:3"));
    let hits = rows(env.data());
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0]["id"], 1);
    assert_eq!(hits[0]["record"]["productname"], "Rain Jacket");
    let distances: Vec<f64> = hits.iter().map(|h| h["distance"].as_f64().unwrap()).collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn vector_supplier_collection() {
    let r = router(Arc::new(ScriptedCompletion::replying(&[]))).await;
    let env = r
        .handle("similar: suppliers: pier road topk:1", &CancellationToken::new())
        .await;
    let hits = rows(env.data());
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["record"]["suppliername"], "Coastal Gear");
}

#[tokio::test]
async fn hybrid_with_heuristic_planner() {
    let mut config = SwitchyardConfig::default();
    config.planner.use_model = false;
    let r = router_with(
        Arc::new(ScriptedCompletion::replying(&[])),
        Arc::new(HashEmbedder::new()),
        config,
    )
    .await;

    let env = r.handle("hybrid: cheapest dino onesie", &CancellationToken::new()).await;
    assert_eq!(env.route(), RouteDecision::Hybrid);
    assert_eq!(env.query(), Some("cheapest dino onesie"));
    let out = rows(env.data());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0]["productId"], 9);
    assert_eq!(out[0]["price"], 8.0);
    assert!(env.meta().degradations.is_empty());
}

#[tokio::test]
async fn hybrid_records_planner_fallback() {
    let completion = Arc::new(ScriptedCompletion::replying(&["not json"]));
    let r = router(completion).await;

    let env = r
        .handle("hybrid: top 3 suppliers for waterproof jacket", &CancellationToken::new())
        .await;
    assert!(env.is_success());
    let names: Vec<&str> = rows(env.data())
        .iter()
        .map(|s| s["supplierName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Acme Outfitters", "brightside Kids", "Coastal Gear"]);
    assert_eq!(env.meta().degradations[0].component, "planner");
}

#[tokio::test]
async fn embedding_failure_is_a_request_error() {
    let mut config = SwitchyardConfig::default();
    config.planner.use_model = false;
    let r = router_with(
        Arc::new(ScriptedCompletion::replying(&[])),
        Arc::new(FailingEmbedder),
        config,
    )
    .await;
    let cancel = CancellationToken::new();

    let env = r.handle("vector: dino onesie", &cancel).await;
    assert_eq!(env.route(), RouteDecision::Vector);
    assert!(env.data().is_none());
    assert_eq!(env.error().unwrap().kind, "embedding");

    let env = r.handle("hybrid: cheapest dino onesie", &cancel).await;
    assert_eq!(env.route(), RouteDecision::Hybrid);
    assert_eq!(env.error().unwrap().kind, "embedding");

    let json = serde_json::to_value(&env).unwrap();
    assert!(json["data"].is_null());
    assert!(json["meta"]["elapsed_ms"].is_u64());
}

#[tokio::test]
async fn cancelled_request_reports_cancellation() {
    let r = router(Arc::new(ScriptedCompletion::replying(&[]))).await;
    let cancel = CancellationToken::new();
    cancel.cancel();

    let env = r.handle("sql: all products", &cancel).await;
    assert_eq!(env.error().unwrap().kind, "cancelled");
}

#[tokio::test]
async fn submitted_plan_document_runs() {
    let r = router(Arc::new(ScriptedCompletion::replying(&[]))).await;
    let doc = json!({"plan": [
        {"OP": "Vector_Search", "entity": "product", "text": "dino onesie", "topk": 2, "return": "hits"},
        {"op": "select", "entity": "productcategory", "IdsIn": "hits", "sort": {"field": "price", "direction": "desc"}}
    ]});

    let out = r
        .hybrid()
        .execute_document(&doc, &CancellationToken::new())
        .await
        .unwrap();
    let result = out["result"].as_array().unwrap();
    let ids: Vec<i64> = result.iter().map(|p| p["productId"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![5, 9]);
    assert_eq!(out["plan"]["plan"][1]["limit"], 50);
}

#[tokio::test]
async fn submitted_input_document_is_planned() {
    let mut config = SwitchyardConfig::default();
    config.planner.use_model = false;
    config.planner.heuristic_topk = 2;
    let r = router_with(
        Arc::new(ScriptedCompletion::replying(&[])),
        Arc::new(HashEmbedder::new()),
        config,
    )
    .await;

    let out = r
        .hybrid()
        .execute_document(&json!({"input": "most expensive \"rain jacket\""}), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(out["result"][0]["productId"], 1);
    assert_eq!(out["result"][0]["price"], 64.0);
}

#[tokio::test]
async fn disallowed_plan_document_is_rejected() {
    let r = router(Arc::new(ScriptedCompletion::replying(&[]))).await;
    let cancel = CancellationToken::new();

    let err = r
        .hybrid()
        .execute_document(&json!({"plan": [{"op": "select", "entity": "orders"}]}), &cancel)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "validation");

    let err = r
        .hybrid()
        .execute_document(&json!({"plan": [{"op": "drop_table", "entity": "products"}]}), &cancel)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "validation");

    let err = r
        .hybrid()
        .execute_document(&json!({"steps": []}), &cancel)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "plan");
}

#[tokio::test]
async fn envelope_carries_the_request_id_it_was_handled_under() {
    let r = router(Arc::new(ScriptedCompletion::replying(&[]))).await;
    let id = uuid::Uuid::new_v4();

    let env = r
        .handle_with_id("sql: all suppliers", id, &CancellationToken::new())
        .await;
    assert_eq!(env.meta().request_id, id);

    let env = r
        .handle_with_id("sql: orders: anything", id, &CancellationToken::new())
        .await;
    assert_eq!(env.meta().request_id, id);
}
