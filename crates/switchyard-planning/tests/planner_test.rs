//! Planner model path and its fallbacks.

use std::sync::Arc;
use std::time::Duration;

use switchyard_core::config::PlannerConfig;
use switchyard_core::plan::Operation;
use switchyard_core::traits::{Cancellable, CancellationToken};
use switchyard_core::AllowlistRegistry;
use switchyard_planning::{heuristic_plan, FallbackReason, PlanSource, Planner};
use test_fixtures::{Scripted, ScriptedCompletion};

const MODEL_PLAN: &str = r#"{"plan":[
  {"op":"vector_search","entity":"product","text":"dino onesie","topk":4,"return":"ids"},
  {"op":"select","entity":"productcategory","ids_in":"ids","sort":[{"field":"price","dir":"asc"}],"limit":2}
]}"#;

fn planner(completion: Arc<ScriptedCompletion>, config: PlannerConfig) -> Planner {
    Planner::new(completion, Arc::new(AllowlistRegistry::builtin()), config)
}

fn fast_config() -> PlannerConfig {
    PlannerConfig {
        timeout_ms: 50,
        ..PlannerConfig::default()
    }
}

#[tokio::test]
async fn model_plan_is_used_when_valid() {
    let completion = Arc::new(ScriptedCompletion::replying(&[MODEL_PLAN]));
    let out = planner(completion.clone(), fast_config())
        .plan_detailed("two cheapest dino onesies", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(out.source, PlanSource::Model);
    assert!(out.degradation().is_none());
    match &out.plan.operations()[0] {
        Operation::VectorSearch(v) => assert_eq!(v.topk, 4),
        other => panic!("expected vector_search, got {other:?}"),
    }

    let requests = completion.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].json_mode);
    assert!(requests[0].user.starts_with("REGISTRY:"));
    assert!(requests[0].user.ends_with("two cheapest dino onesies"));
}

#[tokio::test]
async fn malformed_reply_falls_back_to_heuristic() {
    let text = "cheapest dino onesie";
    let completion = Arc::new(ScriptedCompletion::replying(&["here is your plan!"]));
    let config = fast_config();
    let out = planner(completion, config.clone())
        .plan_detailed(text, &CancellationToken::new())
        .await
        .unwrap();

    assert!(matches!(out.source, PlanSource::Heuristic(FallbackReason::Malformed(_))));
    assert_eq!(out.plan, heuristic_plan(text, &config));
    assert_eq!(out.degradation().map(|d| d.component), Some("planner".to_string()));
}

#[tokio::test]
async fn empty_model_plan_falls_back() {
    let completion = Arc::new(ScriptedCompletion::replying(&[r#"{"plan": []}"#]));
    let out = planner(completion, fast_config())
        .plan_detailed("cheapest dino onesie", &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(out.source, PlanSource::Heuristic(FallbackReason::EmptyPlan));
    assert_eq!(out.plan.len(), 2);
}

#[tokio::test]
async fn slow_model_falls_back_on_timeout() {
    let completion = Arc::new(ScriptedCompletion::new(vec![Scripted::Delayed(
        Duration::from_millis(500),
        MODEL_PLAN.into(),
    )]));
    let out = planner(completion, fast_config())
        .plan_detailed("cheapest dino onesie", &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(out.source, PlanSource::Heuristic(FallbackReason::Timeout(50)));
}

#[tokio::test]
async fn disabled_model_is_never_called() {
    let completion = Arc::new(ScriptedCompletion::replying(&[MODEL_PLAN]));
    let config = PlannerConfig {
        use_model: false,
        ..PlannerConfig::default()
    };
    let out = planner(completion.clone(), config)
        .plan_detailed("top 3 suppliers for waterproof jacket", &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(out.source, PlanSource::Heuristic(FallbackReason::Disabled));
    assert!(out.degradation().is_none());
    assert_eq!(completion.calls(), 0);
}

#[tokio::test]
async fn unavailable_service_falls_back() {
    let completion = Arc::new(ScriptedCompletion::unavailable());
    let out = planner(completion.clone(), fast_config())
        .plan_detailed("cheapest dino onesie", &CancellationToken::new())
        .await
        .unwrap();
    assert!(matches!(out.source, PlanSource::Heuristic(FallbackReason::Unavailable(_))));
    assert_eq!(completion.calls(), 0);
}

#[tokio::test]
async fn empty_input_yields_empty_plan() {
    let completion = Arc::new(ScriptedCompletion::replying(&[MODEL_PLAN]));
    let out = planner(completion.clone(), fast_config())
        .plan_detailed("   ", &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(out.source, PlanSource::EmptyInput);
    assert!(out.plan.is_empty());
    assert_eq!(completion.calls(), 0);
}

#[tokio::test]
async fn cancellation_propagates() {
    let completion = Arc::new(ScriptedCompletion::replying(&[MODEL_PLAN]));
    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = planner(completion, fast_config())
        .plan("cheapest dino onesie", &cancel)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "cancelled");
}
