//! Cycles, closed route keys and the iteration bound.

use serde_json::json;
use stepgraph::{Combine, Field, Record, RunError, Schema, StateGraph, END};

use crate::common::{counter_loop, endless_loop};

stepgraph::route_keys! {
    enum LoopRoute {
        Continue => "continue",
        Done => "done",
    }
}

/// **Scenario**: Self-loop runs until the selector says "end" and the result is exact.
#[tokio::test]
async fn counter_loop_reaches_five() {
    let report = counter_loop(5)
        .invoke_traced("increment", Record::new().with("counter", 0), 10)
        .await
        .unwrap();
    assert_eq!(report.record, Record::new().with("counter", 5));
    assert_eq!(report.steps, 5);
}

/// **Scenario**: With max_steps = N an endless loop fails on exactly the (N+1)-th attempt.
#[tokio::test]
async fn endless_loop_fails_on_attempt_n_plus_one() {
    for limit in [1usize, 3, 7] {
        let err = endless_loop()
            .invoke("spin", Record::new().with("counter", 0), limit)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RunError::IterationLimitExceeded {
                limit,
                step: "spin".into()
            }
        );
    }
}

/// **Scenario**: A run that needs exactly max_steps steps succeeds; one fewer fails.
#[tokio::test]
async fn bound_is_not_hit_early() {
    let graph = counter_loop(5);
    assert!(graph
        .invoke("increment", Record::new().with("counter", 0), 5)
        .await
        .is_ok());
    assert!(matches!(
        graph
            .invoke("increment", Record::new().with("counter", 0), 4)
            .await,
        Err(RunError::IterationLimitExceeded { limit: 4, .. })
    ));
}

/// **Scenario**: max_steps = 0 executes nothing.
#[tokio::test]
async fn zero_bound_runs_nothing() {
    let err = counter_loop(5)
        .invoke("increment", Record::new(), 0)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RunError::IterationLimitExceeded {
            limit: 0,
            step: "increment".into()
        }
    );
}

/// **Scenario**: An unmapped key stops the run before any further step executes.
#[tokio::test]
async fn unmapped_key_stops_execution() {
    let mut graph = StateGraph::new();
    graph
        .add_fn_step("check", |_: &Record| Record::new().with("checked", true))
        .unwrap()
        .add_fn_step("next", |_: &Record| Record::new().with("next_ran", true))
        .unwrap()
        .add_conditional_edges("check", |_: &Record| "maybe", [("yes", "next"), ("no", END)])
        .unwrap()
        .add_edge("next", END)
        .unwrap();
    let graph = graph.compile().unwrap();

    let err = graph.invoke("check", Record::new(), 5).await.unwrap_err();
    assert_eq!(
        err,
        RunError::UnmappedRoute {
            step: "check".into(),
            key: "maybe".into()
        }
    );
}

/// **Scenario**: Routing depends only on the merged record, so equal records route equally.
#[tokio::test]
async fn routing_is_deterministic() {
    let graph = counter_loop(3);
    for _ in 0..3 {
        let report = graph
            .invoke_traced("increment", Record::new().with("counter", 1), 10)
            .await
            .unwrap();
        assert_eq!(report.path, vec!["increment", "increment"]);
    }
}

/// **Scenario**: A loop with closed route keys accumulates results until max_iterations.
#[tokio::test]
async fn routed_loop_accumulates_results() {
    let schema = Schema::builder()
        .field(Field::integer("counter").with_default(0))
        .field(Field::integer("max_iterations").with_default(5))
        .field(Field::list("results").accumulate(Combine::Append).with_default(json!([])))
        .build()
        .unwrap();
    let mut graph = StateGraph::with_schema(schema);
    graph
        .add_fn_step("increment", |r: &Record| {
            let counter = r.get_i64_or("counter", 0) + 1;
            Record::new()
                .with("counter", counter)
                .with("results", vec![format!("Iteration {}", counter)])
        })
        .unwrap()
        .add_routed_edges(
            "increment",
            |r: &Record| {
                if r.get_i64_or("counter", 0) < r.get_i64_or("max_iterations", 0) {
                    LoopRoute::Continue
                } else {
                    LoopRoute::Done
                }
            },
            |route: LoopRoute| match route {
                LoopRoute::Continue => "increment",
                LoopRoute::Done => END,
            },
        )
        .unwrap();
    let graph = graph.compile().unwrap();

    let out = graph
        .invoke("increment", Record::new().with("max_iterations", 3), 10)
        .await
        .unwrap();
    assert_eq!(out.get_i64_or("counter", 0), 3);
    assert_eq!(
        out.get("results"),
        Some(&json!(["Iteration 1", "Iteration 2", "Iteration 3"]))
    );
}
