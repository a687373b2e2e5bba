//! Fan-out: concurrent branches over one snapshot and a single merge point.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use stepgraph::{
    Combine, Field, Record, RunError, Schema, StateGraph, Step, StepError, END,
};

/// Branch that sleeps before writing, so completion order differs from declaration order.
struct Delayed {
    millis: u64,
    tag: &'static str,
}

#[async_trait]
impl Step for Delayed {
    async fn run(&self, _record: &Record) -> Result<Record, StepError> {
        tokio::time::sleep(Duration::from_millis(self.millis)).await;
        Ok(Record::new().with("tags", vec![self.tag]))
    }
}

fn tagged_graph() -> stepgraph::CompiledStateGraph {
    let schema = Schema::builder()
        .field(Field::list("tags").accumulate(Combine::Append).with_default(json!([])))
        .build()
        .unwrap();
    let mut graph = StateGraph::with_schema(schema);
    graph
        .add_fn_step("start", |_: &Record| Record::new())
        .unwrap()
        .add_step("slow", std::sync::Arc::new(Delayed { millis: 30, tag: "slow" }))
        .unwrap()
        .add_step("fast", std::sync::Arc::new(Delayed { millis: 1, tag: "fast" }))
        .unwrap()
        .add_parallel_edges("start", ["slow", "fast"])
        .unwrap()
        .add_edge("slow", END)
        .unwrap()
        .add_edge("fast", END)
        .unwrap();
    graph.compile().unwrap()
}

/// **Scenario**: Updates merge in declaration order, not completion order.
#[tokio::test]
async fn merge_order_is_declaration_order() {
    let report = tagged_graph()
        .invoke_traced("start", Record::new(), 5)
        .await
        .unwrap();
    assert_eq!(report.record.get("tags"), Some(&json!(["slow", "fast"])));
    assert_eq!(report.path, vec!["start", "slow", "fast"]);
    assert_eq!(report.steps, 3);
}

/// **Scenario**: Each branch counts as one step; the bound names the first branch over it.
#[tokio::test]
async fn branches_count_toward_bound() {
    let err = tagged_graph()
        .invoke("start", Record::new(), 2)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RunError::IterationLimitExceeded {
            limit: 2,
            step: "fast".into()
        }
    );
}

/// **Scenario**: Branches see the record as it was before the fan-out, then the join runs.
#[tokio::test]
async fn branches_share_snapshot_and_join_sees_all() {
    let mut graph = StateGraph::new();
    graph
        .add_fn_step("input", |_: &Record| Record::new())
        .unwrap()
        .add_fn_step("square", |r: &Record| {
            let n = r.get_i64_or("number", 0);
            Record::new().with("squared", n * n).with("saw_cube", r.contains("cubed"))
        })
        .unwrap()
        .add_fn_step("cube", |r: &Record| {
            let n = r.get_i64_or("number", 0);
            Record::new().with("cubed", n * n * n)
        })
        .unwrap()
        .add_fn_step("summary", |r: &Record| {
            Record::new().with(
                "summary",
                format!(
                    "squared={}, cubed={}",
                    r.get_i64_or("squared", 0),
                    r.get_i64_or("cubed", 0)
                ),
            )
        })
        .unwrap()
        .add_parallel_edges("input", ["square", "cube"])
        .unwrap()
        .add_edge("square", "summary")
        .unwrap()
        .add_edge("cube", "summary")
        .unwrap()
        .add_edge("summary", END)
        .unwrap();
    let graph = graph.compile().unwrap();

    let out = graph
        .invoke("input", Record::new().with("number", 3), 10)
        .await
        .unwrap();
    assert!(!out.get_bool_or("saw_cube", true));
    assert_eq!(out.get_str_or("summary", ""), "squared=9, cubed=27");
}

/// **Scenario**: Two branches overwriting one field with different values is an error;
/// equal values are accepted.
#[tokio::test]
async fn conflicting_overwrite_is_rejected() {
    let build = |left: &'static str, right: &'static str| {
        let mut graph = StateGraph::new();
        graph
            .add_fn_step("src", |_: &Record| Record::new())
            .unwrap()
            .add_fn_step("left", move |_: &Record| Record::new().with("status", left))
            .unwrap()
            .add_fn_step("right", move |_: &Record| Record::new().with("status", right))
            .unwrap()
            .add_parallel_edges("src", ["left", "right"])
            .unwrap()
            .add_edge("left", END)
            .unwrap()
            .add_edge("right", END)
            .unwrap();
        graph.compile().unwrap()
    };

    let err = build("a", "b")
        .invoke("src", Record::new(), 5)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RunError::ConflictingWrite {
            field: "status".into(),
            steps: vec!["left".into(), "right".into()],
        }
    );

    let out = build("same", "same")
        .invoke("src", Record::new(), 5)
        .await
        .unwrap();
    assert_eq!(out.get_str_or("status", ""), "same");
}

/// **Scenario**: Union accumulation gives the same set whatever the branch order.
#[tokio::test]
async fn union_is_order_independent() {
    let schema = Schema::builder()
        .field(Field::list("seen").accumulate(Combine::Union).with_default(json!([])))
        .build()
        .unwrap();
    let mut graph = StateGraph::with_schema(schema);
    graph
        .add_fn_step("src", |_: &Record| Record::new())
        .unwrap()
        .add_fn_step("a", |_: &Record| Record::new().with("seen", vec!["x", "y"]))
        .unwrap()
        .add_fn_step("b", |_: &Record| Record::new().with("seen", vec!["y", "z"]))
        .unwrap()
        .add_parallel_edges("src", ["a", "b"])
        .unwrap()
        .add_edge("a", END)
        .unwrap()
        .add_edge("b", END)
        .unwrap();
    let graph = graph.compile().unwrap();

    let out = graph.invoke("src", Record::new(), 5).await.unwrap();
    let seen: HashSet<String> = out
        .get("seen")
        .and_then(|v| v.as_array())
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str().map(String::from))
        .collect();
    assert_eq!(
        seen,
        HashSet::from(["x".to_string(), "y".to_string(), "z".to_string()])
    );
}
