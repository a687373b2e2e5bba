//! End-to-end workflows: counter loop, square/cube fan-out, pass/fail grading.

use stepgraph::{Field, Record, Schema, StateGraph, END};

use crate::common::counter_loop;

/// **Scenario**: increment loops on itself while counter < 5; {counter: 0} → {counter: 5}.
#[tokio::test]
async fn increment_until_five() {
    let out = counter_loop(5)
        .invoke("increment", Record::new().with("counter", 0), 10)
        .await
        .unwrap();
    assert_eq!(out, Record::new().with("counter", 5));
}

/// **Scenario**: square and cube both follow the entry step and write distinct fields.
#[tokio::test]
async fn square_and_cube() {
    let mut graph = StateGraph::new();
    graph
        .add_fn_step("input", |_: &Record| Record::new())
        .unwrap()
        .add_fn_step("square", |r: &Record| {
            let n = r.get_i64_or("number", 0);
            Record::new().with("squared", n * n)
        })
        .unwrap()
        .add_fn_step("cube", |r: &Record| {
            let n = r.get_i64_or("number", 0);
            Record::new().with("cubed", n * n * n)
        })
        .unwrap()
        .add_parallel_edges("input", ["square", "cube"])
        .unwrap()
        .add_edge("square", END)
        .unwrap()
        .add_edge("cube", END)
        .unwrap();
    let graph = graph.compile().unwrap();

    let out = graph
        .invoke("input", Record::new().with("number", 5), 10)
        .await
        .unwrap();
    assert_eq!(
        out,
        Record::new()
            .with("number", 5)
            .with("squared", 25)
            .with("cubed", 125)
    );
}

stepgraph::route_keys! {
    enum Grade {
        Pass => "pass",
        Fail => "fail",
    }
}

fn grading() -> stepgraph::CompiledStateGraph {
    let schema = Schema::builder()
        .field(Field::integer("score").required())
        .field(Field::string("result"))
        .build()
        .unwrap();
    let mut graph = StateGraph::with_schema(schema);
    graph
        .add_fn_step("grade", |_: &Record| Record::new())
        .unwrap()
        .add_fn_step("pass", |_: &Record| Record::new().with("result", "PASS"))
        .unwrap()
        .add_fn_step("fail", |_: &Record| Record::new().with("result", "FAIL"))
        .unwrap()
        .add_routed_edges(
            "grade",
            |r: &Record| {
                if r.get_i64_or("score", 0) >= 50 {
                    Grade::Pass
                } else {
                    Grade::Fail
                }
            },
            |g: Grade| match g {
                Grade::Pass => "pass",
                Grade::Fail => "fail",
            },
        )
        .unwrap()
        .add_edge("pass", END)
        .unwrap()
        .add_edge("fail", END)
        .unwrap();
    graph.compile().unwrap()
}

/// **Scenario**: score >= 50 → PASS, otherwise FAIL; other fields untouched.
#[tokio::test]
async fn pass_or_fail() {
    let graph = grading();
    let passed = graph
        .invoke("grade", Record::new().with("score", 78), 5)
        .await
        .unwrap();
    assert_eq!(passed, Record::new().with("score", 78).with("result", "PASS"));

    let failed = graph
        .invoke("grade", Record::new().with("score", 35), 5)
        .await
        .unwrap();
    assert_eq!(failed, Record::new().with("score", 35).with("result", "FAIL"));
}
