//! Shared steps and graph builders for state graph integration tests.

#![allow(dead_code)]

use stepgraph::{CompiledStateGraph, Record, StateGraph, END};

/// Step that adds 1 to `counter`.
pub fn increment(r: &Record) -> Record {
    Record::new().with("counter", r.get_i64_or("counter", 0) + 1)
}

/// `counter < limit` → "continue", else "end".
pub fn below(limit: i64) -> impl Fn(&Record) -> &'static str + Send + Sync + 'static {
    move |r: &Record| {
        if r.get_i64_or("counter", 0) < limit {
            "continue"
        } else {
            "end"
        }
    }
}

/// `increment` looping on itself until `counter` reaches `limit`.
pub fn counter_loop(limit: i64) -> CompiledStateGraph {
    let mut graph = StateGraph::new();
    graph
        .add_fn_step("increment", increment)
        .unwrap()
        .add_conditional_edges(
            "increment",
            below(limit),
            [("continue", "increment"), ("end", END)],
        )
        .unwrap();
    graph.compile().expect("counter loop compiles")
}

/// A self-loop whose selector always answers "continue".
pub fn endless_loop() -> CompiledStateGraph {
    let mut graph = StateGraph::new();
    graph
        .add_fn_step("spin", increment)
        .unwrap()
        .add_conditional_edges(
            "spin",
            |_: &Record| "continue",
            [("continue", "spin"), ("end", END)],
        )
        .unwrap();
    graph.compile().expect("endless loop compiles")
}
