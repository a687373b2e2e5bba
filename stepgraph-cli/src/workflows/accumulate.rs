//! `accumulate`: msg1 → msg2 → msg3, appending to `messages` while `count` is overwritten.

use serde_json::json;
use stepgraph::{CompilationError, Combine, Field, Record, Schema, StateGraph, END};

pub const ENTRY: &str = "msg1";

const STEPS: [(&str, &str, i64); 3] = [
    ("msg1", "First message", 1),
    ("msg2", "Second message", 2),
    ("msg3", "Third message", 3),
];

pub fn graph() -> Result<StateGraph, CompilationError> {
    let schema = Schema::builder()
        .field(
            Field::list("messages")
                .accumulate(Combine::Append)
                .with_default(json!([])),
        )
        .field(Field::integer("count").with_default(0))
        .build()?;

    let mut graph = StateGraph::with_schema(schema);
    for (name, message, count) in STEPS {
        graph.add_fn_step(name, move |_: &Record| {
            Record::new()
                .with("messages", vec![message])
                .with("count", count)
        })?;
    }
    graph
        .add_edge("msg1", "msg2")?
        .add_edge("msg2", "msg3")?
        .add_edge("msg3", END)?;
    Ok(graph)
}

pub fn sample_input() -> Record {
    Record::new()
}
