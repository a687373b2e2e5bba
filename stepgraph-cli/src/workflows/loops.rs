//! `loop`: increment until `counter` reaches `max_iterations`, collecting each value.

use serde_json::json;
use stepgraph::{CompilationError, Combine, Field, Record, Schema, StateGraph, StepError, END};

pub const ENTRY: &str = "increment";

stepgraph::route_keys! {
    /// Whether the loop runs again.
    pub enum LoopRoute {
        Continue => "continue",
        End => "end",
    }
}

pub fn graph() -> Result<StateGraph, CompilationError> {
    let schema = Schema::builder()
        .field(Field::integer("counter").with_default(0))
        .field(Field::integer("max_iterations").with_default(5))
        .field(
            Field::list("results")
                .accumulate(Combine::Append)
                .with_default(json!([])),
        )
        .build()?;

    let mut graph = StateGraph::with_schema(schema);
    graph
        .add_try_fn_step("increment", |r: &Record| {
            let counter = r
                .get_i64_or("counter", 0)
                .checked_add(1)
                .ok_or_else(|| StepError::failed("counter overflows"))?;
            tracing::debug!(counter, "increment");
            Ok(Record::new()
                .with("counter", counter)
                .with("results", vec![counter]))
        })?
        .add_routed_edges("increment", should_continue, |route: LoopRoute| match route {
            LoopRoute::Continue => "increment",
            LoopRoute::End => END,
        })?;
    Ok(graph)
}

fn should_continue(r: &Record) -> LoopRoute {
    if r.get_i64_or("counter", 0) < r.get_i64_or("max_iterations", 0) {
        LoopRoute::Continue
    } else {
        LoopRoute::End
    }
}

pub fn sample_input() -> Record {
    Record::new().with("max_iterations", 5)
}
