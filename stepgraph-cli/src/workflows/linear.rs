//! `linear`: a → b, each appending to `message` and bumping `count`.

use stepgraph::{CompilationError, Field, Record, Schema, StateGraph, StepError, END};

pub const ENTRY: &str = "a";

pub fn graph() -> Result<StateGraph, CompilationError> {
    let schema = Schema::builder()
        .field(Field::string("message").with_default(""))
        .field(Field::integer("count").with_default(0))
        .build()?;

    let mut graph = StateGraph::with_schema(schema);
    graph
        .add_try_fn_step("a", |r: &Record| append(r, " Hello"))?
        .add_try_fn_step("b", |r: &Record| append(r, " from stepgraph!"))?
        .add_edge("a", "b")?
        .add_edge("b", END)?;
    Ok(graph)
}

fn append(r: &Record, suffix: &str) -> Result<Record, StepError> {
    let count = r
        .get_i64_or("count", 0)
        .checked_add(1)
        .ok_or_else(|| StepError::failed("count overflows"))?;
    Ok(Record::new()
        .with("message", format!("{}{}", r.get_str_or("message", ""), suffix))
        .with("count", count))
}

pub fn sample_input() -> Record {
    Record::new()
}
