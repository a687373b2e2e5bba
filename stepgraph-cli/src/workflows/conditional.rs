//! `conditional`: categorize a number and route to one handler per category.

use stepgraph::{CompilationError, Field, Record, Schema, StateGraph, END};

pub const ENTRY: &str = "categorize";

pub fn graph() -> Result<StateGraph, CompilationError> {
    let schema = Schema::builder()
        .field(Field::integer("number").required())
        .field(Field::string("category"))
        .field(Field::string("result"))
        .build()?;

    let mut graph = StateGraph::with_schema(schema);
    graph
        .add_fn_step("categorize", |r: &Record| {
            let category = match r.get_i64_or("number", 0) {
                n if n < 0 => "negative",
                0 => "zero",
                _ => "positive",
            };
            Record::new().with("category", category)
        })?
        .add_fn_step("negative", |r: &Record| {
            Record::new().with("result", format!("{} is negative", r.get_i64_or("number", 0)))
        })?
        .add_fn_step("zero", |_: &Record| Record::new().with("result", "Number is zero"))?
        .add_fn_step("positive", |r: &Record| {
            Record::new().with("result", format!("{} is positive", r.get_i64_or("number", 0)))
        })?
        .add_conditional_edges(
            "categorize",
            |r: &Record| r.get_str_or("category", "").to_string(),
            [
                ("negative", "negative"),
                ("zero", "zero"),
                ("positive", "positive"),
            ],
        )?
        .add_edge("negative", END)?
        .add_edge("zero", END)?
        .add_edge("positive", END)?;
    Ok(graph)
}

pub fn sample_input() -> Record {
    Record::new().with("number", 42)
}
