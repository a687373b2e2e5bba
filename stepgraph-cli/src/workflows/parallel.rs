//! `parallel`: input fans out to square, cube and double; summary joins them.

use stepgraph::{CompilationError, Field, Record, Schema, StateGraph, StepError, END};

pub const ENTRY: &str = "input";

pub fn graph() -> Result<StateGraph, CompilationError> {
    let schema = Schema::builder()
        .field(Field::integer("input_value").required())
        .field(Field::integer("squared"))
        .field(Field::integer("cubed"))
        .field(Field::integer("doubled"))
        .field(Field::string("summary"))
        .build()?;

    let mut graph = StateGraph::with_schema(schema);
    graph
        .add_fn_step("input", |_: &Record| Record::new())?
        .add_try_fn_step("square", |r: &Record| {
            let n = r.get_i64_or("input_value", 0);
            let squared = n
                .checked_mul(n)
                .ok_or_else(|| StepError::failed(format!("square of {} overflows", n)))?;
            Ok(Record::new().with("squared", squared))
        })?
        .add_try_fn_step("cube", |r: &Record| {
            let n = r.get_i64_or("input_value", 0);
            let cubed = n
                .checked_mul(n)
                .and_then(|sq| sq.checked_mul(n))
                .ok_or_else(|| StepError::failed(format!("cube of {} overflows", n)))?;
            Ok(Record::new().with("cubed", cubed))
        })?
        .add_try_fn_step("double", |r: &Record| {
            let n = r.get_i64_or("input_value", 0);
            let doubled = n
                .checked_mul(2)
                .ok_or_else(|| StepError::failed(format!("double of {} overflows", n)))?;
            Ok(Record::new().with("doubled", doubled))
        })?
        .add_fn_step("summary", summary)?
        .add_parallel_edges("input", ["square", "cube", "double"])?
        .add_edge("square", "summary")?
        .add_edge("cube", "summary")?
        .add_edge("double", "summary")?
        .add_edge("summary", END)?;
    Ok(graph)
}

fn summary(r: &Record) -> Record {
    Record::new().with(
        "summary",
        format!(
            "Input: {}, Square: {}, Cube: {}, Double: {}",
            r.get_i64_or("input_value", 0),
            r.get_i64_or("squared", 0),
            r.get_i64_or("cubed", 0),
            r.get_i64_or("doubled", 0)
        ),
    )
}

pub fn sample_input() -> Record {
    Record::new().with("input_value", 5)
}
