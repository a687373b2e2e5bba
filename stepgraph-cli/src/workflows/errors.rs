//! `errors`: a risky division whose outcome is recorded in `status` and routed to a
//! success or error handler instead of failing the run.

use stepgraph::{CompilationError, Field, Record, Schema, StateGraph, END};

pub const ENTRY: &str = "operation";

stepgraph::route_keys! {
    pub enum Outcome {
        Success => "success",
        Error => "error",
    }
}

pub fn graph() -> Result<StateGraph, CompilationError> {
    let schema = Schema::builder()
        .field(Field::integer("input_value").required())
        .field(Field::number("result").with_default(0))
        .field(Field::string("error").with_default(""))
        .field(Field::string("status").with_default(""))
        .build()?;

    let mut graph = StateGraph::with_schema(schema);
    graph
        .add_fn_step("operation", risky_operation)?
        .add_fn_step("success", |_: &Record| Record::new().with("status", "completed"))?
        .add_fn_step("error", |_: &Record| Record::new().with("status", "failed"))?
        .add_routed_edges(
            "operation",
            |r: &Record| {
                if r.get_str_or("status", "") == "success" {
                    Outcome::Success
                } else {
                    Outcome::Error
                }
            },
            |outcome: Outcome| match outcome {
                Outcome::Success => "success",
                Outcome::Error => "error",
            },
        )?
        .add_edge("success", END)?
        .add_edge("error", END)?;
    Ok(graph)
}

fn risky_operation(r: &Record) -> Record {
    match divide(r.get_i64_or("input_value", 0)) {
        Ok(result) => Record::new()
            .with("result", result)
            .with("status", "success")
            .with("error", ""),
        Err(message) => {
            tracing::debug!(error = message, "operation failed");
            Record::new()
                .with("result", 0)
                .with("status", "error")
                .with("error", message)
        }
    }
}

fn divide(input: i64) -> Result<f64, &'static str> {
    if input < 0 {
        return Err("Negative numbers not allowed!");
    }
    if input == 0 {
        return Err("Cannot divide by zero");
    }
    Ok(100.0 / input as f64)
}

pub fn sample_input() -> Record {
    Record::new().with("input_value", 10)
}
