//! `pipeline`: load → clean → validate → process | handle_invalid.
//!
//! Validation problems are collected in the accumulated `errors` list and decide the
//! route; they never fail the run.

use serde_json::json;
use stepgraph::{CompilationError, Combine, Field, Record, Schema, StateGraph, END};

pub const ENTRY: &str = "load";

/// Line loaded when the caller does not supply `raw_data`.
pub const SAMPLE_LINE: &str = "  user@example.com, 25, active  ";

stepgraph::route_keys! {
    pub enum Validation {
        Valid => "valid",
        Invalid => "invalid",
    }
}

pub fn graph() -> Result<StateGraph, CompilationError> {
    let schema = Schema::builder()
        .field(Field::string("raw_data").with_default(""))
        .field(Field::string("cleaned_data").with_default(""))
        .field(Field::boolean("validated").with_default(false))
        .field(Field::object("processed_data").with_default(json!({})))
        .field(
            Field::list("errors")
                .accumulate(Combine::Append)
                .with_default(json!([])),
        )
        .build()?;

    let mut graph = StateGraph::with_schema(schema);
    graph
        .add_fn_step("load", load)?
        .add_fn_step("clean", |r: &Record| {
            Record::new().with("cleaned_data", r.get_str_or("raw_data", "").trim())
        })?
        .add_fn_step("validate", validate)?
        .add_fn_step("process", process)?
        .add_fn_step("handle_invalid", |_: &Record| {
            Record::new().with("processed_data", json!({}))
        })?
        .add_edge("load", "clean")?
        .add_edge("clean", "validate")?
        .add_routed_edges(
            "validate",
            |r: &Record| {
                if r.get_bool_or("validated", false) {
                    Validation::Valid
                } else {
                    Validation::Invalid
                }
            },
            |v: Validation| match v {
                Validation::Valid => "process",
                Validation::Invalid => "handle_invalid",
            },
        )?
        .add_edge("process", END)?
        .add_edge("handle_invalid", END)?;
    Ok(graph)
}

fn load(r: &Record) -> Record {
    if r.get_str_or("raw_data", "").trim().is_empty() {
        Record::new().with("raw_data", SAMPLE_LINE)
    } else {
        Record::new()
    }
}

/// Splits a cleaned line into its three trimmed parts.
fn fields(line: &str) -> Vec<&str> {
    line.split(',').map(str::trim).collect()
}

fn validate(r: &Record) -> Record {
    match check(r.get_str_or("cleaned_data", "")) {
        Ok(()) => Record::new().with("validated", true),
        Err(problem) => Record::new()
            .with("validated", false)
            .with("errors", vec![problem]),
    }
}

fn check(line: &str) -> Result<(), String> {
    let parts = fields(line);
    if parts.len() != 3 {
        return Err("Invalid data format: expected 3 fields".into());
    }
    if !parts[0].contains('@') {
        return Err("Invalid email format".into());
    }
    match parts[1].parse::<i64>() {
        Ok(age) if (0..=150).contains(&age) => Ok(()),
        Ok(_) => Err("Age out of valid range".into()),
        Err(_) => Err("Age must be a number".into()),
    }
}

fn process(r: &Record) -> Record {
    let line = r.get_str_or("cleaned_data", "");
    let parts = fields(line);
    let (email, age, status) = match parts.as_slice() {
        [email, age, status] => (*email, age.parse::<i64>().unwrap_or(0), *status),
        _ => return Record::new().with("errors", vec!["process reached with invalid data"]),
    };
    let category = if age >= 18 { "adult" } else { "minor" };
    Record::new().with(
        "processed_data",
        json!({
            "email": email,
            "age": age,
            "status": status,
            "category": category,
        }),
    )
}

pub fn sample_input() -> Record {
    Record::new()
}
