//! `grade`: PASS when `score >= 50`, FAIL otherwise.

use stepgraph::{CompilationError, Field, Record, Schema, StateGraph, END};

pub const ENTRY: &str = "grade";

/// Lowest passing score.
pub const PASS_MARK: i64 = 50;

stepgraph::route_keys! {
    pub enum Grade {
        Pass => "pass",
        Fail => "fail",
    }
}

pub fn graph() -> Result<StateGraph, CompilationError> {
    let schema = Schema::builder()
        .field(Field::integer("score").required())
        .field(Field::string("result"))
        .build()?;

    let mut graph = StateGraph::with_schema(schema);
    graph
        .add_fn_step("grade", |_: &Record| Record::new())?
        .add_fn_step("pass", |_: &Record| Record::new().with("result", "PASS"))?
        .add_fn_step("fail", |_: &Record| Record::new().with("result", "FAIL"))?
        .add_routed_edges(
            "grade",
            |r: &Record| {
                if r.get_i64_or("score", 0) >= PASS_MARK {
                    Grade::Pass
                } else {
                    Grade::Fail
                }
            },
            |grade: Grade| match grade {
                Grade::Pass => "pass",
                Grade::Fail => "fail",
            },
        )?
        .add_edge("pass", END)?
        .add_edge("fail", END)?;
    Ok(graph)
}

pub fn sample_input() -> Record {
    Record::new().with("score", 78)
}
