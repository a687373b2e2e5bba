//! StateGraph registration and compile failure cases.

use std::sync::Arc;

use stepgraph::{CompilationError, FnStep, Record, StateGraph, END};

use crate::common::increment;

#[test]
fn compile_fails_when_edge_refers_to_unknown_step() {
    let mut graph = StateGraph::new();
    graph.add_fn_step("increment", increment).unwrap();
    graph.add_edge("increment", "missing").unwrap();

    match graph.compile() {
        Err(CompilationError::UnknownStep {
            step,
            referenced_by,
        }) => {
            assert_eq!(step, "missing");
            assert_eq!(referenced_by.as_deref(), Some("increment"));
        }
        _ => panic!("expected UnknownStep"),
    }
}

#[test]
fn compile_fails_when_route_refers_to_unknown_step() {
    let mut graph = StateGraph::new();
    graph.add_fn_step("check", increment).unwrap();
    graph
        .add_conditional_edges("check", |_: &Record| "yes", [("yes", "ghost"), ("no", END)])
        .unwrap();

    assert!(matches!(
        graph.compile(),
        Err(CompilationError::UnknownStep { ref step, .. }) if step == "ghost"
    ));
}

#[test]
fn edge_from_unregistered_step_fails_immediately() {
    let mut graph = StateGraph::new();
    let err = graph.add_edge("nobody", END).err().unwrap();
    assert!(matches!(err, CompilationError::UnknownStep { referenced_by: None, .. }));
}

#[test]
fn duplicate_step_name_fails() {
    let mut graph = StateGraph::new();
    graph
        .add_step("a", Arc::new(FnStep::new(increment)))
        .unwrap();
    assert_eq!(
        graph.add_fn_step("a", increment).err(),
        Some(CompilationError::DuplicateStep("a".into()))
    );
}

/// **Scenario**: A step reachable only as a dead end (no outgoing rule) is rejected.
#[test]
fn step_without_outgoing_rule_fails_compile() {
    let mut graph = StateGraph::new();
    graph
        .add_fn_step("a", increment)
        .unwrap()
        .add_fn_step("b", increment)
        .unwrap()
        .add_edge("a", "b")
        .unwrap();
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::MissingTransition("b".into()))
    );
}
