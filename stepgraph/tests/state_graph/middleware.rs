//! compile_with_middleware: every step call goes through around_run.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use stepgraph::{Record, RunError, StateGraph, StepCall, StepError, StepMiddleware, END};

/// Records step names and can veto one step.
struct Recording {
    seen: Arc<Mutex<Vec<String>>>,
    veto: Option<&'static str>,
}

#[async_trait]
impl StepMiddleware for Recording {
    async fn around_run(
        &self,
        step: &str,
        record: Record,
        inner: StepCall,
    ) -> Result<Record, StepError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(step.to_string());
        }
        if self.veto == Some(step) {
            return Err(StepError::failed("vetoed"));
        }
        inner(record).await
    }
}

fn graph_with(middleware: Recording) -> stepgraph::CompiledStateGraph {
    let mut graph = StateGraph::new();
    graph
        .add_fn_step("a", |r: &Record| {
            Record::new().with("count", r.get_i64_or("count", 0) + 1)
        })
        .unwrap()
        .add_fn_step("b", |r: &Record| {
            Record::new().with("count", r.get_i64_or("count", 0) * 10)
        })
        .unwrap()
        .add_edge("a", "b")
        .unwrap()
        .add_edge("b", END)
        .unwrap();
    graph
        .compile_with_middleware(Arc::new(middleware))
        .expect("compile")
}

/// **Scenario**: The middleware sees every step in order and does not change results.
#[tokio::test]
async fn middleware_wraps_each_step() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let graph = graph_with(Recording {
        seen: seen.clone(),
        veto: None,
    });
    let out = graph
        .invoke("a", Record::new().with("count", 1), 5)
        .await
        .unwrap();
    assert_eq!(out.get_i64_or("count", 0), 20);
    assert_eq!(*seen.lock().unwrap(), vec!["a", "b"]);
}

/// **Scenario**: An error returned by the middleware fails the run like a step error.
#[tokio::test]
async fn middleware_error_fails_run() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let graph = graph_with(Recording {
        seen: seen.clone(),
        veto: Some("b"),
    });
    let err = graph
        .invoke("a", Record::new(), 5)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RunError::StepFailed {
            step: "b".into(),
            source: StepError::failed("vetoed"),
        }
    );
}
