//! Run a workflow with given config; does not read .env.

use stepgraph::{CompiledStateGraph, Record, RunReport, StreamEvent, StreamMode};
use tokio_stream::wrappers::ReceiverStream;

use crate::config::{Error, RunConfig};
use crate::middleware::WithStepLogging;
use crate::workflows::{lookup, Workflow};

/// Compiles `workflow`, attaching step logging when `config.verbose` is set.
fn compile(workflow: &Workflow, config: &RunConfig) -> Result<CompiledStateGraph, Error> {
    let graph = workflow.graph()?;
    let compiled = if config.verbose {
        graph.with_step_logging().compile()?
    } else {
        graph.compile()?
    };
    Ok(compiled)
}

/// Runs workflow `name` to completion and returns the final record and executed path.
///
/// `input` replaces the workflow's sample input when given. Fails on an unknown workflow
/// name or any run error (unknown entry, step failure, unmapped route, step bound).
pub async fn run_with_config(
    config: &RunConfig,
    name: &str,
    input: Option<Record>,
) -> Result<RunReport, Error> {
    let workflow = lookup(name)?;
    let compiled = compile(workflow, config)?;
    let input = input.unwrap_or_else(|| workflow.sample_input());
    tracing::debug!(
        workflow = name,
        entry = workflow.entry,
        max_steps = config.max_steps,
        "running workflow"
    );
    let report = compiled
        .invoke_traced(workflow.entry, input, config.max_steps)
        .await?;
    Ok(report)
}

/// Starts workflow `name` and returns its event stream (updates and values, then
/// `Done` or `Failed`). Must be called inside a tokio runtime.
pub fn stream_with_config(
    config: &RunConfig,
    name: &str,
    input: Option<Record>,
) -> Result<ReceiverStream<StreamEvent>, Error> {
    let workflow = lookup(name)?;
    let compiled = compile(workflow, config)?;
    let input = input.unwrap_or_else(|| workflow.sample_input());
    Ok(compiled.stream(
        workflow.entry,
        input,
        config.max_steps,
        [StreamMode::Updates, StreamMode::Values],
    ))
}
