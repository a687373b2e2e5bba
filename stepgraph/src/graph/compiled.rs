//! Compiled state graph: immutable, supports invoke, invoke_traced and stream.
//!
//! Built by `StateGraph::compile` or `compile_with_middleware`. Holds the step table,
//! one transition per step, the join destination of every fan-out and the record
//! schema. Runs share nothing: each call builds its own record from the initial one.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::error::{RunError, StepError};
use crate::record::Record;
use crate::schema::Schema;
use crate::stream::{StreamEvent, StreamMode};

use super::logging;
use super::step_middleware::{StepCall, StepFuture, StepMiddleware};
use super::{Destination, RunContext, Step, Transition};

/// Result of a traced run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    /// Final record.
    pub record: Record,
    /// Executed step names in execution order. Fan-out branches appear in declaration
    /// order.
    pub path: Vec<String>,
    /// Number of executed steps (`path.len()`).
    pub steps: usize,
}

/// Where execution goes after a step's update has been merged.
enum Hop {
    End,
    Step(String),
    Parallel {
        branches: Vec<String>,
        join: Destination,
    },
}

/// Compiled graph: immutable structure, cheap to clone (shared step table).
///
/// Created by `StateGraph::compile()` or `compile_with_middleware()`. A run starts at
/// the given entry step and follows the transition rules until END is reached, a step
/// fails, a route key is unmapped, or the iteration limit is hit.
#[derive(Clone)]
pub struct CompiledStateGraph {
    pub(super) steps: HashMap<String, Arc<dyn Step>>,
    pub(super) transitions: HashMap<String, Transition>,
    /// Join destination of every fan-out, keyed by the fan-out source.
    pub(super) joins: HashMap<String, Destination>,
    pub(super) schema: Arc<Schema>,
    /// Optional step middleware; set when built with `compile_with_middleware`.
    pub(super) middleware: Option<Arc<dyn StepMiddleware>>,
}

impl CompiledStateGraph {
    /// Runs one step, through the middleware when there is one.
    async fn call_step(&self, name: &str, record: &Record) -> Result<Record, RunError> {
        let step = self
            .steps
            .get(name)
            .cloned()
            .ok_or_else(|| RunError::UnknownStep(name.to_string()))?;

        let result = if let Some(middleware) = &self.middleware {
            let inner: StepCall = Box::new(move |r: Record| -> StepFuture {
                Box::pin(async move { step.run(&r).await })
            });
            middleware.around_run(name, record.clone(), inner).await
        } else {
            step.run(record).await
        };

        result.map_err(|source: StepError| RunError::StepFailed {
            step: name.to_string(),
            source,
        })
    }

    /// Picks the next hop for `step` from its transition rule and the merged record.
    fn resolve(&self, step: &str, record: &Record) -> Result<Hop, RunError> {
        let transition = self
            .transitions
            .get(step)
            .ok_or_else(|| RunError::UnknownStep(step.to_string()))?;

        let destination = match transition {
            Transition::Direct(dest) => {
                logging::log_route(step, None, dest);
                dest.clone()
            }
            Transition::Conditional { selector, routes } => {
                let key = selector(record);
                let dest = routes.get(&key).ok_or_else(|| RunError::UnmappedRoute {
                    step: step.to_string(),
                    key: key.clone(),
                })?;
                logging::log_route(step, Some(&key), dest);
                dest.clone()
            }
            Transition::Parallel(branches) => {
                let join = self
                    .joins
                    .get(step)
                    .cloned()
                    .ok_or_else(|| RunError::UnknownStep(step.to_string()))?;
                return Ok(Hop::Parallel {
                    branches: branches.clone(),
                    join,
                });
            }
        };

        Ok(match destination {
            Destination::End => Hop::End,
            Destination::Step(name) => Hop::Step(name),
        })
    }

    /// Shared run loop used by invoke(), invoke_traced() and stream().
    async fn run_loop(
        &self,
        entry: &str,
        initial: Record,
        max_steps: usize,
        run_ctx: Option<&RunContext>,
    ) -> Result<RunReport, RunError> {
        logging::log_run_start(entry, max_steps);
        let result = self.run_loop_inner(entry, initial, max_steps, run_ctx).await;
        match &result {
            Ok(report) => logging::log_run_complete(report.steps),
            Err(e) => logging::log_run_error(e),
        }
        result
    }

    async fn run_loop_inner(
        &self,
        entry: &str,
        initial: Record,
        max_steps: usize,
        run_ctx: Option<&RunContext>,
    ) -> Result<RunReport, RunError> {
        if !self.steps.contains_key(entry) {
            return Err(RunError::UnknownStep(entry.to_string()));
        }
        let mut record = self.schema.initialize(initial)?;
        let mut path: Vec<String> = Vec::new();
        let mut current = entry.to_string();

        loop {
            if path.len() >= max_steps {
                return Err(RunError::IterationLimitExceeded {
                    limit: max_steps,
                    step: current,
                });
            }
            logging::log_step_start(&current, path.len() + 1);
            let update = self.call_step(&current, &record).await?;
            path.push(current.clone());
            self.absorb(&mut record, &current, update, run_ctx).await?;

            let join = match self.resolve(&current, &record)? {
                Hop::End => break,
                Hop::Step(next) => {
                    current = next;
                    continue;
                }
                Hop::Parallel { branches, join } => {
                    let remaining = max_steps - path.len();
                    if branches.len() > remaining {
                        return Err(RunError::IterationLimitExceeded {
                            limit: max_steps,
                            step: branches[remaining].clone(),
                        });
                    }
                    self.fan_out(&current, &branches, &mut record, &mut path, run_ctx)
                        .await?;
                    join
                }
            };

            match join {
                Destination::End => break,
                Destination::Step(next) => current = next,
            }
        }

        let steps = path.len();
        Ok(RunReport {
            record,
            path,
            steps,
        })
    }

    /// Merges a single step's update and emits stream events.
    async fn absorb(
        &self,
        record: &mut Record,
        step: &str,
        update: Record,
        run_ctx: Option<&RunContext>,
    ) -> Result<(), RunError> {
        let fields: Vec<&str> = update.keys().collect();
        logging::log_step_complete(step, &fields);
        if let Some(ctx) = run_ctx {
            ctx.emit_update(step, &update).await;
        }
        self.schema.merge(record, step, update)?;
        if let Some(ctx) = run_ctx {
            ctx.emit_values(record).await;
        }
        Ok(())
    }

    /// Runs all branches concurrently against one snapshot, then merges their updates
    /// in declaration order.
    async fn fan_out(
        &self,
        source: &str,
        branches: &[String],
        record: &mut Record,
        path: &mut Vec<String>,
        run_ctx: Option<&RunContext>,
    ) -> Result<(), RunError> {
        logging::log_fan_out(source, branches);
        let snapshot = record.clone();
        let base = path.len();
        let results = join_all(branches.iter().enumerate().map(|(i, branch)| {
            logging::log_step_start(branch, base + i + 1);
            self.call_step(branch, &snapshot)
        }))
        .await;

        let mut updates = Vec::with_capacity(branches.len());
        for (branch, result) in branches.iter().zip(results) {
            let update = result?;
            let fields: Vec<&str> = update.keys().collect();
            logging::log_step_complete(branch, &fields);
            if let Some(ctx) = run_ctx {
                ctx.emit_update(branch, &update).await;
            }
            path.push(branch.clone());
            updates.push((branch.clone(), update));
        }

        self.schema.merge_parallel(record, updates)?;
        if let Some(ctx) = run_ctx {
            ctx.emit_values(record).await;
        }
        Ok(())
    }

    /// Runs the graph from `entry` until END and returns the final record.
    ///
    /// `max_steps` bounds the number of executed steps: a run that would execute step
    /// number `max_steps + 1` fails with `IterationLimitExceeded` naming that step.
    /// Errors:
    /// - `UnknownStep`: `entry` is not registered.
    /// - `MissingField` / `FieldType`: the initial record does not fit the schema.
    /// - `StepFailed`: a step returned an error; no further step runs.
    /// - `UnmappedRoute`: a selector returned a key without a destination.
    /// - `Merge` / `ConflictingWrite`: an update could not be merged.
    pub async fn invoke(
        &self,
        entry: &str,
        record: Record,
        max_steps: usize,
    ) -> Result<Record, RunError> {
        self.run_loop(entry, record, max_steps, None)
            .await
            .map(|report| report.record)
    }

    /// Like [`invoke`](Self::invoke), also returning the executed path.
    pub async fn invoke_traced(
        &self,
        entry: &str,
        record: Record,
        max_steps: usize,
    ) -> Result<RunReport, RunError> {
        self.run_loop(entry, record, max_steps, None).await
    }

    /// Streams graph execution, emitting events via channel-backed Stream.
    ///
    /// The run happens on a spawned task. The stream always ends with `Done(record)` or
    /// `Failed(error)`; dropping the stream does not cancel steps already running.
    pub fn stream(
        &self,
        entry: &str,
        record: Record,
        max_steps: usize,
        stream_mode: impl Into<HashSet<StreamMode>>,
    ) -> ReceiverStream<StreamEvent> {
        let (tx, rx) = mpsc::channel(128);
        let graph = self.clone();
        let entry = entry.to_string();
        let mode_set: HashSet<StreamMode> = stream_mode.into();

        tokio::spawn(async move {
            let run_ctx = RunContext {
                stream_tx: Some(tx.clone()),
                stream_mode: mode_set,
            };
            let last = match graph
                .run_loop(&entry, record, max_steps, Some(&run_ctx))
                .await
            {
                Ok(report) => StreamEvent::Done(report.record),
                Err(e) => StreamEvent::Failed(e),
            };
            let _ = tx.send(last).await;
        });

        ReceiverStream::new(rx)
    }

    /// The record schema the graph was built with.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Registered step names, sorted.
    pub fn step_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.steps.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The outgoing rule of `step`, if registered.
    pub fn transition(&self, step: &str) -> Option<&Transition> {
        self.transitions.get(step)
    }
}
