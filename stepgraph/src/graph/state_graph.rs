//! State graph builder: named steps plus one outgoing transition per step.
//!
//! Register steps with `add_step` / `add_fn_step`, connect them with `add_edge`,
//! `add_conditional_edges`, `add_routed_edges` or `add_parallel_edges` (use `END` as
//! the terminal destination), then `compile` to get a `CompiledStateGraph`.
//! Registration errors are returned by the call that detects them; checks that need the
//! whole graph run in `compile`.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use crate::error::StepError;
use crate::graph::compile_error::CompilationError;
use crate::graph::compiled::CompiledStateGraph;
use crate::graph::route::RouteKey;
use crate::graph::step::{FnStep, Step, TryFnStep};
use crate::graph::step_middleware::StepMiddleware;
use crate::graph::transition::{Destination, Selector, Transition, END};
use crate::record::Record;
use crate::schema::Schema;

/// Mutable registration tables of a graph.
///
/// **Interaction**: Accepts `Arc<dyn Step>` and closures; produces an immutable
/// `CompiledStateGraph`. Middleware is passed at compile time only.
///
/// ```rust
/// use stepgraph::{Record, StateGraph, END};
///
/// let mut graph = StateGraph::new();
/// graph
///     .add_fn_step("greet", |r: &Record| {
///         Record::new().with("message", format!("{} Hello", r.get_str_or("message", "")))
///     })?
///     .add_edge("greet", END)?;
/// let compiled = graph.compile()?;
/// # let _ = compiled;
/// # Ok::<(), stepgraph::CompilationError>(())
/// ```
pub struct StateGraph {
    steps: HashMap<String, Arc<dyn Step>>,
    transitions: HashMap<String, Transition>,
    schema: Schema,
    middleware: Option<Arc<dyn StepMiddleware>>,
}

impl Default for StateGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl StateGraph {
    /// Creates an empty graph without declared fields (every field: any kind, overwrite).
    pub fn new() -> Self {
        Self::with_schema(Schema::new())
    }

    /// Creates an empty graph whose record follows `schema`.
    pub fn with_schema(schema: Schema) -> Self {
        Self {
            steps: HashMap::new(),
            transitions: HashMap::new(),
            schema,
            middleware: None,
        }
    }

    /// Attaches step middleware used by the next `compile()`.
    pub fn with_middleware(mut self, middleware: Arc<dyn StepMiddleware>) -> Self {
        self.middleware = Some(middleware);
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Registers a step under a unique name.
    ///
    /// Fails with `DuplicateStep` when the name is taken and `ReservedName` for an empty
    /// name or `END`.
    pub fn add_step(
        &mut self,
        name: impl Into<String>,
        step: Arc<dyn Step>,
    ) -> Result<&mut Self, CompilationError> {
        let name = name.into();
        if name.is_empty() || name == END {
            return Err(CompilationError::ReservedName(name));
        }
        if self.steps.contains_key(&name) {
            return Err(CompilationError::DuplicateStep(name));
        }
        self.steps.insert(name, step);
        Ok(self)
    }

    /// Registers a pure closure `Fn(&Record) -> Record` as a step.
    pub fn add_fn_step<F>(
        &mut self,
        name: impl Into<String>,
        f: F,
    ) -> Result<&mut Self, CompilationError>
    where
        F: Fn(&Record) -> Record + Send + Sync + 'static,
    {
        self.add_step(name, Arc::new(FnStep::new(f)))
    }

    /// Registers a fallible closure `Fn(&Record) -> Result<Record, StepError>` as a step.
    pub fn add_try_fn_step<F>(
        &mut self,
        name: impl Into<String>,
        f: F,
    ) -> Result<&mut Self, CompilationError>
    where
        F: Fn(&Record) -> Result<Record, StepError> + Send + Sync + 'static,
    {
        self.add_step(name, Arc::new(TryFnStep::new(f)))
    }

    /// Adds an unconditional edge. `to` may be `END` and may be registered later.
    ///
    /// Fails with `UnknownStep` if `from` is not registered and `DuplicateTransition` if
    /// `from` already has an outgoing rule.
    pub fn add_edge(
        &mut self,
        from: impl Into<String>,
        to: impl Into<Destination>,
    ) -> Result<&mut Self, CompilationError> {
        let from = self.check_source(from.into())?;
        self.transitions.insert(from, Transition::Direct(to.into()));
        Ok(self)
    }

    /// Adds a conditional edge with open string keys.
    ///
    /// `selector` computes the key from the record; `routes` maps keys to destinations.
    /// A key the selector returns that is missing from `routes` fails the run with
    /// `UnmappedRoute`. Prefer [`add_routed_edges`](Self::add_routed_edges) when the key
    /// set is closed.
    pub fn add_conditional_edges<F, K, I, R, D>(
        &mut self,
        from: impl Into<String>,
        selector: F,
        routes: I,
    ) -> Result<&mut Self, CompilationError>
    where
        F: Fn(&Record) -> K + Send + Sync + 'static,
        K: Into<String>,
        I: IntoIterator<Item = (R, D)>,
        R: Into<String>,
        D: Into<Destination>,
    {
        let from = self.check_source(from.into())?;
        let mut table = BTreeMap::new();
        for (key, dest) in routes {
            let key = key.into();
            if table.contains_key(&key) {
                return Err(CompilationError::DuplicateRoute { step: from, key });
            }
            table.insert(key, dest.into());
        }
        let selector: Selector = Arc::new(move |record: &Record| selector(record).into());
        self.transitions.insert(
            from,
            Transition::Conditional {
                selector,
                routes: table,
            },
        );
        Ok(self)
    }

    /// Adds a conditional edge keyed by a closed [`RouteKey`] enumeration.
    ///
    /// `mapping` must give a destination for every key (a `match` over the enum), so the
    /// route table is complete at registration and no key can be unmapped at run time.
    pub fn add_routed_edges<K, F, M, D>(
        &mut self,
        from: impl Into<String>,
        selector: F,
        mapping: M,
    ) -> Result<&mut Self, CompilationError>
    where
        K: RouteKey,
        F: Fn(&Record) -> K + Send + Sync + 'static,
        M: Fn(K) -> D,
        D: Into<Destination>,
    {
        let routes: Vec<(&'static str, Destination)> = K::ALL
            .iter()
            .map(|key| (key.as_str(), mapping(*key).into()))
            .collect();
        self.add_conditional_edges(from, move |record: &Record| selector(record).as_str(), routes)
    }

    /// Adds a fan-out: after `from`, all `branches` run against the same record snapshot
    /// and their updates are merged at one point.
    ///
    /// Each branch needs a direct edge to the same join destination (checked in
    /// `compile`). Fails with `InvalidFanOut` for fewer than two or repeated branches.
    pub fn add_parallel_edges<I, B>(
        &mut self,
        from: impl Into<String>,
        branches: I,
    ) -> Result<&mut Self, CompilationError>
    where
        I: IntoIterator<Item = B>,
        B: Into<String>,
    {
        let from = self.check_source(from.into())?;
        let branches: Vec<String> = branches.into_iter().map(Into::into).collect();
        if branches.len() < 2 {
            return Err(CompilationError::InvalidFanOut {
                step: from,
                reason: "a fan-out needs at least two branches".into(),
            });
        }
        let mut seen = HashSet::new();
        for branch in &branches {
            if branch == END {
                return Err(CompilationError::InvalidFanOut {
                    step: from,
                    reason: "END cannot be a branch".into(),
                });
            }
            if !seen.insert(branch.as_str()) {
                return Err(CompilationError::InvalidFanOut {
                    reason: format!("branch '{}' listed twice", branch),
                    step: from,
                });
            }
        }
        self.transitions.insert(from, Transition::Parallel(branches));
        Ok(self)
    }

    fn check_source(&self, from: String) -> Result<String, CompilationError> {
        if !self.steps.contains_key(&from) {
            return Err(CompilationError::UnknownStep {
                step: from,
                referenced_by: None,
            });
        }
        if self.transitions.contains_key(&from) {
            return Err(CompilationError::DuplicateTransition(from));
        }
        Ok(from)
    }

    /// Builds the executable graph.
    ///
    /// Checks that every step has an outgoing rule, every destination is registered, and
    /// every fan-out's branches share one direct join destination. On success the
    /// registration tables are frozen.
    pub fn compile(self) -> Result<CompiledStateGraph, CompilationError> {
        self.compile_internal()
    }

    /// Builds the executable graph with step middleware wrapping every step call.
    pub fn compile_with_middleware(
        self,
        middleware: Arc<dyn StepMiddleware>,
    ) -> Result<CompiledStateGraph, CompilationError> {
        self.with_middleware(middleware).compile_internal()
    }

    fn compile_internal(self) -> Result<CompiledStateGraph, CompilationError> {
        let mut names: Vec<&String> = self.steps.keys().collect();
        names.sort();

        for name in &names {
            if !self.transitions.contains_key(*name) {
                return Err(CompilationError::MissingTransition((*name).clone()));
            }
        }

        for name in &names {
            for dest in self.transitions[*name].destinations() {
                if let Destination::Step(target) = dest {
                    if !self.steps.contains_key(&target) {
                        return Err(CompilationError::UnknownStep {
                            step: target,
                            referenced_by: Some((*name).clone()),
                        });
                    }
                }
            }
        }

        let mut joins = HashMap::new();
        for name in &names {
            if let Transition::Parallel(branches) = &self.transitions[*name] {
                let join = self.fan_out_join(name, branches)?;
                joins.insert((*name).clone(), join);
            }
        }

        Ok(CompiledStateGraph {
            steps: self.steps,
            transitions: self.transitions,
            joins,
            schema: Arc::new(self.schema),
            middleware: self.middleware,
        })
    }

    /// The common direct destination of all branches of the fan-out from `source`.
    fn fan_out_join(
        &self,
        source: &str,
        branches: &[String],
    ) -> Result<Destination, CompilationError> {
        let mut join: Option<&Destination> = None;
        for branch in branches {
            let dest = match &self.transitions[branch] {
                Transition::Direct(dest) => dest,
                _ => {
                    return Err(CompilationError::InvalidFanOut {
                        step: source.to_string(),
                        reason: format!("branch '{}' must have a direct edge to the join", branch),
                    })
                }
            };
            match join {
                None => join = Some(dest),
                Some(existing) if existing == dest => {}
                Some(existing) => {
                    return Err(CompilationError::InvalidFanOut {
                        step: source.to_string(),
                        reason: format!(
                            "branches lead to different joins ('{}' and '{}')",
                            existing, dest
                        ),
                    })
                }
            }
        }
        join.cloned().ok_or_else(|| CompilationError::InvalidFanOut {
            step: source.to_string(),
            reason: "a fan-out needs at least two branches".into(),
        })
    }
}
