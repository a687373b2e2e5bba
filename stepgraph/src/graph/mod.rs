//! State graph: named steps, one transition rule per step, compile and run.
//!
//! Register steps and transitions on a [`StateGraph`], `compile` it, then run the
//! [`CompiledStateGraph`] from an entry step with an initial record and a step bound.

mod compile_error;
mod compiled;
pub mod logging;
mod mermaid;
mod route;
mod run_context;
mod state_graph;
mod step;
mod step_middleware;
mod transition;

pub use compile_error::CompilationError;
pub use compiled::{CompiledStateGraph, RunReport};
pub use route::RouteKey;
pub use run_context::RunContext;
pub use state_graph::StateGraph;
pub use step::{FnStep, Step, TryFnStep};
pub use step_middleware::{StepCall, StepFuture, StepMiddleware};
pub use transition::{Destination, Selector, Transition, END};
