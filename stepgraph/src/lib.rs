//! # stepgraph
//!
//! A small state-graph executor. One shared [`Record`] (string keys, JSON values) flows
//! through named steps; each step returns a partial record that is merged back according
//! to the field's declared policy, and a transition rule on each step picks what runs
//! next.
//!
//! ## Design Principles
//!
//! - **Partial updates**: a step returns only the fields it changes. Fields not returned
//!   keep their value.
//! - **Declared merging**: a [`Schema`] gives each field a kind, a default or required
//!   presence, and a [`MergePolicy`] (overwrite, or accumulate with append / union / sum /
//!   custom). Undeclared fields are overwritten.
//! - **One rule per step**: direct edge, conditional edge (selector + route table, or a
//!   closed [`RouteKey`] enum), or fan-out to concurrent branches.
//! - **Bounded runs**: every run takes `max_steps`; cycles are allowed and stop with
//!   [`RunError::IterationLimitExceeded`] if END is not reached in time.
//!
//! ## Main Modules
//!
//! - [`graph`]: `StateGraph`, `CompiledStateGraph`, `Step`, transitions, middleware.
//! - [`schema`]: field declarations and merge policies.
//! - [`record`]: the shared `Record`.
//! - [`stream`]: `StreamMode` / `StreamEvent` for `CompiledStateGraph::stream`.
//! - [`error`]: `RunError` and `StepError`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stepgraph::{Combine, Field, Record, Schema, StateGraph, END};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = Schema::builder()
//!     .field(Field::list("messages").accumulate(Combine::Append))
//!     .field(Field::integer("count").with_default(0))
//!     .build()?;
//!
//! let mut graph = StateGraph::with_schema(schema);
//! graph
//!     .add_fn_step("a", |r: &Record| {
//!         Record::new()
//!             .with("messages", vec!["from a"])
//!             .with("count", r.get_i64_or("count", 0) + 1)
//!     })?
//!     .add_fn_step("b", |r: &Record| {
//!         Record::new()
//!             .with("messages", vec!["from b"])
//!             .with("count", r.get_i64_or("count", 0) + 1)
//!     })?
//!     .add_edge("a", "b")?
//!     .add_edge("b", END)?;
//!
//! let compiled = graph.compile()?;
//! let out = compiled.invoke("a", Record::new(), 10).await?;
//! assert_eq!(out.get_i64_or("count", 0), 2);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod graph;
pub mod record;
pub mod schema;
pub mod stream;

pub use error::{RunError, StepError};
pub use graph::{
    CompilationError, CompiledStateGraph, Destination, FnStep, RouteKey, RunContext, RunReport,
    Selector, StateGraph, Step, StepCall, StepFuture, StepMiddleware, Transition, TryFnStep, END,
};
pub use record::Record;
pub use schema::{Combine, CombineFn, Field, FieldKind, MergePolicy, Presence, Schema, SchemaBuilder};
pub use stream::{StreamEvent, StreamMode};
