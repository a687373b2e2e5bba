//! Graph registration and compilation errors.
//!
//! Returned by the `StateGraph::add_*` registration calls (detected immediately),
//! by `SchemaBuilder::build`, and by `StateGraph::compile` for checks that need the
//! complete graph (e.g. edge targets registered after the edge).

use thiserror::Error;

/// Error when registering or compiling a state graph.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompilationError {
    /// A step with this name is already registered.
    #[error("step already registered: {0}")]
    DuplicateStep(String),

    /// A transition references a step that was never registered. `referenced_by` is the
    /// source step when the unknown name is a transition target.
    #[error("unknown step '{step}'{}", referenced_suffix(.referenced_by))]
    UnknownStep {
        step: String,
        referenced_by: Option<String>,
    },

    /// The step already has an outgoing transition rule (direct, conditional or parallel).
    #[error("step '{0}' already has an outgoing transition")]
    DuplicateTransition(String),

    /// A conditional edge lists the same route key twice.
    #[error("step '{step}' maps route key '{key}' more than once")]
    DuplicateRoute { step: String, key: String },

    /// A registered step has no outgoing transition rule.
    #[error("step '{0}' has no outgoing transition")]
    MissingTransition(String),

    /// The name is empty or collides with the END marker.
    #[error("reserved or empty step name: '{0}'")]
    ReservedName(String),

    /// A fan-out is malformed (too few branches, branches without a common join, ...).
    #[error("invalid fan-out from '{step}': {reason}")]
    InvalidFanOut { step: String, reason: String },

    /// Two schema fields share a name.
    #[error("field declared twice: {0}")]
    DuplicateField(String),

    /// A schema field declaration is inconsistent (bad default, incompatible rule).
    #[error("invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },
}

fn referenced_suffix(referenced_by: &Option<String>) -> String {
    referenced_by
        .as_ref()
        .map(|s| format!(" (referenced by '{}')", s))
        .unwrap_or_default()
}
