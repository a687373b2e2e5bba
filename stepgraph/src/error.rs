//! Run-time error types.
//!
//! [`RunError`] is returned by `CompiledStateGraph::invoke` and friends; [`StepError`]
//! is what a single step reports when it cannot produce an update. Registration and
//! compile errors live in [`CompilationError`](crate::graph::CompilationError).

use thiserror::Error;

/// Failure reported by a step implementation.
///
/// The executor wraps it in [`RunError::StepFailed`] together with the step name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StepError {
    /// The step could not compute its update (bad input, arithmetic error, ...).
    #[error("step failed: {0}")]
    Failed(String),
}

impl StepError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Error that aborts a graph run. A failed run never returns a record.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RunError {
    /// The entry step was never registered.
    #[error("unknown entry step: {0}")]
    UnknownStep(String),

    /// A selector returned a key that has no destination in its route table.
    /// No further step runs after this error.
    #[error("step '{step}' routed by unmapped key '{key}'")]
    UnmappedRoute { step: String, key: String },

    /// The run attempted step number `limit + 1` before reaching END.
    #[error("iteration limit of {limit} steps exceeded before step '{step}'")]
    IterationLimitExceeded { limit: usize, step: String },

    /// A step returned an error.
    #[error("step '{step}' failed: {source}")]
    StepFailed {
        step: String,
        #[source]
        source: StepError,
    },

    /// A required field was absent from the initial record.
    #[error("required field '{0}' is missing from the initial record")]
    MissingField(String),

    /// A value does not match the declared kind of its field.
    /// `step` is `None` when the value came from the initial record.
    #[error("field '{field}' expects {expected}, got {found}{}", step_suffix(.step))]
    FieldType {
        field: String,
        expected: String,
        found: String,
        step: Option<String>,
    },

    /// The field's combination rule rejected the incoming value.
    #[error("cannot merge field '{field}' from step '{step}': {message}")]
    Merge {
        field: String,
        step: String,
        message: String,
    },

    /// Two fan-out branches wrote different values to the same overwrite field.
    #[error("conflicting writes to field '{field}' from parallel steps {steps:?}")]
    ConflictingWrite { field: String, steps: Vec<String> },
}

fn step_suffix(step: &Option<String>) -> String {
    match step {
        Some(s) => format!(" (written by step '{}')", s),
        None => " (in initial record)".to_string(),
    }
}
