//! Step trait: one named unit of computation in a graph.
//!
//! A step reads the current record and returns a partial record with the fields it
//! changes. Steps are registered once and shared read-only by every run, so they must
//! not keep per-run state.

use async_trait::async_trait;

use crate::error::StepError;
use crate::record::Record;

/// One step of a state graph.
///
/// **Interaction**: Registered with `StateGraph::add_step`; called by
/// `CompiledStateGraph` with the current record, possibly through a
/// [`StepMiddleware`](super::StepMiddleware).
#[async_trait]
pub trait Step: Send + Sync {
    /// Computes the update for `record`. Only the returned fields are merged.
    async fn run(&self, record: &Record) -> Result<Record, StepError>;
}

/// Adapter for infallible pure closures `Fn(&Record) -> Record`.
pub struct FnStep<F>(F);

impl<F> FnStep<F>
where
    F: Fn(&Record) -> Record + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> Step for FnStep<F>
where
    F: Fn(&Record) -> Record + Send + Sync,
{
    async fn run(&self, record: &Record) -> Result<Record, StepError> {
        Ok((self.0)(record))
    }
}

/// Adapter for fallible closures `Fn(&Record) -> Result<Record, StepError>`.
pub struct TryFnStep<F>(F);

impl<F> TryFnStep<F>
where
    F: Fn(&Record) -> Result<Record, StepError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> Step for TryFnStep<F>
where
    F: Fn(&Record) -> Result<Record, StepError> + Send + Sync,
{
    async fn run(&self, record: &Record) -> Result<Record, StepError> {
        (self.0)(record)
    }
}
