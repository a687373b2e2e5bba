//! Step middleware: wraps every step call of a compiled graph.
//!
//! Attach with `StateGraph::compile_with_middleware`. The middleware receives the step
//! name, the current record and the call to the step itself; it may act before and
//! after the call but must return the step's result (or its own error).

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use crate::error::StepError;
use crate::record::Record;

/// Future returned by a wrapped step call.
pub type StepFuture = Pin<Box<dyn Future<Output = Result<Record, StepError>> + Send>>;

/// The wrapped step call handed to [`StepMiddleware::around_run`].
pub type StepCall = Box<dyn FnOnce(Record) -> StepFuture + Send>;

/// Around-advice for step execution (logging, timing, ...).
#[async_trait]
pub trait StepMiddleware: Send + Sync {
    /// Runs `inner(record)` for step `step` and returns its update.
    async fn around_run(
        &self,
        step: &str,
        record: Record,
        inner: StepCall,
    ) -> Result<Record, StepError>;
}
