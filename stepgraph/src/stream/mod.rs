//! Streaming types for graph runs.
//!
//! Defines stream modes and events for `CompiledStateGraph::stream`. Every stream ends
//! with exactly one [`StreamEvent::Done`] or [`StreamEvent::Failed`].

use crate::error::RunError;
use crate::record::Record;

/// Stream mode selector: which intermediate events to emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamMode {
    /// Emit the full record after each merge.
    Values,
    /// Emit each step's partial record with the step name.
    Updates,
}

/// Event emitted while running a graph.
#[derive(Clone, Debug, PartialEq)]
pub enum StreamEvent {
    /// Full record after a step (or a fan-out) was merged.
    Values(Record),
    /// Partial record returned by one step, before merging.
    Updates { step: String, update: Record },
    /// The run reached END; carries the final record.
    Done(Record),
    /// The run failed; no final record exists.
    Failed(RunError),
}

impl StreamEvent {
    /// Whether this is the last event of a stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_) | Self::Failed(_))
    }
}
