//! Extension trait for fluent API: attach step logging middleware then compile.
//!
//! Interacts with [`StateGraph`](stepgraph::StateGraph) and
//! [`LoggingMiddleware`](super::logging::LoggingMiddleware).

use std::sync::Arc;

use stepgraph::StateGraph;

use super::logging::LoggingMiddleware;

/// Extension trait for fluent API: attach step logging middleware then compile.
pub trait WithStepLogging {
    /// Returns the same graph with `LoggingMiddleware` attached. Chain with `.compile()?`.
    fn with_step_logging(self) -> Self;
}

impl WithStepLogging for StateGraph {
    fn with_step_logging(self) -> Self {
        self.with_middleware(Arc::new(LoggingMiddleware))
    }
}
