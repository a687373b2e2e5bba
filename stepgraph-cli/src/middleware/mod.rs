//! Step middleware for the demo workflows.
//!
//! Re-exports [`LoggingMiddleware`] and [`WithStepLogging`].

mod logging;
mod with_step_logging;

pub use logging::LoggingMiddleware;
pub use with_step_logging::WithStepLogging;
