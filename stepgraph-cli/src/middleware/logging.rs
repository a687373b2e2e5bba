//! Logging middleware that records step enter/exit around each step call.

use std::time::Instant;

use async_trait::async_trait;

use stepgraph::{Record, StepCall, StepError, StepMiddleware};

/// Middleware that logs step enter/exit around each step call.
///
/// Events go through `tracing`; the binary sends them to stderr so the printed record
/// on stdout stays clean.
pub struct LoggingMiddleware;

#[async_trait]
impl StepMiddleware for LoggingMiddleware {
    async fn around_run(
        &self,
        step: &str,
        record: Record,
        inner: StepCall,
    ) -> Result<Record, StepError> {
        tracing::info!(step = step, "enter step");
        let started = Instant::now();
        let result = inner(record).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(update) => {
                let fields: Vec<&str> = update.keys().collect();
                tracing::info!(step = step, ?fields, elapsed_ms, "exit step");
            }
            Err(e) => tracing::warn!(step = step, error = %e, elapsed_ms, "step failed"),
        }
        result
    }
}
