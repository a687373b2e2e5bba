//! Logging utilities for graph execution.
//!
//! Structured `tracing` events for run start/finish, each step and each routing
//! decision. The library never installs a subscriber; binaries decide where events go.

use crate::error::RunError;

use super::Destination;

/// Log run start.
pub fn log_run_start(entry: &str, max_steps: usize) {
    tracing::info!(entry = entry, max_steps = max_steps, "Starting graph run");
}

/// Log step execution start. `attempt` is 1-based.
pub fn log_step_start(step: &str, attempt: usize) {
    tracing::debug!(step = step, attempt = attempt, "Starting step");
}

/// Log the fields a step wrote.
pub fn log_step_complete(step: &str, fields: &[&str]) {
    tracing::debug!(step = step, ?fields, "Step complete");
}

/// Log the destination picked by a transition; `key` is set for conditional edges.
pub fn log_route(step: &str, key: Option<&str>, destination: &Destination) {
    tracing::debug!(step = step, key = key, destination = %destination, "Route resolved");
}

/// Log a fan-out before its branches run.
pub fn log_fan_out(step: &str, branches: &[String]) {
    tracing::debug!(step = step, ?branches, "Fanning out");
}

/// Log run completion.
pub fn log_run_complete(steps: usize) {
    tracing::info!(steps = steps, "Graph run complete");
}

/// Log run failure.
pub fn log_run_error(error: &RunError) {
    tracing::error!(%error, "Graph run failed");
}
