//! Optional overrides for a run (CLI args or programmatic).
//!
//! Used by [`RunConfig::apply_options`](super::RunConfig::apply_options) and
//! [`run_with_options`](crate::run_with_options). Callers build a `RunOptions` and pass it
//! to get env-based config with overrides applied.

/// Optional overrides for a run: step bound, streaming, verbose logging.
///
/// Only set fields override the base config (from env).
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Override the step bound.
    pub max_steps: Option<usize>,
    /// Stream events instead of printing only the final record.
    pub stream: bool,
    /// Log every step (enter/exit) and debug-level executor events.
    pub verbose: bool,
}
