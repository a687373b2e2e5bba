//! stepgraph-cli library: run the bundled demo workflows from other crates or tests.
//!
//! Reads run settings from env / `.env`, looks up a workflow by name, compiles it and
//! runs it from its entry step.
//!
//! ## Usage
//!
//! ```rust,no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), stepgraph_cli::Error> {
//! let report = stepgraph_cli::run("loop", Some(r#"{"max_iterations": 3}"#)).await?;
//! println!("{:?}", report.record);
//! # Ok(())
//! # }
//! ```

mod config;
mod middleware;
mod run;
pub mod workflows;

pub use config::{Error, RunConfig, RunOptions};
pub use middleware::{LoggingMiddleware, WithStepLogging};
pub use run::{parse_input, run, run_with_config, run_with_options, stream_with_config};
pub use stepgraph::{Record, RunReport, StreamEvent};

#[cfg(test)]
mod tests;
