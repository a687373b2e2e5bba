//! Run entry points: run with default config, run_with_config, or run_with_options.
//!
//! Re-exports [`run`], [`run_with_config`], [`run_with_options`], [`stream_with_config`]
//! and [`parse_input`].

mod run_with_config;

use stepgraph::{Record, RunReport};

use crate::config::{Error, RunConfig, RunOptions};

pub use run_with_config::{run_with_config, stream_with_config};

/// Parses `--input` JSON into a record. `None` means "use the workflow's sample input".
///
/// The JSON must be an object; its keys become record fields.
pub fn parse_input(input: Option<&str>) -> Result<Option<Record>, Error> {
    let Some(raw) = input else {
        return Ok(None);
    };
    let value: serde_json::Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        return Err(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "--input must be a JSON object",
        )));
    }
    Ok(Some(Record::try_from(value)?))
}

/// Runs workflow `name` with config from env (and .env).
///
/// `input` is a JSON object; when `None` the workflow's sample input is used.
pub async fn run(name: &str, input: Option<&str>) -> Result<RunReport, Error> {
    run_with_options(name, input, &RunOptions::default()).await
}

/// Runs workflow `name` with config from env plus `options` overrides.
///
/// Loads `.env`, builds `RunConfig` from env, applies `options`, then runs. Interacts with
/// [`RunConfig::apply_options`](crate::RunConfig::apply_options) and
/// [`run_with_config`](run_with_config).
pub async fn run_with_options(
    name: &str,
    input: Option<&str>,
    options: &RunOptions,
) -> Result<RunReport, Error> {
    dotenv::dotenv().ok();
    let mut config = RunConfig::from_env()?;
    config.apply_options(options);
    let input = parse_input(input)?;
    run_with_config(&config, name, input).await
}
