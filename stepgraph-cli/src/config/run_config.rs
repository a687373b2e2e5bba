//! Run config: step bound, streaming, verbosity. Can be filled from env / .env.
//!
//! Interacts with [`RunOptions`](super::RunOptions) and
//! [`run_with_config`](crate::run_with_config).

use super::RunOptions;

/// Error type used for config loading and runs.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Step bound used when `STEPGRAPH_MAX_STEPS` is not set.
pub const DEFAULT_MAX_STEPS: usize = 25;

/// Run config: step bound, streaming, verbosity. Can be filled from env / .env.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    /// Maximum number of executed steps per run.
    pub max_steps: usize,
    /// When true, print stream events as they happen.
    pub stream: bool,
    /// When true, attach step logging middleware and show debug logs.
    pub verbose: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            stream: false,
            verbose: false,
        }
    }
}

impl RunConfig {
    /// Apply optional overrides from `RunOptions` to this config.
    ///
    /// `max_steps` overrides when set; `stream` and `verbose` only switch on.
    pub fn apply_options(&mut self, options: &RunOptions) {
        if let Some(n) = options.max_steps {
            self.max_steps = n;
        }
        if options.stream {
            self.stream = true;
        }
        if options.verbose {
            self.verbose = true;
        }
    }

    /// Fill config from env vars (and .env). Call `dotenv::dotenv().ok()` first or use
    /// [`run`](crate::run), which does.
    ///
    /// `STEPGRAPH_MAX_STEPS` (positive integer, default 25), `STEPGRAPH_STREAM` and
    /// `STEPGRAPH_VERBOSE` (true/false, 1/0, yes/no, on/off) are optional. A value that
    /// does not parse is an error naming the variable.
    pub fn from_env() -> Result<Self, Error> {
        let max_steps = match std::env::var("STEPGRAPH_MAX_STEPS") {
            Ok(raw) => parse_max_steps(&raw)?,
            Err(_) => DEFAULT_MAX_STEPS,
        };
        let stream = env_flag("STEPGRAPH_STREAM")?;
        let verbose = env_flag("STEPGRAPH_VERBOSE")?;
        Ok(Self {
            max_steps,
            stream,
            verbose,
        })
    }
}

fn parse_max_steps(raw: &str) -> Result<usize, Error> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(invalid("STEPGRAPH_MAX_STEPS", raw, "a positive integer")),
    }
}

fn env_flag(name: &str) -> Result<bool, Error> {
    let Ok(raw) = std::env::var(name) else {
        return Ok(false);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(invalid(name, &raw, "true or false")),
    }
}

fn invalid(name: &str, raw: &str, expected: &str) -> Error {
    Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        format!("{} must be {}, got '{}'", name, expected, raw),
    ))
}
