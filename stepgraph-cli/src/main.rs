//! stepgraph binary: list, run or diagram the bundled demo workflows.

use clap::{Parser, Subcommand};
use stepgraph_cli::{
    parse_input, run_with_config, stream_with_config, workflows, Error, Record, RunConfig,
    RunOptions, StreamEvent,
};
use tokio_stream::StreamExt;

#[derive(Parser, Debug)]
#[command(name = "stepgraph")]
#[command(about = "Run small state-graph workflows: named steps over a shared record")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the bundled workflows.
    List,
    /// Run a workflow and print the final record as JSON.
    Run {
        /// Workflow name (see `stepgraph list`).
        workflow: String,
        /// Initial record as a JSON object; defaults to the workflow's sample input.
        #[arg(short, long, value_name = "JSON")]
        input: Option<String>,
        /// Maximum number of executed steps (overrides STEPGRAPH_MAX_STEPS).
        #[arg(long, value_name = "N")]
        max_steps: Option<usize>,
        /// Print every step update and merged record while running.
        #[arg(long)]
        stream: bool,
        /// Log step enter/exit and executor debug events to stderr.
        #[arg(short, long)]
        verbose: bool,
    },
    /// Print a workflow as a Mermaid flowchart.
    Diagram {
        /// Workflow name (see `stepgraph list`).
        workflow: String,
    },
}

/// Initializes tracing to stderr. `RUST_LOG` wins; otherwise warnings only, or debug for
/// the stepgraph crates when `verbose`.
fn init_tracing(verbose: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            tracing_subscriber::EnvFilter::new("info,stepgraph=debug,stepgraph_cli=debug")
        } else {
            tracing_subscriber::EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_record(record: &Record) -> Result<(), Error> {
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}

async fn run(
    workflow: &str,
    input: Option<&str>,
    options: &RunOptions,
    config: RunConfig,
) -> Result<(), Error> {
    let mut config = config;
    config.apply_options(options);
    let input = parse_input(input)?;

    if !config.stream {
        let report = run_with_config(&config, workflow, input).await?;
        eprintln!("path: {} ({} steps)", report.path.join(" -> "), report.steps);
        return print_record(&report.record);
    }

    let mut events = stream_with_config(&config, workflow, input)?;
    while let Some(event) = events.next().await {
        match event {
            StreamEvent::Updates { step, update } => {
                println!("[update] {}: {}", step, serde_json::to_string(&update)?);
            }
            StreamEvent::Values(record) => {
                println!("[values] {}", serde_json::to_string(&record)?);
            }
            StreamEvent::Done(record) => return print_record(&record),
            StreamEvent::Failed(e) => return Err(e.into()),
        }
    }
    Err("stream closed without a final event".into())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    let config = RunConfig::from_env()?;

    match args.command {
        Command::List => {
            for w in workflows::all() {
                println!("{:<12} entry={:<11} {}", w.name, w.entry, w.description);
            }
        }
        Command::Diagram { workflow } => {
            let w = workflows::lookup(&workflow)?;
            print!("{}", w.compile()?.to_mermaid(Some(w.entry)));
        }
        Command::Run {
            workflow,
            input,
            max_steps,
            stream,
            verbose,
        } => {
            let options = RunOptions {
                max_steps,
                stream,
                verbose,
            };
            init_tracing(verbose || config.verbose);
            if let Err(e) = run(&workflow, input.as_deref(), &options, config).await {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
