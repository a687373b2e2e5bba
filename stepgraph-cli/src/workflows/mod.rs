//! Bundled demo workflows.
//!
//! Each workflow builds an uncompiled [`StateGraph`] (so callers can attach middleware
//! before compiling), names its entry step and provides a sample input.

mod accumulate;
mod conditional;
mod errors;
mod grade;
mod linear;
mod loops;
mod parallel;
mod pipeline;

use stepgraph::{CompilationError, CompiledStateGraph, Record, StateGraph};

use crate::config::Error;

/// A named demo graph with its entry step.
pub struct Workflow {
    pub name: &'static str,
    pub description: &'static str,
    pub entry: &'static str,
    build: fn() -> Result<StateGraph, CompilationError>,
    sample_input: fn() -> Record,
}

impl Workflow {
    /// Registers steps and transitions; not yet compiled.
    pub fn graph(&self) -> Result<StateGraph, CompilationError> {
        (self.build)()
    }

    pub fn compile(&self) -> Result<CompiledStateGraph, CompilationError> {
        self.graph()?.compile()
    }

    /// Input used by `stepgraph run <name>` when `--input` is not given.
    pub fn sample_input(&self) -> Record {
        (self.sample_input)()
    }
}

static WORKFLOWS: [Workflow; 8] = [
    Workflow {
        name: "linear",
        description: "two steps in sequence updating message and count",
        entry: linear::ENTRY,
        build: linear::graph,
        sample_input: linear::sample_input,
    },
    Workflow {
        name: "parallel",
        description: "square, cube and double in parallel, then a summary",
        entry: parallel::ENTRY,
        build: parallel::graph,
        sample_input: parallel::sample_input,
    },
    Workflow {
        name: "conditional",
        description: "route a number to the negative, zero or positive handler",
        entry: conditional::ENTRY,
        build: conditional::graph,
        sample_input: conditional::sample_input,
    },
    Workflow {
        name: "accumulate",
        description: "three steps appending to a message list",
        entry: accumulate::ENTRY,
        build: accumulate::graph,
        sample_input: accumulate::sample_input,
    },
    Workflow {
        name: "loop",
        description: "increment a counter until max_iterations, collecting results",
        entry: loops::ENTRY,
        build: loops::graph,
        sample_input: loops::sample_input,
    },
    Workflow {
        name: "errors",
        description: "risky division routed to a success or error handler",
        entry: errors::ENTRY,
        build: errors::graph,
        sample_input: errors::sample_input,
    },
    Workflow {
        name: "pipeline",
        description: "load, clean and validate a CSV-ish line, then process or reject it",
        entry: pipeline::ENTRY,
        build: pipeline::graph,
        sample_input: pipeline::sample_input,
    },
    Workflow {
        name: "grade",
        description: "PASS when score >= 50, FAIL otherwise",
        entry: grade::ENTRY,
        build: grade::graph,
        sample_input: grade::sample_input,
    },
];

/// All bundled workflows, in listing order.
pub fn all() -> &'static [Workflow] {
    &WORKFLOWS
}

/// Looks up a workflow by name.
pub fn find(name: &str) -> Option<&'static Workflow> {
    WORKFLOWS.iter().find(|w| w.name == name)
}

/// Like [`find`], but an unknown name is an error listing the known workflows.
pub fn lookup(name: &str) -> Result<&'static Workflow, Error> {
    find(name).ok_or_else(|| {
        let known: Vec<&str> = WORKFLOWS.iter().map(|w| w.name).collect();
        Box::new(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("unknown workflow '{}' (known: {})", name, known.join(", ")),
        )) as Error
    })
}
