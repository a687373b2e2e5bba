//! Outgoing transition rules and their destinations.
//!
//! Every step has exactly one rule: a direct edge, a conditional edge (selector + route
//! table) or a parallel fan-out.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::record::Record;

/// Terminal marker: use as destination to end the run (`add_edge("last", END)`).
pub const END: &str = "__end__";

/// Where execution goes after a step.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Destination {
    /// Run the named step next.
    Step(String),
    /// Stop and return the record.
    End,
}

impl Destination {
    pub fn step(name: impl Into<String>) -> Self {
        Self::Step(name.into())
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }

    pub fn step_name(&self) -> Option<&str> {
        match self {
            Self::Step(name) => Some(name),
            Self::End => None,
        }
    }
}

impl From<&str> for Destination {
    fn from(s: &str) -> Self {
        if s == END {
            Self::End
        } else {
            Self::Step(s.to_string())
        }
    }
}

impl From<String> for Destination {
    fn from(s: String) -> Self {
        if s == END {
            Self::End
        } else {
            Self::Step(s)
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Step(name) => f.write_str(name),
            Self::End => f.write_str(END),
        }
    }
}

/// Routing function of a conditional edge: computes the route key from the record.
pub type Selector = Arc<dyn Fn(&Record) -> String + Send + Sync>;

/// The single outgoing rule of a step.
#[derive(Clone)]
pub enum Transition {
    /// Unconditional edge.
    Direct(Destination),
    /// Selector-keyed edge; keys missing from `routes` fail the run.
    Conditional {
        selector: Selector,
        routes: BTreeMap<String, Destination>,
    },
    /// Fan-out: the branches run against the same record snapshot, then execution
    /// continues at their common direct destination.
    Parallel(Vec<String>),
}

impl Transition {
    /// Every destination this rule can lead to, in a stable order.
    pub fn destinations(&self) -> Vec<Destination> {
        match self {
            Self::Direct(dest) => vec![dest.clone()],
            Self::Conditional { routes, .. } => routes.values().cloned().collect(),
            Self::Parallel(branches) => branches.iter().cloned().map(Destination::Step).collect(),
        }
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(dest) => f.debug_tuple("Direct").field(dest).finish(),
            Self::Conditional { routes, .. } => f
                .debug_struct("Conditional")
                .field("routes", routes)
                .finish(),
            Self::Parallel(branches) => f.debug_tuple("Parallel").field(branches).finish(),
        }
    }
}
