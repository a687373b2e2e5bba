//! Mermaid flowchart rendering of a compiled graph.

use std::fmt::Write;

use super::{CompiledStateGraph, Destination, Transition};

fn node_id(dest: &Destination) -> &str {
    match dest {
        Destination::End => "End",
        Destination::Step(name) => name,
    }
}

impl CompiledStateGraph {
    /// Generates a Mermaid flowchart of the graph.
    ///
    /// Steps and edges are listed in name order so the output is stable. Direct edges
    /// render as `a --> b`, conditional routes as `a -->|key| b`, fan-out branches as
    /// `a ==> b`. `entry` adds a `Start` marker pointing at that step.
    ///
    /// Paste the output into a ```` ```mermaid ```` block or <https://mermaid.live>.
    #[must_use]
    pub fn to_mermaid(&self, entry: Option<&str>) -> String {
        let mut diagram = String::from("flowchart TD\n");

        if let Some(entry) = entry {
            let _ = writeln!(diagram, "    Start([Start]) --> {entry}");
        }

        let names = self.step_names();
        for name in &names {
            let _ = writeln!(diagram, "    {name}[{name}]");
        }

        let reaches_end = self
            .transitions
            .values()
            .any(|t| t.destinations().iter().any(Destination::is_end));
        if reaches_end {
            diagram.push_str("    End([End])\n");
        }

        for name in &names {
            let Some(transition) = self.transitions.get(*name) else {
                continue;
            };
            match transition {
                Transition::Direct(dest) => {
                    let _ = writeln!(diagram, "    {name} --> {}", node_id(dest));
                }
                Transition::Conditional { routes, .. } => {
                    for (key, dest) in routes {
                        let _ = writeln!(diagram, "    {name} -->|{key}| {}", node_id(dest));
                    }
                }
                Transition::Parallel(branches) => {
                    for branch in branches {
                        let _ = writeln!(diagram, "    {name} ==> {branch}");
                    }
                }
            }
        }

        diagram
    }
}
