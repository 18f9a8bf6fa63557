//! `mfm graph` command - Print the indexed flow graph

use std::path::PathBuf;

use console::style;
use miette::Result;

use crate::cli::commands::run::ScenarioArgs;
use crate::cli::helpers::{compute, load_project};
use crate::cli::output::{effective_format, print_structured};
use crate::cli::GlobalOpts;
use crate::core::flow_graph::FlowGraph;
use crate::core::notes::format_thousands;

#[derive(clap::Args, Debug)]
pub struct GraphArgs {
    /// Project file or directory (default: ./mfm.yaml)
    #[arg(env = "MFM_PROJECT")]
    pub project: Option<PathBuf>,

    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

pub fn run(args: GraphArgs, global: &GlobalOpts) -> Result<()> {
    let (path, project) = load_project(args.project.as_deref())?;
    let scenarios = args.scenario.apply(project.scenarios);
    let (_, result) = compute(&path, &project, scenarios)?;
    let graph = FlowGraph::from_edges(&result.flows);

    let format = effective_format(global.output, true);
    if print_structured(&graph, format)? {
        return Ok(());
    }

    println!("{}", style("Nodes").bold());
    for (i, label) in graph.labels.iter().enumerate() {
        println!("  {:>2}  {}", i, label);
    }
    println!();
    println!("{}", style("Links").bold());
    for ((s, t), v) in graph.sources.iter().zip(&graph.targets).zip(&graph.values) {
        println!("  {:>2} → {:<2}  {} kg", s, t, format_thousands(*v));
    }
    Ok(())
}
