//! Top-level argument definitions

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::cli::commands::classify::ClassifyArgs;
use crate::cli::commands::completions::CompletionsArgs;
use crate::cli::commands::graph::GraphArgs;
use crate::cli::commands::init::InitArgs;
use crate::cli::commands::report::ReportArgs;
use crate::cli::commands::run::RunArgs;
use crate::cli::commands::stage::StageCommands;

#[derive(Parser, Debug)]
#[command(name = "mfm")]
#[command(author, version, about = "Gate-to-gate material flow mapping for small manufacturing sites")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Auto)]
    pub output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug); MFM_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pick per command (text for people, json for graph)
    #[default]
    Auto,
    /// Human-readable tables
    Text,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a starter project with sample data
    Init(InitArgs),

    /// Compute the balance and show KPIs, flows and notes
    Run(RunArgs),

    /// Print the indexed flow graph for a Sankey renderer
    Graph(GraphArgs),

    /// Render the Markdown report
    Report(ReportArgs),

    /// Manage the process stage chain
    #[command(subcommand)]
    Stage(StageCommands),

    /// Suggest dataset kind and column mapping for CSV files
    Classify(ClassifyArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
