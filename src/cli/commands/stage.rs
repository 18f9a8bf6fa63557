//! `mfm stage` command - Manage the process stage chain
//!
//! The chain only grows at the tail, is edited in place by position and
//! shrinks by dropping the tail.

use std::path::PathBuf;

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::assist::suggest_process_type;
use crate::cli::helpers::load_project;
use crate::cli::output::{effective_format, print_structured};
use crate::cli::GlobalOpts;
use crate::entities::stage::{
    ProcessStage, StageError, StageType, ThroughputUnit, MAX_YIELD_PCT, MIN_YIELD_PCT,
    STAGE_LIBRARY,
};

#[derive(Subcommand, Debug)]
pub enum StageCommands {
    /// List the stages of the chain
    List(ProjectArg),

    /// Show the generic process block library
    Library,

    /// Append a stage at the end of the chain
    Add(AddArgs),

    /// Edit a stage in place
    Edit(EditArgs),

    /// Remove the last stage
    Pop(ProjectArg),
}

#[derive(clap::Args, Debug)]
pub struct ProjectArg {
    /// Project file or directory (default: ./mfm.yaml)
    #[arg(env = "MFM_PROJECT")]
    pub project: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Stage label, usually a library block name
    pub name: String,

    /// Project file or directory (default: ./mfm.yaml)
    #[arg(env = "MFM_PROJECT")]
    pub project: Option<PathBuf>,

    /// Process type (suggested from the label when omitted)
    #[arg(long = "type", short = 't', value_enum)]
    pub stage_type: Option<StageType>,

    /// Estimated yield (%)
    #[arg(long = "yield", value_parser = yield_parser())]
    pub yield_pct: Option<u8>,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Stage position (1-based)
    pub position: usize,

    /// Project file or directory (default: ./mfm.yaml)
    #[arg(env = "MFM_PROJECT")]
    pub project: Option<PathBuf>,

    /// New label
    #[arg(long)]
    pub label: Option<String>,

    /// New process type
    #[arg(long = "type", short = 't', value_enum)]
    pub stage_type: Option<StageType>,

    /// New estimated yield (%)
    #[arg(long = "yield", value_parser = yield_parser())]
    pub yield_pct: Option<u8>,

    /// New primary material
    #[arg(long)]
    pub material: Option<String>,

    /// New throughput unit
    #[arg(long, value_enum)]
    pub unit: Option<ThroughputUnit>,
}

fn yield_parser() -> clap::builder::RangedI64ValueParser<u8> {
    clap::value_parser!(u8).range(i64::from(MIN_YIELD_PCT)..=i64::from(MAX_YIELD_PCT))
}

#[derive(Tabled)]
struct StageRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Type")]
    stage_type: StageType,
    #[tabled(rename = "Yield %")]
    yield_pct: u8,
    #[tabled(rename = "Material")]
    material: String,
    #[tabled(rename = "Unit")]
    unit: ThroughputUnit,
}

#[derive(Serialize)]
struct LibraryEntry {
    name: &'static str,
    suggested_type: StageType,
}

/// Run the stage command
pub fn run(cmd: StageCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        StageCommands::List(args) => run_list(args, global),
        StageCommands::Library => run_library(global),
        StageCommands::Add(args) => run_add(args),
        StageCommands::Edit(args) => run_edit(args),
        StageCommands::Pop(args) => run_pop(args),
    }
}

fn run_list(args: ProjectArg, global: &GlobalOpts) -> Result<()> {
    let (_, project) = load_project(args.project.as_deref())?;
    let stages = project.stages.stages();

    let format = effective_format(global.output, false);
    if print_structured(&stages, format)? {
        return Ok(());
    }

    if stages.is_empty() {
        println!("No stages in chain.");
        println!();
        println!("Add one with: {}", style("mfm stage add \"Material Intake\"").yellow());
        return Ok(());
    }

    let rows = stages.iter().enumerate().map(|(i, s)| StageRow {
        position: i + 1,
        label: s.label.clone(),
        stage_type: s.stage_type,
        yield_pct: s.yield_pct,
        material: s.primary_material.clone(),
        unit: s.throughput_unit,
    });
    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}

fn run_library(global: &GlobalOpts) -> Result<()> {
    let entries: Vec<LibraryEntry> = STAGE_LIBRARY
        .iter()
        .map(|&name| LibraryEntry {
            name,
            suggested_type: suggest_process_type(name),
        })
        .collect();

    let format = effective_format(global.output, false);
    if print_structured(&entries, format)? {
        return Ok(());
    }

    for e in &entries {
        println!("  {:<24} {}", e.name, style(e.suggested_type).dim());
    }
    Ok(())
}

fn run_add(args: AddArgs) -> Result<()> {
    let (path, mut project) = load_project(args.project.as_deref())?;

    let mut stage = ProcessStage::from_library(&args.name);
    if let Some(t) = args.stage_type {
        stage.stage_type = t;
    }
    if let Some(y) = args.yield_pct {
        stage = stage.with_yield(y);
    }

    let summary = format!("{} ({})", stage.label, stage.stage_type);
    project.stages.push(stage);
    project.validate()?;
    project.save(&path)?;

    println!(
        "{} Added stage {} at position {}",
        style("✓").green(),
        style(summary).cyan(),
        project.stages.len()
    );
    Ok(())
}

fn run_edit(args: EditArgs) -> Result<()> {
    let (path, mut project) = load_project(args.project.as_deref())?;

    let len = project.stages.len();
    let index = args
        .position
        .checked_sub(1)
        .ok_or(StageError::NoSuchStage { position: 0, len })
        .into_diagnostic()?;
    let stage = project.stages.get_mut(index).into_diagnostic()?;

    if let Some(label) = args.label {
        stage.label = label;
    }
    if let Some(t) = args.stage_type {
        stage.stage_type = t;
    }
    if let Some(y) = args.yield_pct {
        stage.yield_pct = y;
    }
    if let Some(m) = args.material {
        stage.primary_material = m;
    }
    if let Some(u) = args.unit {
        stage.throughput_unit = u;
    }
    let label = stage.label.clone();

    project.validate()?;
    project.save(&path)?;

    println!(
        "{} Updated stage {} ({})",
        style("✓").green(),
        args.position,
        style(label).cyan()
    );
    Ok(())
}

fn run_pop(args: ProjectArg) -> Result<()> {
    let (path, mut project) = load_project(args.project.as_deref())?;
    let removed = project.stages.truncate_last().into_diagnostic()?;
    project.save(&path)?;

    println!(
        "{} Removed stage {} ({} left)",
        style("✓").green(),
        style(&removed.label).cyan(),
        project.stages.len()
    );
    Ok(())
}
