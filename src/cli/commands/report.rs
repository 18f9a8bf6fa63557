//! `mfm report` command - Render the Markdown report

use std::path::PathBuf;

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::run::ScenarioArgs;
use crate::cli::helpers::{compute, load_project};
use crate::report::ReportGenerator;

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    /// Project file or directory (default: ./mfm.yaml)
    #[arg(env = "MFM_PROJECT")]
    pub project: Option<PathBuf>,

    /// Write the report to a file instead of stdout
    #[arg(short = 'o', long = "out", value_name = "FILE")]
    pub out: Option<PathBuf>,

    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

pub fn run(args: ReportArgs) -> Result<()> {
    let (path, project) = load_project(args.project.as_deref())?;
    let scenarios = args.scenario.apply(project.scenarios);
    let (model, result) = compute(&path, &project, scenarios)?;

    let generator = ReportGenerator::new().into_diagnostic()?;
    let report = generator
        .render(&model, &result, chrono::Utc::now())
        .into_diagnostic()?;

    match args.out {
        Some(out) => {
            std::fs::write(&out, report).into_diagnostic()?;
            println!(
                "{} Wrote report to {}",
                style("✓").green(),
                style(out.display()).cyan()
            );
        }
        None => print!("{}", report),
    }
    Ok(())
}
