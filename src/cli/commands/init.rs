//! `mfm init` command - Create a starter project with sample data

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use console::style;
use miette::{IntoDiagnostic, Result};
use rust_embed::Embed;
use tracing::info;

use crate::entities::bundle::DatasetKind;
use crate::entities::project::{Project, PROJECT_FILE};
use crate::entities::stage::{ProcessStage, StageChain};

#[derive(Embed)]
#[folder = "samples/"]
struct SampleData;

/// Directory (relative to the project file) holding the sample CSVs
const DATA_DIR: &str = "data";

/// Starter chain, drawn from the stage library
const STARTER_STAGES: &[&str] = &[
    "Material Intake",
    "Cutting",
    "Forming",
    "Welding / Joining",
    "Surface Treatment",
    "Assembly",
    "Packaging & Dispatch",
];

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing project file and sample data
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let root = args.path;
    let project_file = root.join(PROJECT_FILE);

    if project_file.exists() && !args.force {
        return Err(miette::miette!(
            help = "use --force to overwrite",
            "{} already exists",
            project_file.display()
        ));
    }

    let data_dir = root.join(DATA_DIR);
    std::fs::create_dir_all(&data_dir).into_diagnostic()?;

    let mut data = BTreeMap::new();
    for kind in DatasetKind::ALL {
        let file_name = format!("{}.csv", kind);
        write_sample(&file_name, &data_dir.join(&file_name))?;
        data.insert(kind, Path::new(DATA_DIR).join(&file_name));
    }

    let project = Project {
        stages: StageChain::from_stages(
            STARTER_STAGES
                .iter()
                .map(|name| ProcessStage::from_library(name))
                .collect(),
        ),
        data,
        ..Project::default()
    };
    project.save(&project_file)?;
    info!(path = %project_file.display(), "project initialized");

    println!(
        "{} Created {} with {} stages",
        style("✓").green(),
        style(project_file.display()).cyan(),
        project.stages.len()
    );
    println!(
        "{} Sample data written to {}",
        style("✓").green(),
        style(data_dir.display()).cyan()
    );
    println!();
    println!("Next: {}", style("mfm run").yellow());

    Ok(())
}

fn write_sample(name: &str, dest: &Path) -> Result<()> {
    let file = SampleData::get(name)
        .ok_or_else(|| miette::miette!("Missing embedded sample file {}", name))?;
    std::fs::write(dest, file.data.as_ref()).into_diagnostic()
}
