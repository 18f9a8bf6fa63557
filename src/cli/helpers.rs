//! Shared helper functions for CLI commands
//!
//! Project discovery and the load → compute pipeline used by every command
//! that reads a project.

use std::path::{Path, PathBuf};

use miette::{IntoDiagnostic, Result};
use tracing::debug;

use crate::core::balance::{compute_balance, BalanceResult};
use crate::core::loader::load_bundle;
use crate::core::scenario::ScenarioParameters;
use crate::entities::project::{FlowModel, Project, PROJECT_FILE};

/// Resolve the project file from an optional argument
///
/// A directory argument means the project file inside it; no argument
/// means `./mfm.yaml`.
pub fn project_path(arg: Option<&Path>) -> PathBuf {
    match arg {
        Some(p) if p.is_dir() => p.join(PROJECT_FILE),
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(PROJECT_FILE),
    }
}

/// Locate and load a project
pub fn load_project(arg: Option<&Path>) -> Result<(PathBuf, Project)> {
    let path = project_path(arg);
    if !path.exists() {
        return Err(miette::miette!(
            help = "run `mfm init` or pass a project path (or set MFM_PROJECT)",
            "No project file at {}",
            path.display()
        ));
    }
    debug!(path = %path.display(), "loading project");
    let project = Project::load(&path)?;
    Ok((path, project))
}

/// Load the project's data and compute one balance
pub fn compute(
    path: &Path,
    project: &Project,
    scenarios: ScenarioParameters,
) -> Result<(FlowModel, BalanceResult)> {
    scenarios.validate().into_diagnostic()?;
    let bundle = load_bundle(&project.data_paths(path))?;
    let model = project.flow_model(scenarios);
    let result = compute_balance(&model, &bundle).into_diagnostic()?;
    Ok((model, result))
}
