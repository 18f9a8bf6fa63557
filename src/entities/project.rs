//! Project file and flow model
//!
//! A project (`mfm.yaml`) names the site and its gate boundaries, lists the
//! stage chain, points at one CSV per dataset and stores scenario defaults.
//! The immutable [`FlowModel`] snapshot built from it is what the balance
//! engine consumes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::scenario::{ScenarioError, ScenarioParameters};
use crate::entities::bundle::DatasetKind;
use crate::entities::stage::{ProcessStage, StageChain, StageError};
use crate::yaml::{parse_yaml_file, write_yaml_file, YamlError};

/// Default project file name
pub const PROJECT_FILE: &str = "mfm.yaml";

pub const DEFAULT_SITE_NAME: &str = "SME Metal Fab Site";
pub const DEFAULT_BOUNDARY_START: &str = "Goods In (Raw Material)";
pub const DEFAULT_BOUNDARY_END: &str = "Dispatch (Finished Goods)";

/// Reporting period covered by the data (informational)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum TimePeriod {
    #[default]
    Quarter,
    Month,
}

impl std::fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimePeriod::Quarter => write!(f, "Quarter"),
            TimePeriod::Month => write!(f, "Month"),
        }
    }
}

fn default_site_name() -> String {
    DEFAULT_SITE_NAME.to_string()
}

fn default_boundary_start() -> String {
    DEFAULT_BOUNDARY_START.to_string()
}

fn default_boundary_end() -> String {
    DEFAULT_BOUNDARY_END.to_string()
}

/// Immutable snapshot of everything but the data tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowModel {
    pub site_name: String,
    pub boundary_start: String,
    pub boundary_end: String,
    pub time_period: TimePeriod,
    pub stages: Vec<ProcessStage>,
    pub scenarios: ScenarioParameters,
}

impl FlowModel {
    /// Model with default site and boundary labels
    pub fn new(stages: Vec<ProcessStage>, scenarios: ScenarioParameters) -> Self {
        Self {
            site_name: default_site_name(),
            boundary_start: default_boundary_start(),
            boundary_end: default_boundary_end(),
            time_period: TimePeriod::default(),
            stages,
            scenarios,
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ProjectError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlError),

    #[error("Invalid stage chain: {0}")]
    Stage(#[from] StageError),

    #[error("Invalid scenario: {0}")]
    Scenario(#[from] ScenarioError),
}

/// On-disk project description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default = "default_site_name")]
    pub site_name: String,

    #[serde(default = "default_boundary_start")]
    pub boundary_start: String,

    #[serde(default = "default_boundary_end")]
    pub boundary_end: String,

    #[serde(default)]
    pub time_period: TimePeriod,

    #[serde(default)]
    pub stages: StageChain,

    /// CSV path per dataset, relative to the project file
    #[serde(default)]
    pub data: BTreeMap<DatasetKind, PathBuf>,

    #[serde(default)]
    pub scenarios: ScenarioParameters,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            site_name: default_site_name(),
            boundary_start: default_boundary_start(),
            boundary_end: default_boundary_end(),
            time_period: TimePeriod::default(),
            stages: StageChain::new(),
            data: BTreeMap::new(),
            scenarios: ScenarioParameters::default(),
        }
    }
}

impl Project {
    /// Load and validate a project file
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let project: Project = parse_yaml_file(path)?;
        project.validate()?;
        Ok(project)
    }

    pub fn validate(&self) -> Result<(), ProjectError> {
        self.stages.validate()?;
        self.scenarios.validate()?;
        Ok(())
    }

    /// Write the project back as YAML
    pub fn save(&self, path: &Path) -> Result<(), ProjectError> {
        write_yaml_file(path, self)?;
        Ok(())
    }

    /// Dataset paths resolved against the directory holding the project file
    pub fn data_paths(&self, project_file: &Path) -> BTreeMap<DatasetKind, PathBuf> {
        let base = project_file.parent().unwrap_or_else(|| Path::new("."));
        self.data
            .iter()
            .map(|(kind, rel)| {
                let full = if rel.is_absolute() {
                    rel.clone()
                } else {
                    base.join(rel)
                };
                (*kind, full)
            })
            .collect()
    }

    /// Snapshot for one computation, with scenario overrides applied
    pub fn flow_model(&self, scenarios: ScenarioParameters) -> FlowModel {
        FlowModel {
            site_name: self.site_name.clone(),
            boundary_start: self.boundary_start.clone(),
            boundary_end: self.boundary_end.clone(),
            time_period: self.time_period,
            stages: self.stages.stages().to_vec(),
            scenarios,
        }
    }
}
