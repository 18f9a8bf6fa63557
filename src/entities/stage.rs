//! Process stage entity - one block in the linear gate-to-gate chain

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assist::suggest_process_type;

/// Lowest accepted stage yield (%)
pub const MIN_YIELD_PCT: u8 = 60;

/// Highest accepted stage yield (%)
pub const MAX_YIELD_PCT: u8 = 100;

/// Yield given to newly added stages (%)
pub const DEFAULT_YIELD_PCT: u8 = 92;

/// Primary material given to newly added stages
pub const DEFAULT_PRIMARY_MATERIAL: &str = "Mild steel sheet 2mm";

/// Generic process block library, in typical chain order
pub const STAGE_LIBRARY: &[&str] = &[
    "Material Intake",
    "Preparation",
    "Cutting",
    "Forming",
    "Welding / Joining",
    "Thermal Processing",
    "Surface Treatment",
    "Assembly",
    "Inspection",
    "Packaging & Dispatch",
    "Storage",
];

/// Process classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum StageType {
    Intake,
    Prep,
    Cutting,
    Forming,
    Joining,
    Thermal,
    Surface,
    Assembly,
    Inspection,
    Packaging,
    Storage,
    #[default]
    Other,
}

impl StageType {
    pub const ALL: [StageType; 12] = [
        StageType::Intake,
        StageType::Prep,
        StageType::Cutting,
        StageType::Forming,
        StageType::Joining,
        StageType::Thermal,
        StageType::Surface,
        StageType::Assembly,
        StageType::Inspection,
        StageType::Packaging,
        StageType::Storage,
        StageType::Other,
    ];

    /// Stage types treated as the dominant source of unrecorded material loss
    pub fn is_loss_prone(&self) -> bool {
        matches!(self, StageType::Cutting | StageType::Forming)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StageType::Intake => "intake",
            StageType::Prep => "prep",
            StageType::Cutting => "cutting",
            StageType::Forming => "forming",
            StageType::Joining => "joining",
            StageType::Thermal => "thermal",
            StageType::Surface => "surface",
            StageType::Assembly => "assembly",
            StageType::Inspection => "inspection",
            StageType::Packaging => "packaging",
            StageType::Storage => "storage",
            StageType::Other => "other",
        }
    }
}

impl std::fmt::Display for StageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        StageType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| {
                format!(
                    "Invalid stage type: {}. Use one of: {}",
                    s,
                    StageType::ALL.map(|t| t.as_str()).join(", ")
                )
            })
    }
}

/// Unit in which a stage's throughput is counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum ThroughputUnit {
    #[default]
    Kg,
    Pcs,
    M2,
}

impl std::fmt::Display for ThroughputUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThroughputUnit::Kg => write!(f, "kg"),
            ThroughputUnit::Pcs => write!(f, "pcs"),
            ThroughputUnit::M2 => write!(f, "m2"),
        }
    }
}

fn default_yield_pct() -> u8 {
    DEFAULT_YIELD_PCT
}

fn default_primary_material() -> String {
    DEFAULT_PRIMARY_MATERIAL.to_string()
}

/// One process block in the chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessStage {
    /// Display label (user editable, usually unique)
    pub label: String,

    /// Process classification
    #[serde(rename = "type", default)]
    pub stage_type: StageType,

    /// Estimated yield (%), also the activity weight for energy allocation
    #[serde(default = "default_yield_pct")]
    pub yield_pct: u8,

    /// Primary input material (free text)
    #[serde(default = "default_primary_material")]
    pub primary_material: String,

    /// Throughput unit
    #[serde(default)]
    pub throughput_unit: ThroughputUnit,
}

impl ProcessStage {
    pub fn new(label: impl Into<String>, stage_type: StageType) -> Self {
        Self {
            label: label.into(),
            stage_type,
            yield_pct: DEFAULT_YIELD_PCT,
            primary_material: DEFAULT_PRIMARY_MATERIAL.to_string(),
            throughput_unit: ThroughputUnit::Kg,
        }
    }

    /// Create a stage from a library block name, suggesting its type
    pub fn from_library(name: &str) -> Self {
        Self::new(name, suggest_process_type(name))
    }

    pub fn with_yield(mut self, yield_pct: u8) -> Self {
        self.yield_pct = yield_pct;
        self
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum StageError {
    #[error("Stage {index} ('{label}') yield must be between 60 and 100%, got {value}")]
    YieldOutOfRange {
        index: usize,
        label: String,
        value: u8,
    },

    #[error("Stage {index} ('{label}') has an empty label")]
    EmptyLabel { index: usize, label: String },

    #[error("No stage at position {position} (chain has {len} stage(s))")]
    NoSuchStage { position: usize, len: usize },

    #[error("Stage chain is already empty")]
    AlreadyEmpty,
}

/// Ordered, linear stage sequence
///
/// Stages are appended at the tail, edited in place by position, and removed
/// only by truncating the tail. There is no reordering or arbitrary removal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageChain {
    stages: Vec<ProcessStage>,
}

impl StageChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_stages(stages: Vec<ProcessStage>) -> Self {
        Self { stages }
    }

    /// Append a stage at the end of the chain
    pub fn push(&mut self, stage: ProcessStage) {
        self.stages.push(stage);
    }

    /// Remove and return the last stage
    pub fn truncate_last(&mut self) -> Result<ProcessStage, StageError> {
        self.stages.pop().ok_or(StageError::AlreadyEmpty)
    }

    /// Mutable access by zero-based position
    pub fn get_mut(&mut self, index: usize) -> Result<&mut ProcessStage, StageError> {
        let len = self.stages.len();
        self.stages
            .get_mut(index)
            .ok_or(StageError::NoSuchStage {
                position: index + 1,
                len,
            })
    }

    pub fn stages(&self) -> &[ProcessStage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Check labels and yield ranges; positions in errors are one-based
    pub fn validate(&self) -> Result<(), StageError> {
        for (i, stage) in self.stages.iter().enumerate() {
            if stage.label.trim().is_empty() {
                return Err(StageError::EmptyLabel {
                    index: i + 1,
                    label: stage.label.clone(),
                });
            }
            if !(MIN_YIELD_PCT..=MAX_YIELD_PCT).contains(&stage.yield_pct) {
                return Err(StageError::YieldOutOfRange {
                    index: i + 1,
                    label: stage.label.clone(),
                    value: stage.yield_pct,
                });
            }
        }
        Ok(())
    }
}
