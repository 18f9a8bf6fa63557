//! Entity type definitions

pub mod bundle;
pub mod project;
pub mod stage;

pub use bundle::{DataBundle, DatasetKind};
pub use project::{FlowModel, Project, ProjectError, TimePeriod};
pub use stage::{ProcessStage, StageChain, StageError, StageType, ThroughputUnit};
