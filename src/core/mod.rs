//! Core module - the balance engine and its building blocks

pub mod balance;
pub mod circularity;
pub mod extract;
pub mod flow_graph;
pub mod kpi;
pub mod loader;
pub mod notes;
pub mod scenario;
pub mod table;

pub use balance::{
    compute_balance, BalanceError, BalanceResult, EdgeKind, EnergyAllocationRow, FlowEdge,
    StageLoss,
};
pub use extract::{EnergyTotals, WasteTypeRow};
pub use flow_graph::FlowGraph;
pub use loader::{load_bundle, load_csv, LoadError};
pub use notes::Notes;
pub use scenario::{ScenarioError, ScenarioParameters, ASSUMED_UNIT_MASS_KG};
pub use table::{resolve_column, Cell, NamedTable};
