//! CLI command implementations

pub mod classify;
pub mod completions;
pub mod graph;
pub mod init;
pub mod report;
pub mod run;
pub mod stage;
