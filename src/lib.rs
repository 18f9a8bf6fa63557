//! MFM: gate-to-gate material flow mapping
//!
//! Estimates a mass and energy balance for a linear manufacturing process
//! chain from everyday business records (purchases, production counts,
//! energy bills, waste manifests), with what-if scenarios, circularity
//! indicators and a plain-text report.

pub mod assist;
pub mod cli;
pub mod core;
pub mod entities;
pub mod report;
pub mod yaml;
