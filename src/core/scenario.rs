//! What-if scenario parameters and transforms
//!
//! Each transform is a multiplicative scaling of one disjoint quantity, so
//! the order in which they are applied does not matter.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::notes::Notes;

/// Mass of one produced unit, used to convert production counts to kg
pub const ASSUMED_UNIT_MASS_KG: f64 = 15.0;

/// Upper bound of the scrap/waste reduction scenario (%)
pub const MAX_SCRAP_REDUCTION_PCT: f64 = 30.0;

/// Upper bound of the yield improvement scenario (%)
pub const MAX_YIELD_IMPROVE_PCT: f64 = 15.0;

/// Upper bound of the energy intensity improvement scenario (%)
pub const MAX_ENERGY_IMPROVE_PCT: f64 = 20.0;

#[derive(Debug, Error, PartialEq)]
pub enum ScenarioError {
    #[error("{name} must be between 0 and {max}%, got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        max: f64,
    },
}

/// Scenario inputs; all zero/false means "baseline"
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioParameters {
    /// Scrap/waste reduction, 0-30 %
    pub scrap_reduction_pct: f64,

    /// Yield improvement, 0-15 %
    pub yield_improve_pct: f64,

    /// Energy intensity improvement, 0-20 %
    pub energy_intensity_improve_pct: f64,

    /// Allocate site energy to stages using the yield proxy
    pub allocate_energy: bool,
}

impl ScenarioParameters {
    /// Check every percentage against its allowed range
    pub fn validate(&self) -> Result<(), ScenarioError> {
        check_range("scrap_reduction_pct", self.scrap_reduction_pct, MAX_SCRAP_REDUCTION_PCT)?;
        check_range("yield_improve_pct", self.yield_improve_pct, MAX_YIELD_IMPROVE_PCT)?;
        check_range(
            "energy_intensity_improve_pct",
            self.energy_intensity_improve_pct,
            MAX_ENERGY_IMPROVE_PCT,
        )
    }

    /// True when no transform changes any quantity
    pub fn is_baseline(&self) -> bool {
        self.scrap_reduction_pct == 0.0
            && self.yield_improve_pct == 0.0
            && self.energy_intensity_improve_pct == 0.0
            && !self.allocate_energy
    }
}

fn check_range(name: &'static str, value: f64, max: f64) -> Result<(), ScenarioError> {
    if value.is_finite() && (0.0..=max).contains(&value) {
        Ok(())
    } else {
        Err(ScenarioError::OutOfRange { name, value, max })
    }
}

/// Scale recorded waste by the scrap reduction scenario
pub fn reduce_waste(waste_kg: f64, scrap_reduction_pct: f64) -> f64 {
    waste_kg * (1.0 - scrap_reduction_pct / 100.0)
}

/// Convert a unit count to product mass and apply the yield scenario
pub fn improve_yield(units: f64, unit_mass_kg: f64, yield_improve_pct: f64) -> f64 {
    units * unit_mass_kg * (1.0 + yield_improve_pct / 100.0)
}

/// Scale an energy total by the intensity improvement scenario
pub fn improve_energy(kwh: f64, energy_intensity_improve_pct: f64) -> f64 {
    kwh * (1.0 - energy_intensity_improve_pct / 100.0)
}

/// Highlight for the waste scenario, only when it changes anything
pub(crate) fn note_waste_scenario(params: &ScenarioParameters, notes: &mut Notes) {
    if params.scrap_reduction_pct > 0.0 {
        notes.highlight(format!(
            "Scenario applied: scrap/waste reduced by {:.0}%.",
            params.scrap_reduction_pct
        ));
    }
}

pub(crate) fn note_yield_scenario(params: &ScenarioParameters, notes: &mut Notes) {
    if params.yield_improve_pct > 0.0 {
        notes.highlight(format!(
            "Scenario applied: yield improved by {:.0}% (proxy increases product output).",
            params.yield_improve_pct
        ));
    }
}

pub(crate) fn note_energy_scenario(params: &ScenarioParameters, notes: &mut Notes) {
    if params.energy_intensity_improve_pct > 0.0 {
        notes.highlight(format!(
            "Scenario applied: energy intensity improved by {:.0}% (reduces site kWh).",
            params.energy_intensity_improve_pct
        ));
    }
}
