//! Mass and energy balance reconciliation
//!
//! Combines the extracted aggregates and the scenario transforms into one
//! immutable [`BalanceResult`]:
//!
//! 1. material in, waste and production are extracted from the bundle
//! 2. production units are converted to mass and the yield scenario applied
//! 3. the scrap reduction scenario is applied to waste
//! 4. the non-negative residual becomes the unaccounted loss
//! 5. the loss is split across cutting/forming stages (or the first stage)
//! 6. flow edges are laid out boundary → stages → boundary, plus waste and
//!    inferred-loss edges
//! 7. energy totals are scaled and optionally allocated to stages
//!
//! Every call recomputes everything from its inputs.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::circularity::{self, Diversion};
use crate::core::extract::{self, EnergyTotals, WasteTypeRow};
use crate::core::kpi;
use crate::core::notes::{format_thousands, Notes};
use crate::core::scenario::{self, ScenarioParameters, ASSUMED_UNIT_MASS_KG};
use crate::entities::bundle::{DataBundle, DatasetKind};
use crate::entities::project::FlowModel;
use crate::entities::stage::ProcessStage;

/// Source label of the aggregate waste edge
pub const ALL_PROCESSES_LABEL: &str = "All processes";

/// Target label of the aggregate waste edge
pub const WASTE_STREAMS_LABEL: &str = "Waste streams";

/// Target label of the inferred loss edges
pub const PROCESS_LOSSES_LABEL: &str = "Process losses (unaccounted)";

/// Loss split when two or more stages are candidates; later ones get nothing
const LOSS_SPLIT: [f64; 2] = [0.6, 0.4];

#[derive(Debug, Error, PartialEq)]
pub enum BalanceError {
    #[error("The process chain is empty; add at least one stage before computing a balance")]
    EmptyChain,
}

/// What a flow edge represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    MaterialIn,
    ThroughputProxy,
    ProductOut,
    WasteOut,
    LossInferred,
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeKind::MaterialIn => write!(f, "material_in"),
            EdgeKind::ThroughputProxy => write!(f, "throughput_proxy"),
            EdgeKind::ProductOut => write!(f, "product_out"),
            EdgeKind::WasteOut => write!(f, "waste_out"),
            EdgeKind::LossInferred => write!(f, "loss_inferred"),
        }
    }
}

/// One directed mass flow in kg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub from: String,
    pub to: String,
    pub kg: f64,
    pub kind: EdgeKind,
}

impl FlowEdge {
    fn new(from: &str, to: &str, kg: f64, kind: EdgeKind) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            kg,
            kind,
        }
    }
}

/// Unaccounted mass attributed to one stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageLoss {
    /// Position of the stage in the chain, 0-based
    pub stage_index: usize,
    pub label: String,
    pub kg: f64,
}

/// Site energy apportioned to one stage, whole kWh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyAllocationRow {
    pub process: String,
    pub electricity_kwh: i64,
    pub gas_kwh: i64,
}

/// Reconciled balance snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceResult {
    pub material_in_kg: f64,
    pub prod_out_kg: f64,
    pub waste_out_kg: f64,
    pub unaccounted_kg: f64,
    pub material_eff_pct: f64,
    pub waste_intensity: f64,
    pub energy_elec_kwh: f64,
    pub energy_gas_kwh: f64,
    pub energy_intensity_kwh_per_kg: f64,
    pub energy_allocation: Option<Vec<EnergyAllocationRow>>,
    pub waste_by_type: Vec<WasteTypeRow>,
    pub diversion_pct: f64,
    pub diverted_kg: f64,
    pub opportunities: Vec<String>,
    pub highlights: Vec<String>,
    pub assumptions: Vec<String>,
    pub flows: Vec<FlowEdge>,
    pub stage_losses: Vec<StageLoss>,
    pub boundary_start: String,
    pub boundary_end: String,
}

/// Compute the full balance for one model and data bundle
pub fn compute_balance(
    model: &FlowModel,
    bundle: &DataBundle,
) -> Result<BalanceResult, BalanceError> {
    let stages = model.stages.as_slice();
    let (first, last) = match (stages.first(), stages.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(BalanceError::EmptyChain),
    };
    let sc = &model.scenarios;
    let mut notes = Notes::new();

    // Inputs
    let waste = bundle.get(DatasetKind::WasteSummary);
    let material_in =
        extract::material_in_kg(bundle.get(DatasetKind::MaterialPurchases), &mut notes);
    let waste_raw = extract::waste_kg(waste, &mut notes);
    let units = extract::production_units(bundle.get(DatasetKind::ProductionOutput), &mut notes);
    notes.assume(format!(
        "Converted output to mass using assumed unit mass = {:.1} kg/pc (demo assumption).",
        ASSUMED_UNIT_MASS_KG
    ));
    debug!(material_in, waste_raw, units, "extracted aggregates");

    // Scenarios
    let waste_out = scenario::reduce_waste(waste_raw, sc.scrap_reduction_pct);
    scenario::note_waste_scenario(sc, &mut notes);
    let prod_out = scenario::improve_yield(units, ASSUMED_UNIT_MASS_KG, sc.yield_improve_pct);
    scenario::note_yield_scenario(sc, &mut notes);

    // Unaccounted material
    let residual = material_in - prod_out - waste_out;
    let unaccounted = residual.max(0.0);
    if residual < 0.0 {
        warn!(residual, "recorded outputs exceed material input; clamping");
        notes.assume(format!(
            "Recorded outputs exceed material input by ~{} kg; unaccounted loss clamped to 0 (check for double-counted output or missing purchases).",
            format_thousands(-residual)
        ));
    }

    let stage_losses = attribute_losses(stages, unaccounted);
    if unaccounted > 0.0 {
        notes.highlight(format!(
            "Detected ~{} kg unaccounted material. Likely process losses (offcuts/rejects). Flagged for review.",
            format_thousands(unaccounted)
        ));
        notes.assume("Unaccounted material attributed to cutting/forming losses (demo heuristic).");
    }

    // Energy
    let energy = extract::energy_totals(bundle.get(DatasetKind::EnergySite), &mut notes);
    let (elec_kwh, gas_kwh) = scale_energy(&energy, sc, &mut notes);
    let energy_allocation = if energy.has_data && sc.allocate_energy {
        let rows = allocate_energy(stages, elec_kwh, gas_kwh);
        notes.highlight(
            "AI assist: allocated site energy to processes using a simple activity proxy (editable assumption).",
        );
        Some(rows)
    } else {
        None
    };

    // Circularity
    let waste_by_type = extract::waste_by_type(waste, &mut notes);
    let Diversion {
        diverted_kg,
        diversion_pct,
    } = circularity::diversion(
        waste,
        waste_out,
        sc.scrap_reduction_pct,
        &mut notes,
    );
    let opportunities = circularity::opportunities(&waste_by_type);

    let flows = build_flows(
        model,
        first,
        last,
        material_in,
        prod_out,
        waste_out,
        unaccounted,
        &stage_losses,
    );

    let result = BalanceResult {
        material_in_kg: material_in,
        prod_out_kg: prod_out,
        waste_out_kg: waste_out,
        unaccounted_kg: unaccounted,
        material_eff_pct: kpi::material_efficiency_pct(prod_out, material_in),
        waste_intensity: kpi::waste_intensity(waste_out, prod_out),
        energy_elec_kwh: elec_kwh,
        energy_gas_kwh: gas_kwh,
        energy_intensity_kwh_per_kg: kpi::energy_intensity(elec_kwh, gas_kwh, prod_out),
        energy_allocation,
        waste_by_type,
        diversion_pct,
        diverted_kg,
        opportunities,
        highlights: notes.highlights,
        assumptions: notes.assumptions,
        flows,
        stage_losses,
        boundary_start: model.boundary_start.clone(),
        boundary_end: model.boundary_end.clone(),
    };

    info!(
        stages = stages.len(),
        material_in = result.material_in_kg,
        prod_out = result.prod_out_kg,
        waste_out = result.waste_out_kg,
        unaccounted = result.unaccounted_kg,
        "balance computed"
    );
    Ok(result)
}

/// Split unaccounted mass across loss-prone stages
///
/// Targets are every cutting/forming stage in chain order, or the first stage
/// when there are none. Two or more targets share 60/40 between the first two.
fn attribute_losses(stages: &[ProcessStage], unaccounted: f64) -> Vec<StageLoss> {
    let mut targets: Vec<(usize, &ProcessStage)> = stages
        .iter()
        .enumerate()
        .filter(|(_, s)| s.stage_type.is_loss_prone())
        .collect();
    if targets.is_empty() {
        targets.extend(stages.first().map(|s| (0, s)));
    }

    let single = targets.len() == 1;
    targets
        .iter()
        .enumerate()
        .map(|(i, (stage_index, stage))| {
            let weight = if single {
                1.0
            } else {
                LOSS_SPLIT.get(i).copied().unwrap_or(0.0)
            };
            StageLoss {
                stage_index: *stage_index,
                label: stage.label.clone(),
                kg: unaccounted * weight,
            }
        })
        .collect()
}

/// Apply the energy scenario to site totals
fn scale_energy(energy: &EnergyTotals, sc: &ScenarioParameters, notes: &mut Notes) -> (f64, f64) {
    if !energy.has_data {
        return (energy.electricity_kwh, energy.gas_kwh);
    }

    let elec = scenario::improve_energy(energy.electricity_kwh, sc.energy_intensity_improve_pct);
    let gas = scenario::improve_energy(energy.gas_kwh, sc.energy_intensity_improve_pct);
    scenario::note_energy_scenario(sc, notes);
    notes.assume(
        "Energy is site-level; allocation to processes is optional and uses a proxy (throughput shares).",
    );
    (elec, gas)
}

/// Apportion energy by stage yield (floored at 1) as an activity weight
fn allocate_energy(stages: &[ProcessStage], elec_kwh: f64, gas_kwh: f64) -> Vec<EnergyAllocationRow> {
    let weights: Vec<f64> = stages
        .iter()
        .map(|s| f64::from(s.yield_pct).max(1.0))
        .collect();
    let total: f64 = weights.iter().sum();

    stages
        .iter()
        .zip(&weights)
        .map(|(stage, w)| {
            let share = w / total;
            EnergyAllocationRow {
                process: stage.label.clone(),
                electricity_kwh: (elec_kwh * share).round_ties_even() as i64,
                gas_kwh: (gas_kwh * share).round_ties_even() as i64,
            }
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn build_flows(
    model: &FlowModel,
    first: &ProcessStage,
    last: &ProcessStage,
    material_in: f64,
    prod_out: f64,
    waste_out: f64,
    unaccounted: f64,
    stage_losses: &[StageLoss],
) -> Vec<FlowEdge> {
    let mut flows = Vec::with_capacity(model.stages.len() + 3 + stage_losses.len());

    flows.push(FlowEdge::new(
        &model.boundary_start,
        &first.label,
        material_in,
        EdgeKind::MaterialIn,
    ));

    // Same proxy magnitude on every internal link
    let useful_through = (material_in - waste_out - unaccounted).max(0.0);
    for pair in model.stages.windows(2) {
        flows.push(FlowEdge::new(
            &pair[0].label,
            &pair[1].label,
            useful_through,
            EdgeKind::ThroughputProxy,
        ));
    }

    flows.push(FlowEdge::new(
        &last.label,
        &model.boundary_end,
        prod_out,
        EdgeKind::ProductOut,
    ));
    flows.push(FlowEdge::new(
        ALL_PROCESSES_LABEL,
        WASTE_STREAMS_LABEL,
        waste_out,
        EdgeKind::WasteOut,
    ));
    for loss in stage_losses {
        flows.push(FlowEdge::new(
            &loss.label,
            PROCESS_LOSSES_LABEL,
            loss.kg,
            EdgeKind::LossInferred,
        ));
    }

    flows
}
