//! Balance engine behavior across whole computations

mod common;

use common::assert_close;
use mfm::core::balance::{compute_balance, BalanceResult, EdgeKind};
use mfm::core::flow_graph::FlowGraph;
use mfm::core::scenario::ScenarioParameters;
use mfm::core::table::NamedTable;
use mfm::entities::bundle::{DataBundle, DatasetKind};
use mfm::entities::project::FlowModel;
use mfm::entities::stage::{ProcessStage, StageType};

fn chain() -> Vec<ProcessStage> {
    vec![
        ProcessStage::new("Material Intake", StageType::Intake),
        ProcessStage::new("Cutting", StageType::Cutting),
        ProcessStage::new("Forming", StageType::Forming),
        ProcessStage::new("Assembly", StageType::Assembly),
    ]
}

fn bundle(material_kg: f64, product_kg: f64, waste_kg: f64) -> DataBundle {
    DataBundle::new()
        .with(
            DatasetKind::MaterialPurchases,
            NamedTable::new().with_column("Weight (kg)", vec![material_kg.into()]),
        )
        .with(
            DatasetKind::ProductionOutput,
            NamedTable::new().with_column("Qty Produced", vec![(product_kg / 15.0).into()]),
        )
        .with(
            DatasetKind::WasteSummary,
            NamedTable::new()
                .with_column("Waste Type", vec!["Steel offcuts".into(), "Mixed".into()])
                .with_column(
                    "Quantity (kg)",
                    vec![(waste_kg * 0.9).into(), (waste_kg * 0.1).into()],
                )
                .with_column("Disposal Route", vec!["Recycling".into(), "Landfill".into()]),
        )
        .with(
            DatasetKind::EnergySite,
            NamedTable::new()
                .with_column("Electricity kWh", vec![20000.0.into()])
                .with_column("Gas kWh", vec![10000.0.into()]),
        )
}

fn compute(sc: ScenarioParameters, data: &DataBundle) -> BalanceResult {
    compute_balance(&FlowModel::new(chain(), sc), data).unwrap()
}

fn scrap(pct: f64) -> ScenarioParameters {
    ScenarioParameters {
        scrap_reduction_pct: pct,
        ..Default::default()
    }
}

#[test]
fn test_reference_site_baseline() {
    let r = compute(ScenarioParameters::default(), &bundle(10000.0, 8000.0, 1500.0));

    assert_close(r.material_in_kg, 10000.0);
    assert_close(r.prod_out_kg, 8000.0);
    assert_close(r.waste_out_kg, 1500.0);
    assert_close(r.unaccounted_kg, 500.0);
    assert_close(r.material_eff_pct, 80.0);

    assert_eq!(r.stage_losses.len(), 2);
    assert_eq!(r.stage_losses[0].label, "Cutting");
    assert_close(r.stage_losses[0].kg, 300.0);
    assert_eq!(r.stage_losses[1].label, "Forming");
    assert_close(r.stage_losses[1].kg, 200.0);

    assert!(r.highlights[0].starts_with("Detected ~500 kg unaccounted material."));
}

#[test]
fn test_reference_site_with_scrap_reduction() {
    let r = compute(scrap(20.0), &bundle(10000.0, 8000.0, 1500.0));

    assert_close(r.waste_out_kg, 1200.0);
    assert_close(r.unaccounted_kg, 800.0);
    assert!(r
        .highlights
        .contains(&"Scenario applied: scrap/waste reduced by 20%.".to_string()));
}

#[test]
fn test_mass_closes_when_not_clamped() {
    for (m, p, w) in [(10000.0, 8000.0, 1500.0), (500.0, 120.0, 30.0), (1.0, 0.0, 0.0)] {
        let r = compute(ScenarioParameters::default(), &bundle(m, p, w));
        assert_close(r.prod_out_kg + r.waste_out_kg + r.unaccounted_kg, r.material_in_kg);
    }
}

#[test]
fn test_outputs_are_non_negative() {
    for (m, p, w) in [(0.0, 0.0, 0.0), (100.0, 900.0, 50.0), (10000.0, 8000.0, 1500.0)] {
        let r = compute(scrap(30.0), &bundle(m, p, w));
        assert!(r.unaccounted_kg >= 0.0);
        assert!(r.flows.iter().all(|f| f.kg >= 0.0));
        assert!(r.stage_losses.iter().all(|l| l.kg >= 0.0));
        assert!(r.diversion_pct >= 0.0);
    }
}

#[test]
fn test_scrap_reduction_is_monotonic() {
    let data = bundle(10000.0, 8000.0, 1500.0);
    let results: Vec<BalanceResult> = [0.0, 10.0, 20.0, 30.0]
        .into_iter()
        .map(|pct| compute(scrap(pct), &data))
        .collect();

    for pair in results.windows(2) {
        assert!(pair[1].waste_out_kg < pair[0].waste_out_kg);
        assert!(pair[1].unaccounted_kg > pair[0].unaccounted_kg);
    }
}

#[test]
fn test_yield_and_energy_scenarios_are_monotonic() {
    let data = bundle(10000.0, 8000.0, 1500.0);
    let base = compute(ScenarioParameters::default(), &data);
    let improved = compute(
        ScenarioParameters {
            yield_improve_pct: 10.0,
            energy_intensity_improve_pct: 20.0,
            ..Default::default()
        },
        &data,
    );

    assert!(improved.prod_out_kg > base.prod_out_kg);
    assert!(improved.material_eff_pct > base.material_eff_pct);
    assert_close(improved.energy_elec_kwh, 16000.0);
    assert_close(improved.energy_gas_kwh, 8000.0);
    assert!(improved.energy_intensity_kwh_per_kg < base.energy_intensity_kwh_per_kg);
}

#[test]
fn test_computation_is_idempotent() {
    let data = bundle(10000.0, 8000.0, 1500.0);
    let sc = ScenarioParameters {
        scrap_reduction_pct: 15.0,
        allocate_energy: true,
        ..Default::default()
    };
    assert_eq!(compute(sc, &data), compute(sc, &data));
}

#[test]
fn test_zero_scenario_adds_no_scenario_highlights() {
    let r = compute(ScenarioParameters::default(), &bundle(10000.0, 8000.0, 1500.0));
    assert!(r.highlights.iter().all(|h| !h.starts_with("Scenario applied")));
    assert!(r.energy_allocation.is_none());
    assert_eq!(r.energy_elec_kwh, 20000.0);
    assert_eq!(r.energy_gas_kwh, 10000.0);
    assert_close(r.waste_out_kg, 1500.0);
}

#[test]
fn test_energy_scenarios_need_energy_data() {
    let data = DataBundle::new().with(
        DatasetKind::MaterialPurchases,
        NamedTable::new().with_column("Weight (kg)", vec![100.0.into()]),
    );
    let sc = ScenarioParameters {
        energy_intensity_improve_pct: 20.0,
        allocate_energy: true,
        ..Default::default()
    };
    let model = FlowModel::new(vec![ProcessStage::new("Saw", StageType::Cutting)], sc);
    let r = compute_balance(&model, &data).unwrap();

    assert_eq!(r.energy_elec_kwh, 0.0);
    assert_eq!(r.energy_gas_kwh, 0.0);
    assert!(r.energy_allocation.is_none());
    assert_eq!(r.highlights.len(), 1);
    assert!(r.highlights[0].starts_with("Detected ~100 kg unaccounted material."));
    assert!(r
        .assumptions
        .iter()
        .all(|a| !a.starts_with("Energy is site-level")));
}

#[test]
fn test_energy_allocation_covers_every_stage() {
    let sc = ScenarioParameters {
        allocate_energy: true,
        ..Default::default()
    };
    let r = compute(sc, &bundle(10000.0, 8000.0, 1500.0));
    let alloc = r.energy_allocation.unwrap();

    assert_eq!(alloc.len(), 4);
    assert!(alloc.iter().all(|a| a.electricity_kwh == 5000 && a.gas_kwh == 2500));
}

#[test]
fn test_diversion_and_opportunities() {
    let r = compute(ScenarioParameters::default(), &bundle(10000.0, 8000.0, 1500.0));

    assert_close(r.diverted_kg, 1350.0);
    assert_close(r.diversion_pct, 90.0);
    assert_eq!(r.waste_by_type.len(), 2);
    assert_eq!(r.opportunities.len(), 1);
    assert!(r.opportunities[0].starts_with("High clean metal scrap"));
}

#[test]
fn test_graph_is_well_formed() {
    let r = compute(scrap(10.0), &bundle(10000.0, 8000.0, 1500.0));
    let graph = FlowGraph::from_edges(&r.flows);

    assert_eq!(graph.sources.len(), graph.targets.len());
    assert_eq!(graph.targets.len(), graph.values.len());
    assert_eq!(graph.edge_count(), r.flows.len());
    assert!(graph.sources.iter().all(|&i| i < graph.labels.len()));
    assert!(graph.targets.iter().all(|&i| i < graph.labels.len()));

    let mut unique = graph.labels.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), graph.labels.len());

    // Stages, both boundaries, the waste source and sink, the loss sink
    assert_eq!(graph.labels.len(), chain().len() + 5);
}

#[test]
fn test_missing_data_degrades_to_assumptions() {
    let r = compute(ScenarioParameters::default(), &DataBundle::new());

    assert_eq!(r.material_in_kg, 0.0);
    assert_eq!(r.material_eff_pct, 0.0);
    assert_eq!(r.energy_intensity_kwh_per_kg, 0.0);
    assert!(r.opportunities.is_empty());
    assert!(r
        .assumptions
        .contains(&"Material input mass missing; treated as 0 kg.".to_string()));
    assert!(r
        .assumptions
        .contains(&"No disposal route column detected; diversion % may be incomplete.".to_string()));
    assert_eq!(
        r.flows.iter().filter(|f| f.kind == EdgeKind::ThroughputProxy).count(),
        3
    );
}
