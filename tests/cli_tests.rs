//! CLI command tests against the starter project

mod common;

use common::{assert_close, mfm, run_json, setup_test_project};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    mfm()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("material flow"));
}

#[test]
fn test_version_displays() {
    mfm()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mfm"));
}

#[test]
fn test_unknown_command_fails() {
    mfm()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_completions_generate() {
    mfm()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mfm"));
}

// ============================================================================
// Init Command Tests
// ============================================================================

#[test]
fn test_init_creates_project_and_sample_data() {
    let tmp = TempDir::new().unwrap();

    mfm()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));

    assert!(tmp.path().join("mfm.yaml").exists());
    for name in [
        "production_output",
        "material_purchases",
        "energy_site",
        "waste_summary",
    ] {
        assert!(tmp.path().join(format!("data/{name}.csv")).exists());
    }

    let yaml = fs::read_to_string(tmp.path().join("mfm.yaml")).unwrap();
    assert!(yaml.contains("Material Intake"));
    assert!(yaml.contains("waste_summary: data/waste_summary.csv"));
}

#[test]
fn test_init_refuses_to_overwrite_without_force() {
    let tmp = setup_test_project();

    mfm()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    mfm()
        .current_dir(tmp.path())
        .args(["init", "--force"])
        .assert()
        .success();
}

// ============================================================================
// Run Command Tests
// ============================================================================

#[test]
fn test_run_text_output() {
    let tmp = setup_test_project();

    mfm()
        .current_dir(tmp.path())
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Material in (kg)"))
        .stdout(predicate::str::contains("13,400"))
        .stdout(predicate::str::contains("Goods In (Raw Material)"))
        .stdout(predicate::str::contains("High clean metal scrap"))
        .stdout(predicate::str::contains("Assumptions & data gaps"));
}

#[test]
fn test_run_json_baseline() {
    let tmp = setup_test_project();
    let r = run_json(&tmp, &["run"]);

    assert_close(r["material_in_kg"].as_f64().unwrap(), 13400.0);
    assert_close(r["prod_out_kg"].as_f64().unwrap(), 10500.0);
    assert_close(r["waste_out_kg"].as_f64().unwrap(), 2180.0);
    assert_close(r["unaccounted_kg"].as_f64().unwrap(), 720.0);
    assert_close(r["diverted_kg"].as_f64().unwrap(), 1630.0);
    assert_eq!(r["opportunities"].as_array().unwrap().len(), 3);
    assert_eq!(r["flows"][0]["kind"], "material_in");
    assert!(r["energy_allocation"].is_null());

    let losses = r["stage_losses"].as_array().unwrap();
    assert_eq!(losses.len(), 2);
    assert_eq!(losses[0]["label"], "Cutting");
    assert_close(losses[0]["kg"].as_f64().unwrap(), 432.0);
    assert_close(losses[1]["kg"].as_f64().unwrap(), 288.0);
}

#[test]
fn test_run_scrap_reduction_override() {
    let tmp = setup_test_project();
    let r = run_json(&tmp, &["run", "--scrap-reduction", "20"]);

    assert_close(r["waste_out_kg"].as_f64().unwrap(), 1744.0);
    assert_close(r["unaccounted_kg"].as_f64().unwrap(), 1156.0);
    assert!(r["highlights"]
        .as_array()
        .unwrap()
        .iter()
        .any(|h| h == "Scenario applied: scrap/waste reduced by 20%."));
}

#[test]
fn test_run_rejects_out_of_range_scenario() {
    let tmp = setup_test_project();

    mfm()
        .current_dir(tmp.path())
        .args(["run", "--scrap-reduction", "45"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("scrap_reduction_pct"));
}

#[test]
fn test_run_allocates_energy() {
    let tmp = setup_test_project();
    let r = run_json(&tmp, &["run", "--allocate-energy"]);

    let alloc = r["energy_allocation"].as_array().unwrap();
    assert_eq!(alloc.len(), 7);
    assert_eq!(alloc[0]["process"], "Material Intake");
    assert_eq!(alloc[0]["electricity_kwh"], 7914);
    assert_eq!(alloc[0]["gas_kwh"], 3657);
}

#[test]
fn test_run_can_disable_project_energy_allocation() {
    let tmp = setup_test_project();
    let path = tmp.path().join("mfm.yaml");
    let yaml = fs::read_to_string(&path).unwrap();
    assert!(yaml.contains("allocate_energy: false"));
    fs::write(&path, yaml.replace("allocate_energy: false", "allocate_energy: true")).unwrap();

    let r = run_json(&tmp, &["run"]);
    assert_eq!(r["energy_allocation"].as_array().unwrap().len(), 7);

    let r = run_json(&tmp, &["run", "--no-allocate-energy"]);
    assert!(r["energy_allocation"].is_null());
}

#[test]
fn test_run_yaml_output() {
    let tmp = setup_test_project();

    mfm()
        .current_dir(tmp.path())
        .args(["--output", "yaml", "run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("material_in_kg: 13400"));
}

#[test]
fn test_run_without_project_fails() {
    let tmp = TempDir::new().unwrap();

    mfm()
        .current_dir(tmp.path())
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No project file"));
}

#[test]
fn test_run_uses_project_env_var() {
    let tmp = setup_test_project();
    let elsewhere = TempDir::new().unwrap();

    mfm()
        .current_dir(elsewhere.path())
        .env("MFM_PROJECT", tmp.path())
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("13,400"));
}

#[test]
fn test_run_fails_on_unreadable_data_file() {
    let tmp = setup_test_project();
    fs::remove_file(tmp.path().join("data/energy_site.csv")).unwrap();

    mfm()
        .current_dir(tmp.path())
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not read"));
}

#[test]
fn test_short_chain_warns_but_computes() {
    let tmp = setup_test_project();
    for _ in 0..5 {
        mfm()
            .current_dir(tmp.path())
            .args(["stage", "pop"])
            .assert()
            .success();
    }

    mfm()
        .current_dir(tmp.path())
        .arg("run")
        .assert()
        .success()
        .stderr(predicate::str::contains("Add at least 3 blocks"));
}

// ============================================================================
// Graph and Report Tests
// ============================================================================

#[test]
fn test_graph_defaults_to_json() {
    let tmp = setup_test_project();

    let output = mfm()
        .current_dir(tmp.path())
        .arg("graph")
        .output()
        .unwrap();
    assert!(output.status.success());

    let g: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(g["labels"][0], "Goods In (Raw Material)");
    let n = g["sources"].as_array().unwrap().len();
    assert_eq!(g["targets"].as_array().unwrap().len(), n);
    assert_eq!(g["values"].as_array().unwrap().len(), n);
}

#[test]
fn test_report_to_stdout() {
    let tmp = setup_test_project();

    mfm()
        .current_dir(tmp.path())
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Gate-to-Gate Material Flow Map Report"))
        .stdout(predicate::str::contains("Site: SME Metal Fab Site"))
        .stdout(predicate::str::contains("## Circular opportunities"))
        .stdout(predicate::str::contains("## Computed flows (sample)"));
}

#[test]
fn test_report_to_file() {
    let tmp = setup_test_project();

    mfm()
        .current_dir(tmp.path())
        .args(["report", "-o", "report.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote report"));

    let report = fs::read_to_string(tmp.path().join("report.md")).unwrap();
    assert!(report.contains("- Unaccounted loss (kg): 720"));
}

// ============================================================================
// Stage Command Tests
// ============================================================================

#[test]
fn test_stage_list() {
    let tmp = setup_test_project();

    mfm()
        .current_dir(tmp.path())
        .args(["stage", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Material Intake"))
        .stdout(predicate::str::contains("Packaging & Dispatch"));
}

#[test]
fn test_stage_library() {
    mfm()
        .args(["stage", "library"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Thermal Processing"));
}

#[test]
fn test_stage_add_suggests_type() {
    let tmp = setup_test_project();

    mfm()
        .current_dir(tmp.path())
        .args(["stage", "add", "Inspection"])
        .assert()
        .success()
        .stdout(predicate::str::contains("position 8"));

    let stages = run_json(&tmp, &["stage", "list"]);
    let stages = stages.as_array().unwrap();
    assert_eq!(stages.len(), 8);
    assert_eq!(stages[7]["type"], "inspection");
    assert_eq!(stages[7]["yield_pct"], 92);
}

#[test]
fn test_stage_add_with_type_and_yield() {
    let tmp = setup_test_project();

    mfm()
        .current_dir(tmp.path())
        .args(["stage", "add", "Deburring", "--type", "cutting", "--yield", "85"])
        .assert()
        .success();

    let stages = run_json(&tmp, &["stage", "list"]);
    let added = &stages.as_array().unwrap()[7];
    assert_eq!(added["label"], "Deburring");
    assert_eq!(added["type"], "cutting");
    assert_eq!(added["yield_pct"], 85);
    assert_eq!(added["primary_material"], "Mild steel sheet 2mm");
}

#[test]
fn test_stage_edit_in_place() {
    let tmp = setup_test_project();

    mfm()
        .current_dir(tmp.path())
        .args(["stage", "edit", "2", "--label", "Laser Cutting", "--yield", "88"])
        .assert()
        .success();

    let stages = run_json(&tmp, &["stage", "list"]);
    assert_eq!(stages[1]["label"], "Laser Cutting");
    assert_eq!(stages[1]["yield_pct"], 88);
    assert_eq!(stages[1]["type"], "cutting");
}

#[test]
fn test_stage_edit_rejects_bad_input() {
    let tmp = setup_test_project();

    mfm()
        .current_dir(tmp.path())
        .args(["stage", "edit", "99", "--yield", "90"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No stage at position 99"));

    mfm()
        .current_dir(tmp.path())
        .args(["stage", "edit", "1", "--yield", "50"])
        .assert()
        .failure();
}

#[test]
fn test_stage_pop_until_empty() {
    let tmp = setup_test_project();
    for _ in 0..7 {
        mfm()
            .current_dir(tmp.path())
            .args(["stage", "pop"])
            .assert()
            .success();
    }

    mfm()
        .current_dir(tmp.path())
        .args(["stage", "pop"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already empty"));

    mfm()
        .current_dir(tmp.path())
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("process chain is empty"));
}

// ============================================================================
// Classify Tests
// ============================================================================

#[test]
fn test_classify_sample_files() {
    let tmp = setup_test_project();

    mfm()
        .current_dir(tmp.path())
        .args(["classify", "data/waste_summary.csv", "data/energy_site.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("waste_summary"))
        .stdout(predicate::str::contains("Disposal Route"))
        .stdout(predicate::str::contains("Electricity kWh"));
}

#[test]
fn test_classify_by_headers_json() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("export_01.csv"),
        "Date,Material,Weight (kg)\n2025-01-01,Steel,100\n",
    )
    .unwrap();

    let r = run_json(&tmp, &["classify", "export_01.csv"]);
    assert_eq!(r[0]["kind"], "material_purchases");
    assert_eq!(r[0]["rows"], 1);
    assert_eq!(r[0]["columns"][0]["column"], "Weight (kg)");
}
