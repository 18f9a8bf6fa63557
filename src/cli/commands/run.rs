//! `mfm run` command - Compute the balance and show results

use std::path::PathBuf;

use console::style;
use miette::Result;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::helpers::{compute, load_project};
use crate::cli::output::{effective_format, print_structured};
use crate::cli::viz::render_chain_schematic;
use crate::cli::GlobalOpts;
use crate::core::balance::BalanceResult;
use crate::core::notes::format_thousands;
use crate::core::scenario::ScenarioParameters;
use crate::entities::project::FlowModel;
use crate::report::kpi_lines;

/// Chains shorter than this still compute but are flagged
pub const MIN_MEANINGFUL_STAGES: usize = 3;

pub const SHORT_CHAIN_WARNING: &str = "Add at least 3 blocks to make a meaningful map.";
pub const NO_OPPORTUNITIES: &str = "Not enough detail to suggest opportunities yet.";
pub const NO_HIGHLIGHTS: &str = "(No highlights yet — try scenarios or add more data.)";

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Project file or directory (default: ./mfm.yaml)
    #[arg(env = "MFM_PROJECT")]
    pub project: Option<PathBuf>,

    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

/// Scenario overrides; unset flags keep the project's values
#[derive(clap::Args, Debug, Default)]
pub struct ScenarioArgs {
    /// Scrap/waste reduction (%), 0-30
    #[arg(long, value_name = "PCT")]
    pub scrap_reduction: Option<f64>,

    /// Yield improvement (%), 0-15
    #[arg(long, value_name = "PCT")]
    pub yield_improve: Option<f64>,

    /// Energy intensity improvement (%), 0-20
    #[arg(long, value_name = "PCT")]
    pub energy_improve: Option<f64>,

    /// Allocate site energy to stages
    #[arg(long, overrides_with = "no_allocate_energy")]
    pub allocate_energy: bool,

    /// Leave site energy unallocated even if the project enables it
    #[arg(long, overrides_with = "allocate_energy")]
    pub no_allocate_energy: bool,
}

impl ScenarioArgs {
    pub fn apply(&self, base: ScenarioParameters) -> ScenarioParameters {
        ScenarioParameters {
            scrap_reduction_pct: self.scrap_reduction.unwrap_or(base.scrap_reduction_pct),
            yield_improve_pct: self.yield_improve.unwrap_or(base.yield_improve_pct),
            energy_intensity_improve_pct: self
                .energy_improve
                .unwrap_or(base.energy_intensity_improve_pct),
            allocate_energy: match (self.allocate_energy, self.no_allocate_energy) {
                (true, _) => true,
                (_, true) => false,
                _ => base.allocate_energy,
            },
        }
    }
}

#[derive(Tabled)]
struct KpiRow {
    #[tabled(rename = "KPI")]
    label: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct FlowRow {
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "kg")]
    kg: String,
    #[tabled(rename = "Kind")]
    kind: String,
}

#[derive(Tabled)]
struct WasteRow {
    #[tabled(rename = "Waste Type")]
    waste_type: String,
    #[tabled(rename = "Quantity (kg)")]
    kg: String,
}

#[derive(Tabled)]
struct EnergyRow {
    #[tabled(rename = "Process")]
    process: String,
    #[tabled(rename = "Electricity (kWh)")]
    electricity: String,
    #[tabled(rename = "Gas (kWh)")]
    gas: String,
}

pub fn run(args: RunArgs, global: &GlobalOpts) -> Result<()> {
    let (path, project) = load_project(args.project.as_deref())?;
    let scenarios = args.scenario.apply(project.scenarios);
    let (model, result) = compute(&path, &project, scenarios)?;

    if model.stages.len() < MIN_MEANINGFUL_STAGES {
        eprintln!("{} {}", style("!").yellow(), SHORT_CHAIN_WARNING);
    }

    let format = effective_format(global.output, false);
    if print_structured(&result, format)? {
        return Ok(());
    }

    print_text(&model, &result);
    Ok(())
}

fn print_text(model: &FlowModel, result: &BalanceResult) {
    let mode = if model.scenarios.is_baseline() {
        "baseline"
    } else {
        "scenario"
    };
    println!(
        "{} {}  ({}, {})",
        style("→").blue(),
        style(&model.site_name).bold(),
        model.time_period,
        mode
    );
    println!();
    println!("{}", render_chain_schematic(&model.stages, result));
    println!();

    let kpis: Vec<KpiRow> = kpi_lines(result)
        .into_iter()
        .map(|k| KpiRow {
            label: k.label,
            value: k.value,
        })
        .collect();
    println!("{}", Table::new(kpis).with(Style::rounded()));

    section("Flows");
    let flows = result.flows.iter().map(|f| FlowRow {
        from: f.from.clone(),
        to: f.to.clone(),
        kg: format_thousands(f.kg),
        kind: f.kind.to_string(),
    });
    println!("{}", Table::new(flows).with(Style::rounded()));

    if !result.waste_by_type.is_empty() {
        section("Waste by type");
        let rows = result.waste_by_type.iter().map(|w| WasteRow {
            waste_type: w.waste_type.clone(),
            kg: format_thousands(w.quantity_kg),
        });
        println!("{}", Table::new(rows).with(Style::rounded()));
    }

    if let Some(alloc) = &result.energy_allocation {
        section("Energy allocation by process");
        let rows = alloc.iter().map(|a| EnergyRow {
            process: a.process.clone(),
            electricity: format_thousands(a.electricity_kwh as f64),
            gas: format_thousands(a.gas_kwh as f64),
        });
        println!("{}", Table::new(rows).with(Style::rounded()));
    }

    section("Highlights");
    bullets(&result.highlights, NO_HIGHLIGHTS);

    section("Circular opportunities");
    bullets(&result.opportunities, NO_OPPORTUNITIES);

    section("Assumptions & data gaps");
    bullets(&result.assumptions, "(none)");
}

fn section(title: &str) {
    println!();
    println!("{}", style(title).bold().underlined());
}

fn bullets(items: &[String], empty: &str) {
    if items.is_empty() {
        println!("  {}", style(empty).dim());
    }
    for item in items {
        println!("  • {}", item);
    }
}
