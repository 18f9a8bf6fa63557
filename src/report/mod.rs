//! Text report generation
//!
//! Renders a [`BalanceResult`] into a Markdown report through an embedded
//! Tera template. The same KPI formatting is reused by the terminal output.

use chrono::{DateTime, Utc};
use rust_embed::Embed;
use serde::Serialize;
use tera::Tera;
use thiserror::Error;

use crate::core::balance::BalanceResult;
use crate::core::notes::format_thousands;
use crate::entities::project::FlowModel;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const REPORT_TEMPLATE: &str = "report.md.tera";

/// Rows shown per sample table
pub const MAX_TABLE_ROWS: usize = 12;

/// Longest bullet text before truncation
pub const MAX_BULLET_CHARS: usize = 120;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template rendering error: {0}")]
    RenderError(String),
}

/// One formatted KPI line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiLine {
    pub label: &'static str,
    pub value: String,
}

impl KpiLine {
    fn new(label: &'static str, value: String) -> Self {
        Self { label, value }
    }
}

/// Headline KPIs with display formatting
///
/// Masses and energy use thousands separators, percentages one decimal,
/// intensities three decimals.
pub fn kpi_lines(result: &BalanceResult) -> Vec<KpiLine> {
    vec![
        KpiLine::new("Material in (kg)", format_thousands(result.material_in_kg)),
        KpiLine::new("Product out (kg)", format_thousands(result.prod_out_kg)),
        KpiLine::new("Waste out (kg)", format_thousands(result.waste_out_kg)),
        KpiLine::new("Unaccounted loss (kg)", format_thousands(result.unaccounted_kg)),
        KpiLine::new("Material efficiency (%)", format!("{:.1}", result.material_eff_pct)),
        KpiLine::new(
            "Waste intensity (kg waste / kg product)",
            format!("{:.3}", result.waste_intensity),
        ),
        KpiLine::new("Energy (kWh) electricity", format_thousands(result.energy_elec_kwh)),
        KpiLine::new("Energy (kWh) gas", format_thousands(result.energy_gas_kwh)),
        KpiLine::new(
            "Energy intensity (kWh/kg product)",
            format!("{:.3}", result.energy_intensity_kwh_per_kg),
        ),
        KpiLine::new("Diverted from landfill (kg)", format_thousands(result.diverted_kg)),
        KpiLine::new("Diversion rate (%)", format!("{:.1}", result.diversion_pct)),
    ]
}

/// Single-line, length-capped bullet text
pub fn bullet_text(s: &str) -> String {
    let flat = s.replace(['\n', '\r'], " ");
    flat.trim().chars().take(MAX_BULLET_CHARS).collect()
}

#[derive(Debug, Serialize)]
struct Section {
    title: &'static str,
    items: Vec<String>,
}

impl Section {
    fn new(title: &'static str, items: &[String]) -> Self {
        let items = if items.is_empty() {
            vec!["(none)".to_string()]
        } else {
            items.iter().map(|s| bullet_text(s)).collect()
        };
        Self { title, items }
    }
}

#[derive(Debug, Serialize)]
struct SampleTable {
    title: &'static str,
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

fn cell(s: &str) -> String {
    s.replace('|', "/")
}

fn sample_tables(result: &BalanceResult) -> Vec<SampleTable> {
    let mut tables = vec![SampleTable {
        title: "Computed flows (sample)",
        headers: vec!["From", "To", "kg", "Kind"],
        rows: result
            .flows
            .iter()
            .take(MAX_TABLE_ROWS)
            .map(|f| {
                vec![
                    cell(&f.from),
                    cell(&f.to),
                    format_thousands(f.kg),
                    f.kind.to_string(),
                ]
            })
            .collect(),
    }];

    if !result.waste_by_type.is_empty() {
        tables.push(SampleTable {
            title: "Waste by type (sample)",
            headers: vec!["Waste Type", "Quantity (kg)"],
            rows: result
                .waste_by_type
                .iter()
                .take(MAX_TABLE_ROWS)
                .map(|w| vec![cell(&w.waste_type), format_thousands(w.quantity_kg)])
                .collect(),
        });
    }

    if let Some(alloc) = result.energy_allocation.as_ref().filter(|a| !a.is_empty()) {
        tables.push(SampleTable {
            title: "Energy allocation by process (sample)",
            headers: vec!["Process", "Electricity_kWh", "Gas_kWh"],
            rows: alloc
                .iter()
                .take(MAX_TABLE_ROWS)
                .map(|a| {
                    vec![
                        cell(&a.process),
                        a.electricity_kwh.to_string(),
                        a.gas_kwh.to_string(),
                    ]
                })
                .collect(),
        });
    }

    tables
}

/// Report renderer backed by the embedded templates
pub struct ReportGenerator {
    tera: Tera,
}

impl ReportGenerator {
    /// Create a generator with the embedded templates loaded
    pub fn new() -> Result<Self, ReportError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                if let Ok(template_str) = std::str::from_utf8(&content.data) {
                    tera.add_raw_template(filename, template_str)
                        .map_err(|e| ReportError::RenderError(e.to_string()))?;
                }
            }
        }

        Ok(Self { tera })
    }

    /// Render the Markdown report
    pub fn render(
        &self,
        model: &FlowModel,
        result: &BalanceResult,
        generated: DateTime<Utc>,
    ) -> Result<String, ReportError> {
        if !self.tera.get_template_names().any(|n| n == REPORT_TEMPLATE) {
            return Err(ReportError::NotFound(REPORT_TEMPLATE.to_string()));
        }

        let mut context = tera::Context::new();
        context.insert("site_name", &bullet_text(&model.site_name));
        context.insert("boundary_start", &bullet_text(&model.boundary_start));
        context.insert("boundary_end", &bullet_text(&model.boundary_end));
        context.insert("time_period", &model.time_period.to_string());
        context.insert("generated", &generated.format("%Y-%m-%d %H:%M UTC").to_string());
        context.insert("kpis", &kpi_lines(result));
        context.insert(
            "sections",
            &[
                Section::new("Highlights", &result.highlights),
                Section::new("Assumptions & data gaps", &result.assumptions),
                Section::new("Circular opportunities", &result.opportunities),
            ],
        );
        context.insert("tables", &sample_tables(result));

        self.tera
            .render(REPORT_TEMPLATE, &context)
            .map_err(|e| ReportError::RenderError(e.to_string()))
    }
}
