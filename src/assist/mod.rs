//! Rule-based assist heuristics
//!
//! Best-first keyword tables that guess what an uploaded file contains,
//! which columns the engine will read from it, and what kind of process a
//! stage label describes. Nothing here is learned; the first matching rule
//! wins, and every suggestion is meant to be confirmed by the user.

use serde::Serialize;

use crate::core::table::{
    resolve_column, NamedTable, DISPOSAL_ROUTE_KEYWORDS, ELECTRICITY_KEYWORDS, GAS_KEYWORDS,
    MATERIAL_MASS_KEYWORDS, PRODUCTION_COUNT_KEYWORDS, WASTE_MASS_KEYWORDS, WASTE_TYPE_KEYWORDS,
};
use crate::entities::bundle::DatasetKind;
use crate::entities::stage::StageType;

/// Filename/header keywords per dataset kind, in priority order
const DATASET_RULES: &[(&[&str], DatasetKind)] = &[
    (&["production", "output"], DatasetKind::ProductionOutput),
    (&["material", "purchase"], DatasetKind::MaterialPurchases),
    (&["energy", "electric", "gas"], DatasetKind::EnergySite),
    (&["waste", "scrap"], DatasetKind::WasteSummary),
];

/// Label keywords per process type, in priority order
const PROCESS_RULES: &[(&[&str], StageType)] = &[
    (&["intake", "receiv", "goods in"], StageType::Intake),
    (&["prep"], StageType::Prep),
    (&["cut", "laser", "saw", "shear"], StageType::Cutting),
    (&["form", "bend", "press", "stamp"], StageType::Forming),
    (&["weld", "join", "braz"], StageType::Joining),
    (&["thermal", "heat", "anneal"], StageType::Thermal),
    (&["surface", "paint", "coat", "finish"], StageType::Surface),
    (&["assembl"], StageType::Assembly),
    (&["inspect", "qc", "quality"], StageType::Inspection),
    (&["pack", "dispatch", "ship"], StageType::Packaging),
    (&["stor", "warehouse"], StageType::Storage),
];

fn first_rule<T: Copy>(rules: &[(&[&str], T)], text: &str) -> Option<T> {
    let lower = text.to_lowercase();
    rules
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, value)| *value)
}

/// Guess the dataset kind of an uploaded table
///
/// The file name is checked first; when it is ambiguous the column headers
/// are checked against the same rules. Defaults to production output.
pub fn suggest_dataset_type<'a>(
    file_name: &str,
    headers: impl IntoIterator<Item = &'a str>,
) -> DatasetKind {
    if let Some(kind) = first_rule(DATASET_RULES, file_name) {
        return kind;
    }
    headers
        .into_iter()
        .find_map(|h| first_rule(DATASET_RULES, h))
        .unwrap_or_default()
}

/// Guess the process type of a stage label
pub fn suggest_process_type(label: &str) -> StageType {
    first_rule(PROCESS_RULES, label).unwrap_or(StageType::Other)
}

/// Column the engine would read for one role
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSuggestion {
    pub role: &'static str,
    pub column: Option<String>,
}

/// Roles the engine reads for each dataset kind
fn roles(kind: DatasetKind) -> &'static [(&'static str, &'static [&'static str])] {
    match kind {
        DatasetKind::ProductionOutput => &[("quantity", PRODUCTION_COUNT_KEYWORDS)],
        DatasetKind::MaterialPurchases => &[("mass_kg", MATERIAL_MASS_KEYWORDS)],
        DatasetKind::EnergySite => &[
            ("electricity_kwh", ELECTRICITY_KEYWORDS),
            ("gas_kwh", GAS_KEYWORDS),
        ],
        DatasetKind::WasteSummary => &[
            ("waste_type", WASTE_TYPE_KEYWORDS),
            ("quantity_kg", WASTE_MASS_KEYWORDS),
            ("disposal_route", DISPOSAL_ROUTE_KEYWORDS),
        ],
    }
}

/// Column mapping the balance engine will use for a confirmed dataset kind
pub fn suggest_column_mapping(kind: DatasetKind, table: &NamedTable) -> Vec<ColumnSuggestion> {
    roles(kind)
        .iter()
        .map(|&(role, keywords)| ColumnSuggestion {
            role,
            column: resolve_column(table, keywords).map(str::to_string),
        })
        .collect()
}
