//! Data bundle - the four categorized input tables

use serde::{Deserialize, Serialize};

use crate::core::table::NamedTable;

/// Category of an input dataset
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum DatasetKind {
    /// Production counts (units produced)
    #[default]
    ProductionOutput,
    /// Purchase log of raw material (kg)
    MaterialPurchases,
    /// Site-level electricity and gas bills (kWh)
    EnergySite,
    /// Waste manifests (type, kg, disposal route)
    WasteSummary,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 4] = [
        DatasetKind::ProductionOutput,
        DatasetKind::MaterialPurchases,
        DatasetKind::EnergySite,
        DatasetKind::WasteSummary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::ProductionOutput => "production_output",
            DatasetKind::MaterialPurchases => "material_purchases",
            DatasetKind::EnergySite => "energy_site",
            DatasetKind::WasteSummary => "waste_summary",
        }
    }
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DatasetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatasetKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s.to_lowercase())
            .ok_or_else(|| {
                format!(
                    "Invalid dataset type: {}. Use production_output, material_purchases, energy_site, or waste_summary",
                    s
                )
            })
    }
}

/// The four input tables of one computation
///
/// Every key is always present; a dataset that was not supplied is an empty
/// table, which the extractors treat as missing columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataBundle {
    #[serde(default)]
    pub production_output: NamedTable,
    #[serde(default)]
    pub material_purchases: NamedTable,
    #[serde(default)]
    pub energy_site: NamedTable,
    #[serde(default)]
    pub waste_summary: NamedTable,
}

impl DataBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: DatasetKind) -> &NamedTable {
        match kind {
            DatasetKind::ProductionOutput => &self.production_output,
            DatasetKind::MaterialPurchases => &self.material_purchases,
            DatasetKind::EnergySite => &self.energy_site,
            DatasetKind::WasteSummary => &self.waste_summary,
        }
    }

    /// Replace the table stored under `kind`
    pub fn insert(&mut self, kind: DatasetKind, table: NamedTable) {
        let slot = match kind {
            DatasetKind::ProductionOutput => &mut self.production_output,
            DatasetKind::MaterialPurchases => &mut self.material_purchases,
            DatasetKind::EnergySite => &mut self.energy_site,
            DatasetKind::WasteSummary => &mut self.waste_summary,
        };
        *slot = table;
    }

    pub fn with(mut self, kind: DatasetKind, table: NamedTable) -> Self {
        self.insert(kind, table);
        self
    }
}
