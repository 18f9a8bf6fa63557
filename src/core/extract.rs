//! Aggregate extraction from the four input tables
//!
//! Each extractor resolves its column through [`resolve_column`] and sums the
//! numeric cells. A missing column is not an error: the extractor returns a
//! zero/empty default and records the gap as an assumption.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::notes::Notes;
use crate::core::table::{
    resolve_column, NamedTable, ELECTRICITY_KEYWORDS, GAS_KEYWORDS, MATERIAL_MASS_KEYWORDS,
    PRODUCTION_COUNT_KEYWORDS, WASTE_MASS_KEYWORDS, WASTE_TYPE_KEYWORDS,
};

/// Site energy totals for the analysed period
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyTotals {
    pub electricity_kwh: f64,
    pub gas_kwh: f64,
    /// True when an electricity or a gas column was found
    pub has_data: bool,
}

/// One waste manifest line: type label and mass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteTypeRow {
    pub waste_type: String,
    pub quantity_kg: f64,
}

/// Sum a resolved column, noting skipped non-numeric cells
fn sum_resolved(table: &NamedTable, column: &str, notes: &mut Notes) -> f64 {
    let sum = table.sum(column);
    if sum.skipped > 0 {
        notes.assume(format!(
            "Ignored {} non-numeric value(s) in column '{}'.",
            sum.skipped, column
        ));
    }
    debug!(column, total = sum.total, skipped = sum.skipped, "summed column");
    sum.total
}

/// Total purchased material mass in kg
pub fn material_in_kg(purchases: &NamedTable, notes: &mut Notes) -> f64 {
    match resolve_column(purchases, MATERIAL_MASS_KEYWORDS) {
        Some(col) => sum_resolved(purchases, col, notes),
        None => {
            notes.assume("Material input mass missing; treated as 0 kg.");
            0.0
        }
    }
}

/// Total recorded waste mass in kg
pub fn waste_kg(waste: &NamedTable, notes: &mut Notes) -> f64 {
    match resolve_column(waste, WASTE_MASS_KEYWORDS) {
        Some(col) => sum_resolved(waste, col, notes),
        None => {
            notes.assume("Waste mass missing; treated as 0 kg.");
            0.0
        }
    }
}

/// Total produced units
pub fn production_units(production: &NamedTable, notes: &mut Notes) -> f64 {
    match resolve_column(production, PRODUCTION_COUNT_KEYWORDS) {
        Some(col) => sum_resolved(production, col, notes),
        None => {
            notes.assume("Production quantity missing; treated as 0 units.");
            0.0
        }
    }
}

/// Electricity and gas totals; either column may be independently absent
pub fn energy_totals(energy: &NamedTable, notes: &mut Notes) -> EnergyTotals {
    let elec_col = resolve_column(energy, ELECTRICITY_KEYWORDS);
    let gas_col = resolve_column(energy, GAS_KEYWORDS);

    let electricity_kwh = elec_col.map_or(0.0, |c| sum_resolved(energy, c, notes));
    let gas_kwh = gas_col.map_or(0.0, |c| sum_resolved(energy, c, notes));
    let has_data = elec_col.is_some() || gas_col.is_some();

    if !has_data {
        notes.assume("No electricity or gas column detected; energy treated as 0 kWh.");
    }

    EnergyTotals {
        electricity_kwh,
        gas_kwh,
        has_data,
    }
}

/// Waste lines by type, in manifest order
///
/// Rows without a numeric quantity count as 0 kg.
pub fn waste_by_type(waste: &NamedTable, notes: &mut Notes) -> Vec<WasteTypeRow> {
    let (Some(type_col), Some(kg_col)) = (
        resolve_column(waste, WASTE_TYPE_KEYWORDS),
        resolve_column(waste, WASTE_MASS_KEYWORDS),
    ) else {
        notes.assume("Waste type or quantity column missing; waste-by-type breakdown unavailable.");
        return Vec::new();
    };

    (0..waste.row_count())
        .map(|row| WasteTypeRow {
            waste_type: waste.cell(row, type_col).as_text(),
            quantity_kg: waste.cell(row, kg_col).as_f64().unwrap_or(0.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::table::Cell;

    #[test]
    fn test_material_in_sums_weight_column() {
        let table = NamedTable::new()
            .with_column("Supplier", vec!["A".into(), "B".into()])
            .with_column("Weight", vec![6000.0.into(), 4000.0.into()]);
        let mut notes = Notes::new();
        assert_eq!(material_in_kg(&table, &mut notes), 10000.0);
        assert!(notes.assumptions.is_empty());
    }

    #[test]
    fn test_missing_columns_default_to_zero_with_assumption() {
        let empty = NamedTable::new();
        let mut notes = Notes::new();
        assert_eq!(material_in_kg(&empty, &mut notes), 0.0);
        assert_eq!(waste_kg(&empty, &mut notes), 0.0);
        assert_eq!(production_units(&empty, &mut notes), 0.0);
        assert_eq!(
            notes.assumptions,
            vec![
                "Material input mass missing; treated as 0 kg.",
                "Waste mass missing; treated as 0 kg.",
                "Production quantity missing; treated as 0 units.",
            ]
        );
    }

    #[test]
    fn test_non_numeric_cells_are_noted() {
        let table = NamedTable::new().with_column("kg", vec![5.0.into(), "TBC".into()]);
        let mut notes = Notes::new();
        assert_eq!(waste_kg(&table, &mut notes), 5.0);
        assert_eq!(notes.assumptions.len(), 1);
        assert!(notes.assumptions[0].contains("column 'kg'"));
    }

    #[test]
    fn test_energy_totals_partial() {
        let table = NamedTable::new().with_column("Gas (kWh)", vec![100.0.into(), 50.0.into()]);
        let mut notes = Notes::new();
        let totals = energy_totals(&table, &mut notes);
        assert_eq!(totals.electricity_kwh, 0.0);
        assert_eq!(totals.gas_kwh, 150.0);
        assert!(totals.has_data);
        assert!(notes.assumptions.is_empty());
    }

    #[test]
    fn test_energy_totals_absent() {
        let mut notes = Notes::new();
        let totals = energy_totals(&NamedTable::new(), &mut notes);
        assert_eq!(totals, EnergyTotals::default());
        assert_eq!(notes.assumptions.len(), 1);
    }

    #[test]
    fn test_waste_by_type_keeps_rows() {
        let table = NamedTable::new()
            .with_column("Waste Type", vec!["Steel".into(), "Mixed".into(), "Steel".into()])
            .with_column("kg", vec![100.0.into(), Cell::Empty, 50.0.into()]);
        let mut notes = Notes::new();
        let rows = waste_by_type(&table, &mut notes);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].quantity_kg, 0.0);
        assert_eq!(rows[2].waste_type, "Steel");
    }

    #[test]
    fn test_waste_by_type_missing_type_column() {
        let table = NamedTable::new().with_column("kg", vec![100.0.into()]);
        let mut notes = Notes::new();
        assert!(waste_by_type(&table, &mut notes).is_empty());
        assert_eq!(notes.assumptions.len(), 1);
    }
}
