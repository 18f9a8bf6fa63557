//! Named-column tables and the fuzzy column resolver
//!
//! Business records arrive with whatever headers the source system used
//! ("Net Weight (kg)", "QTY_PRODUCED", "Electricity kWh", ...). The engine
//! never relies on a fixed schema: each quantity it needs is located by a
//! keyword set, scanned case-insensitively over the column names in order.

use serde::{Deserialize, Serialize};

/// Material mass columns in purchase logs
pub const MATERIAL_MASS_KEYWORDS: &[&str] = &["kg", "weight"];

/// Waste mass columns in waste manifests
pub const WASTE_MASS_KEYWORDS: &[&str] = &["kg", "quantity"];

/// Waste type/description column in waste manifests
pub const WASTE_TYPE_KEYWORDS: &[&str] = &["waste"];

/// Produced unit count columns in production logs
pub const PRODUCTION_COUNT_KEYWORDS: &[&str] = &["qty", "produced", "quantity"];

/// Electricity consumption columns in site energy bills
pub const ELECTRICITY_KEYWORDS: &[&str] = &["electric"];

/// Gas consumption columns in site energy bills
pub const GAS_KEYWORDS: &[&str] = &["gas"];

/// Disposal route columns in waste manifests
pub const DISPOSAL_ROUTE_KEYWORDS: &[&str] = &["route", "disposal"];

/// A single cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    /// Parse a raw field, preferring a number when the text is numeric
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Cell::Number(n),
            _ => Cell::Text(raw.to_string()),
        }
    }

    /// Numeric value, if this cell holds one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text rendering of the cell (numbers use their shortest form)
    pub fn as_text(&self) -> String {
        match self {
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Empty => String::new(),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

/// One named column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Cell>,
}

/// Result of summing a column's numeric cells
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColumnSum {
    pub total: f64,
    /// Cells that were neither numeric nor empty
    pub skipped: usize,
}

/// A schema-less table: ordered columns of equal or ragged length
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedTable {
    columns: Vec<Column>,
}

impl NamedTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style column append
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Cell>) -> Self {
        self.push_column(name, values);
        self
    }

    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<Cell>) {
        self.columns.push(Column {
            name: name.into(),
            values,
        });
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Number of rows (length of the longest column)
    pub fn row_count(&self) -> usize {
        self.columns.iter().map(|c| c.values.len()).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Cell at (row, column); missing cells in ragged columns read as empty
    pub fn cell(&self, row: usize, column: &str) -> &Cell {
        static EMPTY: Cell = Cell::Empty;
        self.column(column)
            .and_then(|c| c.values.get(row))
            .unwrap_or(&EMPTY)
    }

    /// Sum the numeric cells of a column
    pub fn sum(&self, column: &str) -> ColumnSum {
        let mut out = ColumnSum::default();
        if let Some(col) = self.column(column) {
            for cell in &col.values {
                match cell {
                    Cell::Number(n) => out.total += n,
                    Cell::Text(_) => out.skipped += 1,
                    Cell::Empty => {}
                }
            }
        }
        out
    }
}

/// Find the first column whose lowercased name contains any of the keywords
///
/// Columns are scanned in table order and the first hit wins; there is no
/// ranking between several matching columns. Keywords are expected in
/// lowercase.
pub fn resolve_column<'a>(table: &'a NamedTable, keywords: &[&str]) -> Option<&'a str> {
    table
        .column_names()
        .find(|name| {
            let lower = name.to_lowercase();
            keywords.iter().any(|k| lower.contains(k))
        })
}
