//! CSV loading into named tables and data bundles

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::table::{Cell, NamedTable};
use crate::entities::bundle::{DataBundle, DatasetKind};

#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("Could not read {path}: {source}")]
    #[diagnostic(code(mfm::load::io), help("check the `data:` paths in the project file"))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in {path}: {source}")]
    #[diagnostic(code(mfm::load::csv))]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Parse CSV text into a table; ragged rows are tolerated
pub fn read_table<R: Read>(reader: R) -> Result<NamedTable, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut columns: Vec<Vec<Cell>> = vec![Vec::new(); headers.len()];

    for record in rdr.records() {
        let record = record?;
        for (i, values) in columns.iter_mut().enumerate() {
            values.push(record.get(i).map(Cell::parse).unwrap_or(Cell::Empty));
        }
    }

    let mut table = NamedTable::new();
    for (name, values) in headers.into_iter().zip(columns) {
        table.push_column(name, values);
    }
    Ok(table)
}

/// Load one CSV file
pub fn load_csv(path: &Path) -> Result<NamedTable, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_table(file).map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        columns = table.columns().len(),
        rows = table.row_count(),
        "loaded csv"
    );
    Ok(table)
}

/// Build a bundle from one optional CSV path per dataset
///
/// Datasets without a path stay empty; the engine records them as gaps.
pub fn load_bundle(paths: &BTreeMap<DatasetKind, PathBuf>) -> Result<DataBundle, LoadError> {
    let mut bundle = DataBundle::new();
    for (kind, path) in paths {
        bundle.insert(*kind, load_csv(path)?);
    }
    info!(datasets = paths.len(), "data bundle loaded");
    Ok(bundle)
}
