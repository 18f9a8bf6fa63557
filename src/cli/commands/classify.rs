//! `mfm classify` command - Suggest dataset kind and column mapping

use std::path::PathBuf;

use console::style;
use miette::Result;
use serde::Serialize;

use crate::assist::{suggest_column_mapping, suggest_dataset_type, ColumnSuggestion};
use crate::cli::output::{effective_format, print_structured};
use crate::cli::GlobalOpts;
use crate::core::loader::load_csv;
use crate::entities::bundle::DatasetKind;

#[derive(clap::Args, Debug)]
pub struct ClassifyArgs {
    /// CSV files to classify
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Skip kind detection and map columns for this dataset kind
    #[arg(long = "as", value_enum, value_name = "KIND")]
    pub kind: Option<DatasetKind>,
}

#[derive(Debug, Serialize)]
struct Classification {
    file: PathBuf,
    kind: DatasetKind,
    rows: usize,
    columns: Vec<ColumnSuggestion>,
}

pub fn run(args: ClassifyArgs, global: &GlobalOpts) -> Result<()> {
    let mut results = Vec::with_capacity(args.files.len());

    for file in args.files {
        let table = load_csv(&file)?;
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let kind = args
            .kind
            .unwrap_or_else(|| suggest_dataset_type(&file_name, table.column_names()));
        results.push(Classification {
            columns: suggest_column_mapping(kind, &table),
            rows: table.row_count(),
            kind,
            file,
        });
    }

    let format = effective_format(global.output, false);
    if print_structured(&results, format)? {
        return Ok(());
    }

    for c in &results {
        println!(
            "{} {} → {} ({} rows)",
            style("→").blue(),
            c.file.display(),
            style(c.kind).cyan(),
            c.rows
        );
        for s in &c.columns {
            match &s.column {
                Some(col) => println!("    {:<16} {}", s.role, col),
                None => println!("    {:<16} {}", s.role, style("(not found)").yellow()),
            }
        }
    }
    Ok(())
}
