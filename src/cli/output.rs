//! Output formatting utilities

use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::OutputFormat;

/// Determine the effective output format for a command
///
/// `Auto` resolves to the command's natural format: text for people,
/// JSON for machine-oriented commands.
pub fn effective_format(format: OutputFormat, machine_default: bool) -> OutputFormat {
    match format {
        OutputFormat::Auto => {
            if machine_default {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            }
        }
        other => other,
    }
}

/// Print a value as JSON or YAML; returns false for text formats
pub fn print_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
            Ok(true)
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(value).into_diagnostic()?);
            Ok(true)
        }
        OutputFormat::Text | OutputFormat::Auto => Ok(false),
    }
}
