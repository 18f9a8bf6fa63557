//! YAML project file I/O with source-span diagnostics

pub mod diagnostics;
pub mod parser;

pub use diagnostics::{YamlError, YamlSyntaxError};
pub use parser::{parse_yaml, parse_yaml_file, write_yaml_file};
