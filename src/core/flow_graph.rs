//! Indexed flow graph for Sankey-style renderers

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::balance::FlowEdge;

/// Node labels plus parallel source/target/value vectors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowGraph {
    pub labels: Vec<String>,
    pub sources: Vec<usize>,
    pub targets: Vec<usize>,
    pub values: Vec<f64>,
}

impl FlowGraph {
    /// Index an edge list
    ///
    /// Labels are deduplicated in first-occurrence order over every `from`
    /// label followed by every `to` label. Zero-magnitude edges are kept.
    pub fn from_edges(edges: &[FlowEdge]) -> Self {
        let mut labels: Vec<String> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        let endpoints = edges
            .iter()
            .map(|e| e.from.as_str())
            .chain(edges.iter().map(|e| e.to.as_str()));
        for label in endpoints {
            index.entry(label).or_insert_with(|| {
                labels.push(label.to_string());
                labels.len() - 1
            });
        }

        let sources = edges.iter().map(|e| index[e.from.as_str()]).collect();
        let targets = edges.iter().map(|e| index[e.to.as_str()]).collect();
        let values = edges.iter().map(|e| e.kg).collect();

        Self {
            labels,
            sources,
            targets,
            values,
        }
    }

    pub fn edge_count(&self) -> usize {
        self.values.len()
    }
}
