//! Assumption and highlight accumulation
//!
//! Every data gap degrades to a default value plus a human-readable
//! assumption; every applied scenario or notable inference adds a highlight.
//! Both lists keep insertion order for display.

use serde::{Deserialize, Serialize};

/// Ordered assumption and highlight messages gathered during one computation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Notes {
    pub assumptions: Vec<String>,
    pub highlights: Vec<String>,
}

impl Notes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assume(&mut self, message: impl Into<String>) {
        self.assumptions.push(message.into());
    }

    pub fn highlight(&mut self, message: impl Into<String>) {
        self.highlights.push(message.into());
    }
}

/// Format a quantity with thousands separators and no decimals (`12,345`)
pub fn format_thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let negative = value < 0.0 && digits != "0";

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    if negative {
        format!("-{}", out)
    } else {
        out
    }
}
