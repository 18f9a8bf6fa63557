//! Circular-economy view: diversion rate and rule-based opportunities

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::extract::WasteTypeRow;
use crate::core::notes::Notes;
use crate::core::scenario::reduce_waste;
use crate::core::table::{resolve_column, NamedTable, DISPOSAL_ROUTE_KEYWORDS, WASTE_MASS_KEYWORDS};

/// Disposal routes counted as diverted from landfill
pub const DIVERTED_ROUTES: &[&str] = &["recycling", "reuse"];

/// A waste-type rule that suggests a circular opportunity
struct OpportunityRule {
    pattern: &'static str,
    threshold_kg: f64,
    message: &'static str,
}

const OPPORTUNITY_RULES: &[OpportunityRule] = &[
    OpportunityRule {
        pattern: "steel|metal|scrap",
        threshold_kg: 500.0,
        message: "High clean metal scrap: consider closed-loop recycling with supplier or local reprocessor.",
    },
    OpportunityRule {
        pattern: "mixed",
        threshold_kg: 300.0,
        message: "Mixed waste is significant: segregation could increase recycling rate and reduce disposal cost.",
    },
    OpportunityRule {
        pattern: "sludge|hazard",
        threshold_kg: 100.0,
        message: "Hazardous/sludge stream: review upstream process controls and chemical use to reduce generation.",
    },
];

fn compiled_rules() -> &'static [(Regex, &'static OpportunityRule)] {
    static RULES: OnceLock<Vec<(Regex, &'static OpportunityRule)>> = OnceLock::new();
    RULES.get_or_init(|| {
        OPPORTUNITY_RULES
            .iter()
            .filter_map(|rule| Regex::new(rule.pattern).ok().map(|re| (re, rule)))
            .collect()
    })
}

/// Diversion figures after the scrap reduction scenario
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Diversion {
    pub diverted_kg: f64,
    pub diversion_pct: f64,
}

/// Mass routed to recycling/reuse, scaled like total waste for consistency
pub fn diversion(
    waste: &NamedTable,
    waste_out_scn: f64,
    scrap_reduction_pct: f64,
    notes: &mut Notes,
) -> Diversion {
    let Some(route_col) = resolve_column(waste, DISPOSAL_ROUTE_KEYWORDS) else {
        notes.assume("No disposal route column detected; diversion % may be incomplete.");
        return Diversion::default();
    };
    let Some(kg_col) = resolve_column(waste, WASTE_MASS_KEYWORDS) else {
        notes.assume("Disposal route found but no quantity column; diversion treated as 0 kg.");
        return Diversion::default();
    };

    let diverted_raw: f64 = (0..waste.row_count())
        .filter(|&row| {
            let route = waste.cell(row, route_col).as_text().trim().to_lowercase();
            DIVERTED_ROUTES.contains(&route.as_str())
        })
        .filter_map(|row| waste.cell(row, kg_col).as_f64())
        .sum();

    let diverted_kg = reduce_waste(diverted_raw, scrap_reduction_pct);
    let diversion_pct = if waste_out_scn > 0.0 {
        diverted_kg / waste_out_scn * 100.0
    } else {
        0.0
    };
    debug!(route_col, diverted_kg, diversion_pct, "computed diversion");

    Diversion {
        diverted_kg,
        diversion_pct,
    }
}

/// Evaluate every opportunity rule against the waste-by-type rows
///
/// Each rule sums the rows whose lowercased type matches its pattern and
/// fires when the sum strictly exceeds its threshold.
pub fn opportunities(waste_by_type: &[WasteTypeRow]) -> Vec<String> {
    compiled_rules()
        .iter()
        .filter_map(|(re, rule)| {
            let matched: f64 = waste_by_type
                .iter()
                .filter(|row| re.is_match(&row.waste_type.to_lowercase()))
                .map(|row| row.quantity_kg)
                .sum();
            (matched > rule.threshold_kg).then(|| rule.message.to_string())
        })
        .collect()
}
