//! Terminal visualization of the stage chain
//!
//! Draws the linear chain top to bottom with box-drawing characters, the
//! mass on every link and the inferred loss next to each loss target.

use crate::core::balance::{BalanceResult, EdgeKind};
use crate::core::notes::format_thousands;
use crate::entities::stage::ProcessStage;

/// Narrowest and widest stage box interior
const MIN_BOX_WIDTH: usize = 12;
const MAX_BOX_WIDTH: usize = 28;

/// Render the chain schematic
///
/// # Example Output
/// ```text
/// Goods In (Raw Material)
///   │ 10,000 kg
/// ┌──────────────┐
/// │ Intake       │ intake · 92%
/// └──────────────┘
///   │ 8,000 kg
/// ┌──────────────┐
/// │ Laser        │ cutting · 88%  ↘ 500 kg unaccounted
/// └──────────────┘
///   ↓ 8,000 kg
/// Dispatch (Finished Goods)
/// ```
pub fn render_chain_schematic(stages: &[ProcessStage], result: &BalanceResult) -> String {
    if stages.is_empty() {
        return "  (no stages)".to_string();
    }

    let width = stages
        .iter()
        .map(|s| s.label.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(MIN_BOX_WIDTH, MAX_BOX_WIDTH);

    let links: Vec<f64> = result
        .flows
        .iter()
        .filter(|f| f.kind == EdgeKind::ThroughputProxy)
        .map(|f| f.kg)
        .collect();


    let mut lines = Vec::new();
    lines.push(result.boundary_start.clone());
    lines.push(format!("  │ {} kg", format_thousands(result.material_in_kg)));

    for (i, stage) in stages.iter().enumerate() {
        let mut note = format!("{} · {}%", stage.stage_type, stage.yield_pct);
        if let Some(loss) = result.stage_losses.iter().find(|l| l.stage_index == i) {
            note.push_str(&format!(
                "  ↘ {} kg unaccounted",
                format_thousands(loss.kg)
            ));
        }

        lines.push(format!("┌{}┐", "─".repeat(width + 2)));
        lines.push(format!("│ {:<width$} │ {}", box_label(&stage.label, width), note));
        lines.push(format!("└{}┘", "─".repeat(width + 2)));

        if let Some(kg) = links.get(i) {
            lines.push(format!("  │ {} kg", format_thousands(*kg)));
        }
    }

    lines.push(format!("  ↓ {} kg", format_thousands(result.prod_out_kg)));
    lines.push(result.boundary_end.clone());
    lines.join("\n")
}

/// Truncate string to max length with ellipsis
fn box_label(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        format!("{}…", s.chars().take(max_len - 1).collect::<String>())
    }
}
