//! Ratio KPIs derived from the reconciled balance
//!
//! All ratios return 0.0 when their denominator is not positive.

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Product mass as a share of material input (%)
pub fn material_efficiency_pct(prod_out_kg: f64, material_in_kg: f64) -> f64 {
    ratio(prod_out_kg, material_in_kg) * 100.0
}

/// kg of waste per kg of product
pub fn waste_intensity(waste_out_kg: f64, prod_out_kg: f64) -> f64 {
    ratio(waste_out_kg, prod_out_kg)
}

/// kWh (electricity + gas) per kg of product
pub fn energy_intensity(electricity_kwh: f64, gas_kwh: f64, prod_out_kg: f64) -> f64 {
    ratio(electricity_kwh + gas_kwh, prod_out_kg)
}
