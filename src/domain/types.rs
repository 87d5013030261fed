use serde::Serialize;

/// One row of the emission table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportMode {
    pub id: String,
    pub emission_factor_kg_per_km: f64,
    pub label: String,
    pub icon: String,
    pub color: String,
}

impl TransportMode {
    pub fn new(id: &str, factor: f64, label: &str, icon: &str, color: &str) -> Self {
        Self {
            id: id.to_string(),
            emission_factor_kg_per_km: factor,
            label: label.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
        }
    }
}

/// Conversion from kilograms of CO2 to carbon credits and their market price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CarbonCreditPolicy {
    pub kg_per_credit: f64,
    pub price_min_per_credit: f64,
    pub price_max_per_credit: f64,
}

impl Default for CarbonCreditPolicy {
    fn default() -> Self {
        Self {
            kg_per_credit: 1000.0,
            price_min_per_credit: 50.0,
            price_max_per_credit: 150.0,
        }
    }
}

/// A geocoded settlement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub normalized_query_key: String,
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeEmission {
    pub mode_id: String,
    pub emission_kg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Savings {
    pub saved_kg: f64,
    /// Share of the reference emission avoided, 0..=100, one decimal.
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PriceEstimate {
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CalculationResult {
    pub emission_kg: f64,
    pub savings: Savings,
    pub carbon_credits: f64,
    pub price_estimate: PriceEstimate,
}
