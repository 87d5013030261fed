use itertools::Itertools;
use tracing::trace;

use super::table::EmissionTable;
use crate::config::constant::CO2_PER_TREE_KG;
use crate::domain::types::{
    CalculationResult, CarbonCreditPolicy, ModeEmission, PriceEstimate, Savings,
};
use crate::utils::{is_valid_amount, round_to};

/// Emission arithmetic over an injected table and credit policy.
///
/// Every operation is total: a negative, NaN or infinite input, or an unknown
/// mode id, yields zero rather than an error so callers can render the result
/// unconditionally.
#[derive(Debug, Clone, Default)]
pub struct EmissionCalculator {
    table: EmissionTable,
    policy: CarbonCreditPolicy,
}

impl EmissionCalculator {
    pub fn new(table: EmissionTable, policy: CarbonCreditPolicy) -> Self {
        Self { table, policy }
    }

    pub fn table(&self) -> &EmissionTable {
        &self.table
    }

    pub fn policy(&self) -> &CarbonCreditPolicy {
        &self.policy
    }

    pub fn emission_factor(&self, mode_id: &str) -> f64 {
        self.table
            .get(mode_id)
            .map_or(0.0, |m| m.emission_factor_kg_per_km)
    }

    pub fn calculate_emission(&self, mode_id: &str, distance_km: f64) -> f64 {
        if !is_valid_amount(distance_km) {
            trace!("Ignoring invalid distance {} for '{}'", distance_km, mode_id);
            return 0.0;
        }
        distance_km * self.emission_factor(mode_id)
    }

    /// Emission of every configured mode, least polluting first. Ties keep table order.
    pub fn calculate_all_modes(&self, distance_km: f64) -> Vec<ModeEmission> {
        self.table
            .modes()
            .iter()
            .map(|mode| ModeEmission {
                mode_id: mode.id.clone(),
                emission_kg: self.calculate_emission(&mode.id, distance_km),
            })
            .sorted_by(|a, b| a.emission_kg.total_cmp(&b.emission_kg))
            .collect()
    }

    pub fn calculate_savings(&self, selected_mode_id: &str, distance_km: f64) -> Savings {
        let reference = self.calculate_emission(self.table.reference_mode(), distance_km);
        let selected = self.calculate_emission(selected_mode_id, distance_km);

        let saved_kg = (reference - selected).max(0.0);
        let percentage = if reference > 0.0 {
            round_to(saved_kg / reference * 100.0, 1)
        } else {
            0.0
        };

        Savings {
            saved_kg,
            percentage,
        }
    }

    pub fn calculate_carbon_credits(&self, emission_kg: f64) -> f64 {
        if !is_valid_amount(emission_kg) {
            return 0.0;
        }
        emission_kg / self.policy.kg_per_credit
    }

    pub fn estimate_credit_price(&self, credits: f64) -> PriceEstimate {
        if !is_valid_amount(credits) {
            return PriceEstimate::default();
        }
        let min = credits * self.policy.price_min_per_credit;
        let max = credits * self.policy.price_max_per_credit;
        PriceEstimate {
            min,
            max,
            average: (min + max) / 2.0,
        }
    }

    /// Trees needed to absorb `emission_kg` of CO2 in a year.
    pub fn calculate_tree_equivalent(&self, emission_kg: f64) -> u64 {
        if !is_valid_amount(emission_kg) {
            return 0;
        }
        (emission_kg / CO2_PER_TREE_KG).ceil() as u64
    }

    pub fn calculate(&self, mode_id: &str, distance_km: f64) -> CalculationResult {
        let emission_kg = self.calculate_emission(mode_id, distance_km);
        let carbon_credits = self.calculate_carbon_credits(emission_kg);
        CalculationResult {
            emission_kg,
            savings: self.calculate_savings(mode_id, distance_km),
            carbon_credits,
            price_estimate: self.estimate_credit_price(carbon_credits),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn calc() -> EmissionCalculator {
        EmissionCalculator::default()
    }

    #[test]
    fn emission_is_distance_times_factor() {
        let c = calc();
        for mode in c.table().modes() {
            for d in [0.0, 1.0, 42.5, 1000.0] {
                assert_eq!(
                    c.calculate_emission(&mode.id, d),
                    d * mode.emission_factor_kg_per_km
                );
            }
        }
        assert!((c.calculate_emission("car", 100.0) - 12.0).abs() < EPS);
        assert_eq!(c.calculate_emission("bicycle", 250.0), 0.0);
    }

    #[test]
    fn invalid_distance_gives_zero() {
        let c = calc();
        for mode in ["bicycle", "car", "bus", "truck", "rocket"] {
            for d in [-1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
                assert_eq!(c.calculate_emission(mode, d), 0.0);
            }
        }
    }

    #[test]
    fn unknown_mode_has_zero_factor() {
        let c = calc();
        assert_eq!(c.emission_factor("rocket"), 0.0);
        assert_eq!(c.calculate_emission("rocket", 100.0), 0.0);
    }

    #[test]
    fn all_modes_sorted_ascending() {
        let c = calc();
        let all = c.calculate_all_modes(100.0);
        let ids: Vec<&str> = all.iter().map(|m| m.mode_id.as_str()).collect();
        assert_eq!(ids, ["bicycle", "bus", "car", "truck"]);
        assert!((all[1].emission_kg - 8.9).abs() < EPS);
        assert!((all[2].emission_kg - 12.0).abs() < EPS);
        assert!((all[3].emission_kg - 96.0).abs() < EPS);
        assert!(all.windows(2).all(|w| w[0].emission_kg <= w[1].emission_kg));
    }

    #[test]
    fn ties_keep_table_order() {
        let ids: Vec<String> = calc()
            .calculate_all_modes(0.0)
            .into_iter()
            .map(|m| m.mode_id)
            .collect();
        assert_eq!(ids, ["bicycle", "car", "bus", "truck"]);
    }

    #[test]
    fn savings_against_car() {
        let c = calc();
        let s = c.calculate_savings("bus", 100.0);
        assert!((s.saved_kg - 3.1).abs() < EPS);
        assert_eq!(s.percentage, 25.8);

        let s = c.calculate_savings("bicycle", 100.0);
        assert!((s.saved_kg - 12.0).abs() < EPS);
        assert_eq!(s.percentage, 100.0);
    }

    #[test]
    fn savings_never_negative() {
        let c = calc();
        for d in [0.0, 10.0, 100.0, 5000.0] {
            assert_eq!(c.calculate_savings("car", d), Savings::default());
            assert_eq!(c.calculate_savings("truck", d).saved_kg, 0.0);
            for mode in c.table().modes() {
                let s = c.calculate_savings(&mode.id, d);
                assert!(s.saved_kg >= 0.0);
                assert!((0.0..=100.0).contains(&s.percentage));
            }
        }
    }

    #[test]
    fn zero_reference_gives_zero_percentage() {
        let s = calc().calculate_savings("bicycle", 0.0);
        assert_eq!(s, Savings::default());
    }

    #[test]
    fn credits_and_price() {
        let c = calc();
        assert_eq!(c.calculate_carbon_credits(1000.0), 1.0);
        assert_eq!(c.calculate_carbon_credits(-5.0), 0.0);
        assert_eq!(c.calculate_carbon_credits(f64::NAN), 0.0);

        let price = c.estimate_credit_price(1.0);
        assert_eq!(
            price,
            PriceEstimate {
                min: 50.0,
                max: 150.0,
                average: 100.0
            }
        );
        assert_eq!(c.estimate_credit_price(-1.0), PriceEstimate::default());
        assert_eq!(c.estimate_credit_price(f64::NAN), PriceEstimate::default());
    }

    #[test]
    fn average_is_midpoint() {
        let c = calc();
        for credits in [0.0, 0.0123, 1.0, 7.5, 321.0] {
            let p = c.estimate_credit_price(credits);
            assert_eq!(p.average, (p.min + p.max) / 2.0);
        }
    }

    #[test]
    fn tree_equivalent_rounds_up() {
        let c = calc();
        assert_eq!(c.calculate_tree_equivalent(0.0), 0);
        assert_eq!(c.calculate_tree_equivalent(1.0), 1);
        assert_eq!(c.calculate_tree_equivalent(22.0), 1);
        assert_eq!(c.calculate_tree_equivalent(96.0), 5);
        assert_eq!(c.calculate_tree_equivalent(-3.0), 0);
    }

    #[test]
    fn full_calculation() {
        let r = calc().calculate("truck", 1000.0);
        assert!((r.emission_kg - 960.0).abs() < EPS);
        assert_eq!(r.savings, Savings::default());
        assert!((r.carbon_credits - 0.96).abs() < EPS);
        assert!((r.price_estimate.average - 96.0).abs() < EPS);
    }
}
