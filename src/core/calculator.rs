//! Landed cost, margin and target price calculations.
//!
//! Everything here is a pure function of a [`ScenarioInputs`] snapshot. No value
//! is rounded between steps; rounding is left to whoever displays the results.
//! Degenerate inputs (zero tonnage, a 100% tax rate) produce infinities or NaN
//! rather than errors.
use crate::core::scenario::ScenarioInputs;
use serde::Serialize;

/// Customs duty as a fraction of the product cost.
pub const CUSTOMS_RATE: f64 = 0.06;
/// Cargo insurance as a fraction of the product cost.
pub const INSURANCE_RATE: f64 = 0.01;
/// Labeling and depot handling as a fraction of the product cost.
pub const LABELING_RATE: f64 = 0.01;

/// Every value derived from one scenario.
///
/// `_local` values are in the cost currency (TRY), `_target` values and all
/// profit and price figures are in the sale currency (SEK).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioResults {
    pub freight_in_local: f64,
    pub total_landed_local: f64,
    pub customs: f64,
    pub insurance: f64,
    pub labeling: f64,
    pub full_cost_local: f64,
    pub full_cost_target: f64,
    pub cost_per_unit_target: f64,
    pub total_sale_target: f64,
    /// VAT on the sale total. Shown for information, never deducted from profit.
    pub tax_on_sale_amount: f64,
    pub gross_profit: f64,
    pub income_tax: f64,
    pub net_profit: f64,
    pub required_gross_profit_per_unit: f64,
    pub required_selling_price_per_unit: f64,
    pub required_selling_price_per_unit_with_vat: f64,
}

impl ScenarioResults {
    /// Net profit divided over the sold quantity.
    pub fn net_profit_per_unit(&self, inputs: &ScenarioInputs) -> f64 {
        self.net_profit / inputs.tonnage
    }
}

pub fn compute(inputs: &ScenarioInputs) -> ScenarioResults {
    let freight_in_local = inputs.freight_cost * inputs.euro_rate;
    let total_landed_local = inputs.product_cost + freight_in_local;

    let customs = inputs.product_cost * CUSTOMS_RATE;
    let insurance = inputs.product_cost * INSURANCE_RATE;
    let labeling = inputs.product_cost * LABELING_RATE;

    let full_cost_local = total_landed_local + customs + insurance + labeling;
    let full_cost_target = full_cost_local / inputs.sek_rate;
    let cost_per_unit_target = full_cost_target / inputs.tonnage;

    let total_sale_target = inputs.selling_price * inputs.tonnage;
    let tax_on_sale_amount = total_sale_target * (inputs.kdv_rate / 100.0);
    let gross_profit = total_sale_target - full_cost_target;
    let income_tax = gross_profit * (inputs.tax_rate / 100.0);
    let net_profit = gross_profit - income_tax;

    // Working back from the wanted net profit: gross = net / (1 - tax).
    let required_gross_profit_per_unit =
        inputs.target_net_profit_per_unit / (1.0 - inputs.tax_rate / 100.0);
    let required_selling_price_per_unit = cost_per_unit_target + required_gross_profit_per_unit;
    let required_selling_price_per_unit_with_vat =
        required_selling_price_per_unit * (1.0 + inputs.kdv_rate / 100.0);

    ScenarioResults {
        freight_in_local,
        total_landed_local,
        customs,
        insurance,
        labeling,
        full_cost_local,
        full_cost_target,
        cost_per_unit_target,
        total_sale_target,
        tax_on_sale_amount,
        gross_profit,
        income_tax,
        net_profit,
        required_gross_profit_per_unit,
        required_selling_price_per_unit,
        required_selling_price_per_unit_with_vat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scenario::Field;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_reference_scenario() {
        let results = compute(&ScenarioInputs::default());

        assert_eq!(results.freight_in_local, 202_500.0);
        assert_eq!(results.total_landed_local, 802_500.0);
        assert_close(results.customs, 36_000.0, 1e-9);
        assert_close(results.insurance, 6_000.0, 1e-9);
        assert_close(results.labeling, 6_000.0, 1e-9);
        assert_close(results.full_cost_local, 850_500.0, 1e-9);
        assert_close(results.full_cost_target, 206_934.3066, 1e-3);
        assert_close(results.cost_per_unit_target, 10_346.7153, 1e-3);
        assert_eq!(results.total_sale_target, 230_000.0);
        assert_close(results.tax_on_sale_amount, 27_600.0, 1e-9);
        assert_close(results.gross_profit, 23_065.6934, 1e-3);
        assert_close(results.income_tax, 5_074.4526, 1e-3);
        assert_close(results.net_profit, 17_991.2409, 1e-3);
        assert_close(results.required_gross_profit_per_unit, 1_282.0513, 1e-3);
        assert_close(results.required_selling_price_per_unit, 11_628.7666, 1e-3);
        assert_close(
            results.required_selling_price_per_unit_with_vat,
            13_024.2186,
            1e-3,
        );
    }

    #[test]
    fn test_cost_per_unit_times_tonnage_is_full_cost() {
        for (tonnage, sek_rate) in [(1.0, 0.5), (3.7, 4.11), (250.0, 12.0)] {
            let inputs = ScenarioInputs::default()
                .with(Field::Tonnage, tonnage)
                .with(Field::SekRate, sek_rate);
            let results = compute(&inputs);
            assert_eq!(
                results.full_cost_target,
                results.full_cost_local / sek_rate
            );
            assert_close(
                results.cost_per_unit_target * tonnage,
                results.full_cost_target,
                1e-6,
            );
        }
    }

    #[test]
    fn test_net_profit_is_gross_less_income_tax() {
        for tax_rate in [0.0, 22.0, 50.0, 99.0] {
            let inputs = ScenarioInputs::default().with(Field::TaxRate, tax_rate);
            let results = compute(&inputs);
            assert_eq!(
                results.net_profit,
                results.gross_profit - results.gross_profit * (tax_rate / 100.0)
            );
            assert_close(
                results.net_profit,
                results.gross_profit * (1.0 - tax_rate / 100.0),
                1e-6,
            );
        }
    }

    #[test]
    fn test_required_price_yields_target_net_profit() {
        for (tax_rate, target) in [(22.0, 1_000.0), (0.0, 250.0), (45.0, 3_000.0)] {
            let inputs = ScenarioInputs::default()
                .with(Field::TaxRate, tax_rate)
                .with(Field::TargetNetProfitPerUnit, target);
            let required = compute(&inputs).required_selling_price_per_unit;

            let priced = inputs.with(Field::SellingPrice, required);
            let results = compute(&priced);
            assert_close(results.net_profit_per_unit(&priced), target, 1e-6);
        }
    }

    #[test]
    fn test_vat_is_not_deducted_from_profit() {
        let base = compute(&ScenarioInputs::default());
        let more_vat = compute(&ScenarioInputs::default().with(Field::KdvRate, 25.0));
        assert_ne!(base.tax_on_sale_amount, more_vat.tax_on_sale_amount);
        assert_eq!(base.gross_profit, more_vat.gross_profit);
        assert_eq!(base.net_profit, more_vat.net_profit);
        assert_eq!(
            base.required_selling_price_per_unit,
            more_vat.required_selling_price_per_unit
        );
    }

    #[test]
    fn test_full_tax_rate_gives_infinite_required_gross_profit() {
        let results = compute(&ScenarioInputs::default().with(Field::TaxRate, 100.0));
        assert!(results.required_gross_profit_per_unit.is_infinite());
        assert!(results.required_selling_price_per_unit.is_infinite());
        assert_eq!(results.net_profit, 0.0);
    }

    #[test]
    fn test_zero_tonnage_gives_infinite_cost_per_unit() {
        let results = compute(&ScenarioInputs::default().with(Field::Tonnage, 0.0));
        assert!(results.cost_per_unit_target.is_infinite());
        assert_eq!(results.total_sale_target, 0.0);
        assert!(results.full_cost_target.is_finite());
    }

    #[test]
    fn test_nan_input_propagates() {
        let results = compute(&ScenarioInputs::default().with(Field::FreightCost, f64::NAN));
        assert!(results.freight_in_local.is_nan());
        assert!(results.full_cost_target.is_nan());
        assert!(results.net_profit.is_nan());
        assert!(results.customs.is_finite());
        assert!(results.total_sale_target.is_finite());
    }
}
