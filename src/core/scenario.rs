//! Scenario inputs and the editable field surface.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// One immutable snapshot of the nine calculator inputs.
///
/// Monetary fields are in the currency named by their suffix in [`Field::label`]:
/// product cost in TRY, freight in EUR, prices and profits in SEK.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioInputs {
    pub product_cost: f64,
    pub freight_cost: f64,
    pub euro_rate: f64,
    pub sek_rate: f64,
    pub selling_price: f64,
    pub tonnage: f64,
    pub kdv_rate: f64,
    pub tax_rate: f64,
    pub target_net_profit_per_unit: f64,
}

impl Default for ScenarioInputs {
    fn default() -> Self {
        ScenarioInputs {
            product_cost: 600_000.0,
            freight_cost: 4_500.0,
            euro_rate: 45.0,
            sek_rate: 4.11,
            selling_price: 11_500.0,
            tonnage: 20.0,
            kdv_rate: 12.0,
            tax_rate: 22.0,
            target_net_profit_per_unit: 1_000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ProductCost,
    FreightCost,
    EuroRate,
    SekRate,
    SellingPrice,
    Tonnage,
    KdvRate,
    TaxRate,
    TargetNetProfitPerUnit,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::ProductCost,
        Field::FreightCost,
        Field::EuroRate,
        Field::SekRate,
        Field::SellingPrice,
        Field::Tonnage,
        Field::KdvRate,
        Field::TaxRate,
        Field::TargetNetProfitPerUnit,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::ProductCost => "product_cost",
            Field::FreightCost => "freight_cost",
            Field::EuroRate => "euro_rate",
            Field::SekRate => "sek_rate",
            Field::SellingPrice => "selling_price",
            Field::Tonnage => "tonnage",
            Field::KdvRate => "kdv_rate",
            Field::TaxRate => "tax_rate",
            Field::TargetNetProfitPerUnit => "target_net_profit_per_unit",
        }
    }

    pub fn alias(&self) -> &'static str {
        match self {
            Field::ProductCost => "cost",
            Field::FreightCost => "freight",
            Field::EuroRate => "eur",
            Field::SekRate => "sek",
            Field::SellingPrice => "price",
            Field::Tonnage => "tons",
            Field::KdvRate => "kdv",
            Field::TaxRate => "tax",
            Field::TargetNetProfitPerUnit => "target",
        }
    }

    /// Human readable label including the unit of the field.
    pub fn label(&self) -> &'static str {
        match self {
            Field::ProductCost => "Product cost (TRY)",
            Field::FreightCost => "Freight (EUR)",
            Field::EuroRate => "EUR/TRY rate",
            Field::SekRate => "SEK/TRY rate",
            Field::SellingPrice => "Selling price (SEK/ton, excl. VAT)",
            Field::Tonnage => "Tonnage (ton)",
            Field::KdvRate => "VAT rate (%)",
            Field::TaxRate => "Income tax rate (%)",
            Field::TargetNetProfitPerUnit => "Target net profit (SEK/ton)",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Field {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Field::ALL
            .into_iter()
            .find(|field| field.name() == wanted || field.alias() == wanted)
            .ok_or_else(|| anyhow::anyhow!("Unknown field: {}", s.trim()))
    }
}

/// Parses a user supplied amount. Malformed text yields NaN instead of an error,
/// so it flows through the calculation like any other value.
pub fn parse_amount(text: &str) -> f64 {
    let normalized = text.trim().replace(',', ".");
    normalized.parse::<f64>().unwrap_or(f64::NAN)
}

/// A partial set of field values. Applying it yields a fresh snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputUpdate {
    values: Vec<(Field, f64)>,
}

impl InputUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: Field, value: f64) -> Self {
        self.values.retain(|(f, _)| *f != field);
        self.values.push((field, value));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.values.iter().map(|(f, _)| *f)
    }
}

/// A non-blocking observation about an input value.
#[derive(Debug, Clone, PartialEq)]
pub struct InputWarning {
    pub field: Field,
    pub message: String,
}

impl Display for InputWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ScenarioInputs {
    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::ProductCost => self.product_cost,
            Field::FreightCost => self.freight_cost,
            Field::EuroRate => self.euro_rate,
            Field::SekRate => self.sek_rate,
            Field::SellingPrice => self.selling_price,
            Field::Tonnage => self.tonnage,
            Field::KdvRate => self.kdv_rate,
            Field::TaxRate => self.tax_rate,
            Field::TargetNetProfitPerUnit => self.target_net_profit_per_unit,
        }
    }

    /// Returns a copy with `field` replaced by `value`.
    pub fn with(&self, field: Field, value: f64) -> Self {
        let mut next = *self;
        let slot = match field {
            Field::ProductCost => &mut next.product_cost,
            Field::FreightCost => &mut next.freight_cost,
            Field::EuroRate => &mut next.euro_rate,
            Field::SekRate => &mut next.sek_rate,
            Field::SellingPrice => &mut next.selling_price,
            Field::Tonnage => &mut next.tonnage,
            Field::KdvRate => &mut next.kdv_rate,
            Field::TaxRate => &mut next.tax_rate,
            Field::TargetNetProfitPerUnit => &mut next.target_net_profit_per_unit,
        };
        *slot = value;
        next
    }

    pub fn apply(&self, update: &InputUpdate) -> Self {
        update
            .values
            .iter()
            .fold(*self, |acc, (field, value)| acc.with(*field, *value))
    }

    /// Lists suspicious values. Nothing here blocks the calculation.
    pub fn diagnostics(&self) -> Vec<InputWarning> {
        let mut warnings = Vec::new();
        for field in Field::ALL {
            let value = self.get(field);
            let message = if !value.is_finite() {
                Some("value is not a finite number".to_string())
            } else {
                match field {
                    Field::Tonnage | Field::EuroRate | Field::SekRate if value <= 0.0 => {
                        Some(format!("{value} should be greater than zero"))
                    }
                    Field::KdvRate | Field::TaxRate if !(0.0..=100.0).contains(&value) => {
                        Some(format!("{value}% is outside 0-100"))
                    }
                    Field::TaxRate if value == 100.0 => {
                        Some("100% leaves no net profit to target".to_string())
                    }
                    Field::ProductCost | Field::FreightCost if value < 0.0 => {
                        Some(format!("{value} is negative"))
                    }
                    _ => None,
                }
            };
            if let Some(message) = message {
                warnings.push(InputWarning { field, message });
            }
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_from_str_accepts_names_and_aliases() {
        assert_eq!("product_cost".parse::<Field>().unwrap(), Field::ProductCost);
        assert_eq!("Target".parse::<Field>().unwrap(), Field::TargetNetProfitPerUnit);
        assert_eq!("sek-rate".parse::<Field>().unwrap(), Field::SekRate);
        assert_eq!(" tons ".parse::<Field>().unwrap(), Field::Tonnage);
        let err = "weight".parse::<Field>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown field: weight");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("4.11"), 4.11);
        assert_eq!(parse_amount(" 4,11 "), 4.11);
        assert_eq!(parse_amount("-3"), -3.0);
        assert!(parse_amount("abc").is_nan());
        assert!(parse_amount("").is_nan());
    }

    #[test]
    fn test_with_returns_new_snapshot() {
        let original = ScenarioInputs::default();
        let edited = original.with(Field::Tonnage, 25.0);
        assert_eq!(edited.tonnage, 25.0);
        assert_eq!(original.tonnage, 20.0);
        for field in Field::ALL.into_iter().filter(|f| *f != Field::Tonnage) {
            assert_eq!(edited.get(field), original.get(field));
        }
    }

    #[test]
    fn test_apply_partial_update_last_value_wins() {
        let update = InputUpdate::new()
            .set(Field::EuroRate, 46.0)
            .set(Field::SekRate, 4.2)
            .set(Field::EuroRate, 47.5);
        assert_eq!(update.fields().count(), 2);

        let next = ScenarioInputs::default().apply(&update);
        assert_eq!(next.euro_rate, 47.5);
        assert_eq!(next.sek_rate, 4.2);
        assert_eq!(next.product_cost, 600_000.0);
    }

    #[test]
    fn test_diagnostics() {
        assert!(ScenarioInputs::default().diagnostics().is_empty());

        let inputs = ScenarioInputs::default()
            .with(Field::Tonnage, 0.0)
            .with(Field::TaxRate, 120.0)
            .with(Field::FreightCost, f64::NAN);
        let warnings = inputs.diagnostics();
        let fields: Vec<Field> = warnings.iter().map(|w| w.field).collect();
        assert_eq!(
            fields,
            vec![Field::FreightCost, Field::Tonnage, Field::TaxRate]
        );
        assert_eq!(warnings[2].to_string(), "tax_rate: 120% is outside 0-100");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let inputs: ScenarioInputs = serde_yaml::from_str("tonnage: 10\nkdv_rate: 25").unwrap();
        assert_eq!(inputs.tonnage, 10.0);
        assert_eq!(inputs.kdv_rate, 25.0);
        assert_eq!(inputs.sek_rate, 4.11);
    }
}
