use super::ui;
use crate::core::currency::{COST_CURRENCY, SALE_CURRENCY};
use crate::core::{
    CurrencyRateProvider, Field, InputUpdate, RateQuote, ScenarioInputs, ScenarioResults, compute,
    refresh_rates,
};
use anyhow::Result;
use comfy_table::Cell;
use serde::Serialize;
use std::io::Write;
use tracing::{debug, warn};

/// Options of a one-shot calculation.
#[derive(Debug, Clone, Default)]
pub struct CalcOptions {
    pub overrides: InputUpdate,
    pub refresh_rates: bool,
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct CalcOutput<'a> {
    inputs: &'a ScenarioInputs,
    results: &'a ScenarioResults,
    #[serde(skip_serializing_if = "Option::is_none")]
    rates: Option<&'a RateQuote>,
    warnings: Vec<String>,
}

pub fn inputs_table(inputs: &ScenarioInputs) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Input"),
        ui::header_cell("Field"),
        ui::header_cell("Value"),
    ]);
    for field in Field::ALL {
        table.add_row(vec![
            Cell::new(field.label()),
            Cell::new(ui::style_text(field.alias(), ui::StyleType::Subtle)),
            ui::amount_cell(inputs.get(field)),
        ]);
    }
    table.to_string()
}

pub fn results_table(inputs: &ScenarioInputs, results: &ScenarioResults) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Result"),
        ui::header_cell(&format!("Amount ({SALE_CURRENCY})")),
    ]);

    let income_tax_label = format!("Income tax ({}%)", inputs.tax_rate);
    let rows = [
        ("Total cost", ui::amount_cell(results.full_cost_target)),
        ("Cost per ton", ui::amount_cell(results.cost_per_unit_target)),
        ("Total sale", ui::amount_cell(results.total_sale_target)),
        ("VAT amount", ui::amount_cell(results.tax_on_sale_amount)),
        ("Gross profit", ui::profit_cell(results.gross_profit)),
        (income_tax_label.as_str(), ui::amount_cell(results.income_tax)),
        ("Net profit", ui::profit_cell(results.net_profit)),
        (
            "Net profit per ton",
            ui::profit_cell(results.net_profit_per_unit(inputs)),
        ),
    ];
    for (label, cell) in rows {
        table.add_row(vec![Cell::new(label), cell]);
    }
    table.to_string()
}

/// Landed cost breakdown in the cost currency.
pub fn breakdown_table(results: &ScenarioResults) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Cost item"),
        ui::header_cell(&format!("Amount ({COST_CURRENCY})")),
    ]);
    let rows = [
        ("Freight", results.freight_in_local),
        ("Goods + freight", results.total_landed_local),
        ("Customs (6%)", results.customs),
        ("Insurance (1%)", results.insurance),
        ("Labeling / depot (1%)", results.labeling),
        ("Full landed cost", results.full_cost_local),
    ];
    for (label, amount) in rows {
        table.add_row(vec![Cell::new(label), ui::amount_cell(amount)]);
    }
    table.to_string()
}

pub fn target_section(inputs: &ScenarioInputs, results: &ScenarioResults) -> String {
    let rows = [
        (
            "Target net profit per ton",
            ui::format_amount(inputs.target_net_profit_per_unit),
        ),
        (
            "Required gross profit per ton",
            ui::format_amount(results.required_gross_profit_per_unit),
        ),
        (
            "Required price (excl. VAT)",
            ui::format_amount(results.required_selling_price_per_unit),
        ),
        (
            "Required price (incl. VAT)",
            ui::format_amount(results.required_selling_price_per_unit_with_vat),
        ),
    ];
    let mut output = ui::style_text("Target price recommendation", ui::StyleType::Title);
    for (label, value) in rows {
        output.push_str(&format!(
            "\n{}: {} {SALE_CURRENCY}",
            ui::style_text(label, ui::StyleType::TotalLabel),
            ui::style_text(&value, ui::StyleType::TotalValue)
        ));
    }
    output
}

/// Renders one full screen: inputs, warnings, breakdown, results and target.
pub fn render_report(inputs: &ScenarioInputs, quote: Option<&RateQuote>) -> String {
    let results = compute(inputs);
    let mut output = format!(
        "{}\n{}\n",
        ui::style_text("Inputs", ui::StyleType::Title),
        inputs_table(inputs)
    );

    if let Some(quote) = quote {
        output.push_str(&ui::style_text(
            &format!(
                "Rates as of {}: EUR/TRY {:.2}, SEK/TRY {:.2}\n",
                quote.fetched_at.format("%Y-%m-%d %H:%M UTC"),
                quote.euro_rate,
                quote.sek_rate
            ),
            ui::StyleType::Subtle,
        ));
    }

    for warning in inputs.diagnostics() {
        output.push_str(&ui::style_text(
            &format!("warning: {warning}\n"),
            ui::StyleType::Warning,
        ));
    }

    output.push_str(&format!(
        "\n{}\n{}\n\n{}\n{}\n\n{}",
        ui::style_text("Landed cost", ui::StyleType::Title),
        breakdown_table(&results),
        ui::style_text("Results", ui::StyleType::Title),
        results_table(inputs, &results),
        target_section(inputs, &results)
    ));
    output
}

pub fn render_json(inputs: &ScenarioInputs, quote: Option<&RateQuote>) -> Result<String> {
    let results = compute(inputs);
    let output = CalcOutput {
        inputs,
        results: &results,
        rates: quote,
        warnings: inputs
            .diagnostics()
            .iter()
            .map(ToString::to_string)
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Fetches fresh rates behind a spinner.
pub async fn refresh_with_spinner(
    provider: &(dyn CurrencyRateProvider + Send + Sync),
    inputs: &ScenarioInputs,
) -> Result<(ScenarioInputs, RateQuote)> {
    let pb = ui::new_spinner("Fetching exchange rates...");
    let refreshed = refresh_rates(provider, inputs).await;
    pb.finish_and_clear();
    refreshed
}

/// Applies the overrides, optionally refreshes rates, and writes the report to `out`.
pub async fn run<W: Write>(
    base: &ScenarioInputs,
    options: &CalcOptions,
    provider: &(dyn CurrencyRateProvider + Send + Sync),
    out: &mut W,
) -> Result<()> {
    if !options.overrides.is_empty() {
        let fields: Vec<String> = options.overrides.fields().map(|f| f.to_string()).collect();
        debug!(?fields, "Applying command line overrides");
    }
    let mut inputs = base.apply(&options.overrides);
    let mut quote = None;
    if options.refresh_rates {
        match refresh_with_spinner(provider, &inputs).await {
            Ok((next, fetched)) => {
                inputs = next;
                quote = Some(fetched);
            }
            Err(e) => {
                warn!(error = ?e, "Rate refresh failed, keeping previous rates");
                eprintln!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
            }
        }
    }

    for warning in inputs.diagnostics() {
        warn!(%warning, "Suspicious input");
    }

    if options.json {
        writeln!(out, "{}", render_json(&inputs, quote.as_ref())?)?;
    } else {
        writeln!(out, "{}", render_report(&inputs, quote.as_ref()))?;
    }
    Ok(())
}
