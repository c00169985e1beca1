use super::ui;
use crate::core::rates::fetch_quote;
use crate::core::CurrencyRateProvider;
use anyhow::Result;
use comfy_table::Cell;

/// Fetches and prints the two rates the calculator depends on.
pub async fn run(provider: &(dyn CurrencyRateProvider + Send + Sync)) -> Result<()> {
    let pb = ui::new_spinner("Fetching exchange rates...");
    let quote = fetch_quote(provider).await;
    pb.finish_and_clear();
    let quote = quote?;

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Pair"), ui::header_cell("Rate")]);
    table.add_row(vec![Cell::new("EUR/TRY"), ui::amount_cell(quote.euro_rate)]);
    table.add_row(vec![Cell::new("SEK/TRY"), ui::amount_cell(quote.sek_rate)]);

    println!("{table}");
    println!(
        "{}",
        ui::style_text(
            &format!("Fetched at {}", quote.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")),
            ui::StyleType::Subtle
        )
    );
    Ok(())
}
