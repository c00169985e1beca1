//! Refreshing the two exchange rate inputs of a scenario.

use crate::core::currency::{COST_CURRENCY, CurrencyRateProvider, FREIGHT_CURRENCY, SALE_CURRENCY};
use crate::core::scenario::{Field, InputUpdate, ScenarioInputs};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

/// The current EUR/TRY and SEK/TRY rates, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateQuote {
    pub euro_rate: f64,
    pub sek_rate: f64,
    pub fetched_at: DateTime<Utc>,
}

impl RateQuote {
    /// The update that substitutes both rates into a scenario.
    pub fn as_update(&self) -> InputUpdate {
        InputUpdate::new()
            .set(Field::EuroRate, self.euro_rate)
            .set(Field::SekRate, self.sek_rate)
    }
}

pub fn round_rate(rate: f64) -> f64 {
    (rate * 100.0).round() / 100.0
}

/// Fetches both rates concurrently. Fails as a whole if either lookup fails.
pub async fn fetch_quote(provider: &(dyn CurrencyRateProvider + Send + Sync)) -> Result<RateQuote> {
    let (euro_rate, sek_rate) = futures::try_join!(
        provider.get_rate(FREIGHT_CURRENCY, COST_CURRENCY),
        provider.get_rate(SALE_CURRENCY, COST_CURRENCY),
    )
    .context("Could not fetch exchange rates")?;
    debug!(euro_rate, sek_rate, "Fetched raw exchange rates");

    Ok(RateQuote {
        euro_rate: round_rate(euro_rate),
        sek_rate: round_rate(sek_rate),
        fetched_at: Utc::now(),
    })
}

/// Returns a new snapshot carrying the current rates.
///
/// On failure the error is returned and `inputs` is left as it was; callers
/// keep using their existing snapshot.
pub async fn refresh_rates(
    provider: &(dyn CurrencyRateProvider + Send + Sync),
    inputs: &ScenarioInputs,
) -> Result<(ScenarioInputs, RateQuote)> {
    let quote = fetch_quote(provider).await?;
    info!(
        euro_rate = quote.euro_rate,
        sek_rate = quote.sek_rate,
        "Applying refreshed exchange rates"
    );
    Ok((inputs.apply(&quote.as_update()), quote))
}
