//! Currency conversion abstractions

use anyhow::Result;
use async_trait::async_trait;

/// Local currency the goods are bought and shipped in.
pub const COST_CURRENCY: &str = "TRY";
/// Currency freight is invoiced in.
pub const FREIGHT_CURRENCY: &str = "EUR";
/// Currency the goods are sold in.
pub const SALE_CURRENCY: &str = "SEK";

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    /// Units of `to` bought by one unit of `from`.
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64>;
}
