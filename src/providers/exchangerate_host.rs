use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::currency::CurrencyRateProvider;

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    rates: HashMap<String, f64>,
}

/// Rate provider backed by the exchangerate.host `latest` endpoint.
///
/// Every lookup goes to the service; rates are never reused between calls.
pub struct ExchangeRateHostProvider {
    base_url: String,
    timeout: Duration,
}

impl ExchangeRateHostProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        ExchangeRateHostProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Fetches the rates of several `symbols` against `base` in one request.
    ///
    /// Fails unless every requested symbol is present in the response.
    #[instrument(name = "ExchangeRateFetch", skip(self), fields(base = %base))]
    pub async fn get_rates(&self, base: &str, symbols: &[&str]) -> Result<HashMap<String, f64>> {
        let url = format!(
            "{}/latest?base={}&symbols={}",
            self.base_url,
            base,
            symbols.join(",")
        );
        debug!("Requesting rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("landed/0.1")
            .timeout(self.timeout)
            .build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for base currency: {}", e, base))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for base currency: {}",
                response.status(),
                base
            ));
        }

        let text = response.text().await?;
        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", base, e))?;

        symbols
            .iter()
            .map(|symbol| {
                data.rates
                    .get(*symbol)
                    .map(|rate| (symbol.to_string(), *rate))
                    .ok_or_else(|| anyhow!("No rate data found for currency pair: {base}{symbol}"))
            })
            .collect()
    }
}

#[async_trait]
impl CurrencyRateProvider for ExchangeRateHostProvider {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64> {
        let rates = self.get_rates(from, &[to]).await?;
        rates
            .get(to)
            .copied()
            .ok_or_else(|| anyhow!("No rate data found for currency pair: {from}{to}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> ExchangeRateHostProvider {
        ExchangeRateHostProvider::new(&server.uri(), Duration::from_secs(5))
    }

    async fn mount_latest(server: &MockServer, base: &str, symbols: &str, body: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("base", base))
            .and(query_param("symbols", symbols))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_successful_rate_fetch() {
        let mock_server = MockServer::start().await;
        mount_latest(
            &mock_server,
            "EUR",
            "TRY",
            r#"{"success": true, "base": "EUR", "rates": {"TRY": 45.6789}}"#,
            200,
        )
        .await;

        let provider = provider_for(&mock_server);
        let rate = provider
            .get_rate("EUR", "TRY")
            .await
            .expect("Failed to get rate");
        assert_eq!(rate, 45.6789);
    }

    #[tokio::test]
    async fn test_every_lookup_reaches_the_service() {
        let mock_server = MockServer::start().await;
        // The first answer is served once, later lookups see the updated rate
        Mock::given(method("GET"))
            .and(path("/latest"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"rates": {"TRY": 3.51}}"#),
            )
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/latest"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"rates": {"TRY": 3.62}}"#),
            )
            .mount(&mock_server)
            .await;

        let provider = provider_for(&mock_server);
        assert_eq!(provider.get_rate("SEK", "TRY").await.unwrap(), 3.51);
        assert_eq!(provider.get_rate("SEK", "TRY").await.unwrap(), 3.62);
        assert_eq!(mock_server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_multi_symbol_fetch() {
        let mock_server = MockServer::start().await;
        mount_latest(
            &mock_server,
            "EUR",
            "TRY,SEK",
            r#"{"rates": {"TRY": 45.1, "SEK": 11.2}}"#,
            200,
        )
        .await;

        let provider = provider_for(&mock_server);
        let rates = provider.get_rates("EUR", &["TRY", "SEK"]).await.unwrap();
        assert_eq!(rates.len(), 2);
        assert_eq!(rates.get("TRY"), Some(&45.1));
        assert_eq!(rates.get("SEK"), Some(&11.2));
    }

    #[tokio::test]
    async fn test_multi_symbol_fetch_fails_on_any_missing_symbol() {
        let mock_server = MockServer::start().await;
        mount_latest(
            &mock_server,
            "EUR",
            "TRY,SEK",
            r#"{"rates": {"TRY": 45.1}}"#,
            200,
        )
        .await;

        let provider = provider_for(&mock_server);
        let result = provider.get_rates("EUR", &["TRY", "SEK"]).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "No rate data found for currency pair: EURSEK"
        );
    }

    #[tokio::test]
    async fn test_missing_symbol() {
        let mock_server = MockServer::start().await;
        mount_latest(&mock_server, "SEK", "TRY", r#"{"rates": {}}"#, 200).await;

        let provider = provider_for(&mock_server);
        let result = provider.get_rate("SEK", "TRY").await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "No rate data found for currency pair: SEKTRY"
        );
    }

    #[tokio::test]
    async fn test_api_error_response() {
        let mock_server = MockServer::start().await;
        mount_latest(&mock_server, "EUR", "TRY", "", 500).await;

        let provider = provider_for(&mock_server);
        let result = provider.get_rate("EUR", "TRY").await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 500 Internal Server Error for base currency: EUR"
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_server = MockServer::start().await;
        // "rate" instead of "rates"
        mount_latest(&mock_server, "EUR", "TRY", r#"{"rate": {"TRY": 1.0}}"#, 200).await;

        let provider = provider_for(&mock_server);
        let result = provider.get_rate("EUR", "TRY").await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse JSON response for EUR")
        );
    }
}
