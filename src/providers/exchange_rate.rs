//! HTTP rate provider with a single fallback endpoint.
//!
//! The primary endpoint takes the base currency as a path segment and wraps
//! the mapping in a `rates` field. The fallback takes the base as a `base`
//! query parameter and may return either the envelope or a flat mapping.
//! Both shapes are handled on both legs.

use anyhow::{Result as AnyResult, anyhow};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::currency::CurrencyCode;
use crate::error::{Error, Result};
use crate::rate_provider::{RateProvider, RateTable};

pub struct ExchangeRateProvider {
    primary_base_url: String,
    secondary_base_url: String,
    client: reqwest::Client,
}

impl ExchangeRateProvider {
    pub fn new(primary_base_url: &str, secondary_base_url: &str) -> AnyResult<Self> {
        let client = reqwest::Client::builder().user_agent("fxc/0.1").build()?;
        Ok(ExchangeRateProvider {
            primary_base_url: primary_base_url.trim_end_matches('/').to_string(),
            secondary_base_url: secondary_base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn request(&self, url: &str, base: CurrencyCode) -> AnyResult<RateTable> {
        debug!("Requesting exchange rates from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for base: {} URL: {}", e, base, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for base: {}",
                response.status(),
                base
            ));
        }

        let payload = response.json::<Value>().await?;
        let rates = extract_rates(&payload)
            .ok_or_else(|| anyhow!("Malformed rates payload for base: {}", base))?;

        Ok(RateTable::new(base, rates))
    }
}

/// Pulls the code-to-multiplier mapping out of a response payload.
///
/// Prefers a `rates` field; otherwise treats the payload itself as the
/// mapping (the two upstream APIs disagree on envelope shape). Non-numeric
/// fields such as `base` or `date` are skipped. An empty mapping counts as
/// malformed.
fn extract_rates(payload: &Value) -> Option<HashMap<String, f64>> {
    let mapping = match payload.get("rates") {
        Some(rates) => rates.as_object()?,
        None => payload.as_object()?,
    };

    let rates: HashMap<String, f64> = mapping
        .iter()
        .filter_map(|(code, value)| value.as_f64().map(|rate| (code.clone(), rate)))
        .collect();

    if rates.is_empty() { None } else { Some(rates) }
}

#[async_trait]
impl RateProvider for ExchangeRateProvider {
    #[instrument(name = "RateFetch", skip(self), fields(base = %base))]
    async fn fetch_rates(&self, base: CurrencyCode) -> Result<RateTable> {
        let url = format!("{}/{}", self.primary_base_url, base);
        let primary_err = match self.request(&url, base).await {
            Ok(table) => return Ok(table),
            Err(e) => e,
        };

        debug!(error = %primary_err, "Primary endpoint failed, trying fallback");

        let fallback_url = format!("{}?base={}", self.secondary_base_url, base);
        self.request(&fallback_url, base).await.map_err(|fallback_err| {
            Error::RateFetch(format!(
                "primary: {primary_err}; fallback: {fallback_err}"
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_primary(base: &str, body: &str, status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/{base}")))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&server)
            .await;
        server
    }

    fn provider(primary: &MockServer, secondary: &MockServer) -> ExchangeRateProvider {
        ExchangeRateProvider::new(&primary.uri(), &secondary.uri()).unwrap()
    }

    #[tokio::test]
    async fn test_primary_enveloped_payload() {
        let body = r#"{"base":"USD","date":"2024-01-02","rates":{"EUR":0.85,"GBP":0.79}}"#;
        let primary = mock_primary("USD", body, 200).await;
        let secondary = MockServer::start().await;

        let table = provider(&primary, &secondary)
            .fetch_rates(CurrencyCode::USD)
            .await
            .unwrap();

        assert_eq!(table.rate_for(CurrencyCode::EUR), Some(0.85));
        assert_eq!(table.base(), CurrencyCode::USD);
        // The secondary endpoint is never contacted on success.
        assert!(secondary.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fallback_on_primary_http_error() {
        let primary = mock_primary("USD", "", 500).await;

        let secondary = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("base", "USD"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"rates":{"EUR":0.9}}"#),
            )
            .mount(&secondary)
            .await;

        let table = provider(&primary, &secondary)
            .fetch_rates(CurrencyCode::USD)
            .await
            .unwrap();
        assert_eq!(table.rate_for(CurrencyCode::EUR), Some(0.9));
    }

    #[tokio::test]
    async fn test_fallback_accepts_flat_payload() {
        let primary = mock_primary("EUR", "not json", 200).await;

        let secondary = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("base", "EUR"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"USD":1.08,"JPY":160.2}"#),
            )
            .mount(&secondary)
            .await;

        let table = provider(&primary, &secondary)
            .fetch_rates(CurrencyCode::EUR)
            .await
            .unwrap();
        assert_eq!(table.rate_for(CurrencyCode::USD), Some(1.08));
        assert_eq!(
            table.rate_for(CurrencyCode::parse("JPY").unwrap()),
            Some(160.2)
        );
    }

    #[tokio::test]
    async fn test_both_endpoints_failing_is_rate_fetch_error() {
        let primary = mock_primary("USD", "", 500).await;
        let secondary = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&secondary)
            .await;

        let result = provider(&primary, &secondary)
            .fetch_rates(CurrencyCode::USD)
            .await;
        assert!(matches!(result, Err(Error::RateFetch(_))));
    }

    #[tokio::test]
    async fn test_malformed_payload_on_both_legs() {
        let primary = mock_primary("USD", r#"{"rates":{}}"#, 200).await;
        let secondary = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"[1,2,3]"#))
            .mount(&secondary)
            .await;

        let result = provider(&primary, &secondary)
            .fetch_rates(CurrencyCode::USD)
            .await;
        assert!(matches!(result, Err(Error::RateFetch(_))));
    }

    #[tokio::test]
    async fn test_non_numeric_and_non_positive_entries_skipped() {
        let body = r#"{"rates":{"EUR":0.85,"GBP":"n/a","JPY":0.0}}"#;
        let primary = mock_primary("USD", body, 200).await;
        let secondary = MockServer::start().await;

        let table = provider(&primary, &secondary)
            .fetch_rates(CurrencyCode::USD)
            .await
            .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rate_for(CurrencyCode::EUR), Some(0.85));
    }
}
