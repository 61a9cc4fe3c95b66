//! IP geolocation for picking a default base currency.

use anyhow::Result;
use serde::Deserialize;
use tracing::debug;

use crate::currency::CurrencyCode;

pub struct GeoProvider {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    currency: Option<String>,
}

impl GeoProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent("fxc/0.1").build()?;
        Ok(GeoProvider {
            base_url: base_url.to_string(),
            client,
        })
    }

    /// Best-effort local currency detection. Any failure, or a currency
    /// outside the known set, yields `None` and the caller falls back to USD.
    pub async fn detect_currency(&self) -> Option<CurrencyCode> {
        match self.fetch().await {
            Ok(Some(code)) => {
                let currency = CurrencyCode::parse(&code);
                if currency.is_none() {
                    debug!("Detected unsupported local currency: {}", code);
                }
                currency
            }
            Ok(None) => None,
            Err(e) => {
                debug!("Location detection failed: {}", e);
                None
            }
        }
    }

    async fn fetch(&self) -> Result<Option<String>> {
        debug!("Requesting geolocation from {}", self.base_url);
        let response = self.client.get(&self.base_url).send().await?;
        let data = response.json::<GeoResponse>().await?;
        Ok(data.currency)
    }
}
