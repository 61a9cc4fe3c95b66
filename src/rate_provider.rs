//! Exchange rate abstractions.

use crate::currency::CurrencyCode;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A snapshot of exchange rates relative to one base currency.
///
/// Every rate is a positive multiplier; an absent code means the rate is
/// unknown, never zero. Tables are replaced wholesale on each fetch.
#[derive(Debug, Clone)]
pub struct RateTable {
    base: CurrencyCode,
    rates: HashMap<String, f64>,
    fetched_at: DateTime<Utc>,
}

impl RateTable {
    /// Builds a table from raw rate entries, dropping non-positive values.
    pub fn new(base: CurrencyCode, rates: HashMap<String, f64>) -> Self {
        let rates = rates
            .into_iter()
            .filter(|(_, rate)| rate.is_finite() && *rate > 0.0)
            .collect();
        Self {
            base,
            rates,
            fetched_at: Utc::now(),
        }
    }

    pub fn base(&self) -> CurrencyCode {
        self.base
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn rate_for(&self, code: CurrencyCode) -> Option<f64> {
        self.rates.get(code.as_str()).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(&self, base: CurrencyCode) -> Result<RateTable>;
}
