//! Application state and the conversion pipeline.
//!
//! `App` owns the rate provider and both stores; every command goes through
//! it instead of touching globals. A conversion is one fresh rate fetch keyed
//! by the source currency followed by a pure computation; the result is
//! recorded in history before it is handed back for display.

use tracing::{debug, warn};

use crate::convert::{self, ConversionRequest, ConversionResult};
use crate::currency::{CurrencyCode, POPULAR_PAIRS};
use crate::error::{Error, Result};
use crate::format::format_amount;
use crate::intent;
use crate::rate_provider::RateProvider;
use crate::store::favorites::FavoritesStore;
use crate::store::history::HistoryStore;

pub struct App {
    rates: Box<dyn RateProvider>,
    history: HistoryStore,
    favorites: FavoritesStore,
}

impl App {
    pub fn new(rates: Box<dyn RateProvider>, history: HistoryStore, favorites: FavoritesStore) -> Self {
        Self {
            rates,
            history,
            favorites,
        }
    }

    /// Fetches rates for the source currency, converts, and records the
    /// result in history.
    pub async fn convert(&mut self, request: ConversionRequest) -> Result<ConversionResult> {
        let table = self.rates.fetch_rates(request.from()).await?;
        debug!(
            "Fetched {} rates for base {} at {}",
            table.len(),
            table.base(),
            table.fetched_at()
        );

        let result = convert::convert(&request, &table)?;

        // A storage failure should not void a conversion that already
        // succeeded.
        if let Err(e) = self.history.record(&result) {
            warn!("Failed to record conversion history: {e:#}");
        }

        Ok(result)
    }

    /// Handles one chat message and produces the reply text. Failures are
    /// converted to user-facing sentences here; nothing propagates.
    pub async fn reply(&mut self, message: &str) -> String {
        let Some(request) = intent::parse(message) else {
            return "I didn't understand that conversion request. Try something like \
                    'Convert 100 dollars to euros' or 'What's 50 pounds in yen?'"
                .to_string();
        };

        match self.convert(request).await {
            Ok(result) => format!(
                "{} {} equals {} {}. The current exchange rate is 1 {} = {} {}.",
                format_amount(result.amount),
                result.from.name(),
                format_amount(result.converted_amount),
                result.to.name(),
                result.from,
                format_amount(result.rate),
                result.to
            ),
            Err(Error::RateUnavailable(_)) => {
                "Sorry, I couldn't find the exchange rate for those currencies. Please try again."
                    .to_string()
            }
            Err(e) => {
                warn!("Chat processing error: {e}");
                "Sorry, I encountered an error processing your request. Please try again."
                    .to_string()
            }
        }
    }

    /// Current rates for the popular pairs. Pairs whose fetch or lookup fails
    /// come back with `None` and are skipped by the caller.
    pub async fn popular_rates(&self) -> Vec<(CurrencyCode, CurrencyCode, Option<f64>)> {
        let fetches = POPULAR_PAIRS.iter().map(|&(from, to)| async move {
            let rate = match self.rates.fetch_rates(from).await {
                Ok(table) => table.rate_for(to),
                Err(e) => {
                    debug!("Failed to load popular pair {from}-{to}: {e}");
                    None
                }
            };
            (from, to, rate)
        });
        futures::future::join_all(fetches).await
    }

    pub fn rate_provider(&self) -> &dyn RateProvider {
        self.rates.as_ref()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn clear_history(&mut self) -> anyhow::Result<()> {
        self.history.clear()
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn toggle_favorite(&mut self, from: CurrencyCode, to: CurrencyCode) -> anyhow::Result<bool> {
        self.favorites.toggle(from, to)
    }

    pub fn remove_favorite(&mut self, key: &str) -> anyhow::Result<bool> {
        self.favorites.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_provider::RateTable;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::tempdir;

    struct FixedRateProvider {
        rates: HashMap<String, f64>,
        call_count: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RateProvider for FixedRateProvider {
        async fn fetch_rates(&self, base: CurrencyCode) -> Result<RateTable> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            Ok(RateTable::new(base, self.rates.clone()))
        }
    }

    struct FailingRateProvider;

    #[async_trait]
    impl RateProvider for FailingRateProvider {
        async fn fetch_rates(&self, _base: CurrencyCode) -> Result<RateTable> {
            Err(Error::RateFetch("both endpoints down".to_string()))
        }
    }

    fn make_app(provider: Box<dyn RateProvider>) -> (App, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let keyspace = fjall::Config::new(dir.path()).open().unwrap();
        let history = HistoryStore::open(&keyspace).unwrap();
        let favorites = FavoritesStore::open(&keyspace).unwrap();
        (App::new(provider, history, favorites), dir)
    }

    fn eur_at(rate: f64) -> (Box<dyn RateProvider>, Arc<AtomicUsize>) {
        let call_count = Arc::new(AtomicUsize::new(0));
        let provider = FixedRateProvider {
            rates: HashMap::from([("EUR".to_string(), rate)]),
            call_count: Arc::clone(&call_count),
        };
        (Box::new(provider), call_count)
    }

    #[tokio::test]
    async fn test_convert_records_history() {
        let (provider, _) = eur_at(0.85);
        let (mut app, _dir) = make_app(provider);

        let request = ConversionRequest::new(100.0, CurrencyCode::USD, CurrencyCode::EUR).unwrap();
        let result = app.convert(request).await.unwrap();

        assert_eq!(result.converted_amount, 85.0);
        assert_eq!(app.history().entries().len(), 1);
        assert_eq!(app.history().entries()[0].converted_amount, 85.0);
    }

    #[tokio::test]
    async fn test_every_conversion_fetches_fresh_rates() {
        let (provider, call_count) = eur_at(0.85);
        let (mut app, _dir) = make_app(provider);

        for _ in 0..3 {
            let request =
                ConversionRequest::new(1.0, CurrencyCode::USD, CurrencyCode::EUR).unwrap();
            app.convert(request).await.unwrap();
        }
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_chat_reply_for_conversion() {
        let (provider, _) = eur_at(0.85);
        let (mut app, _dir) = make_app(provider);

        let reply = app.reply("Convert 100 dollars to euros").await;
        assert_eq!(
            reply,
            "100.00 US Dollar equals 85.00 Euro. \
             The current exchange rate is 1 USD = 0.85 EUR."
        );
        assert_eq!(app.history().entries().len(), 1);
    }

    #[tokio::test]
    async fn test_chat_reply_for_gibberish() {
        let (provider, call_count) = eur_at(0.85);
        let (mut app, _dir) = make_app(provider);

        let reply = app.reply("hello there").await;
        assert!(reply.starts_with("I didn't understand"));
        // Nothing reached the network layer.
        assert_eq!(call_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_chat_reply_when_rate_missing() {
        let (provider, _) = eur_at(0.85);
        let (mut app, _dir) = make_app(provider);

        let reply = app.reply("convert 5 dollars to yen").await;
        assert!(reply.starts_with("Sorry, I couldn't find the exchange rate"));
    }

    #[tokio::test]
    async fn test_chat_reply_when_fetch_fails() {
        let (mut app, _dir) = make_app(Box::new(FailingRateProvider));

        let reply = app.reply("convert 5 dollars to euros").await;
        assert!(reply.starts_with("Sorry, I encountered an error"));
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_with_no_partial_result() {
        let (mut app, _dir) = make_app(Box::new(FailingRateProvider));

        let request = ConversionRequest::new(1.0, CurrencyCode::USD, CurrencyCode::EUR).unwrap();
        let result = app.convert(request).await;
        assert!(matches!(result, Err(Error::RateFetch(_))));
        assert!(app.history().entries().is_empty());
    }

    #[tokio::test]
    async fn test_popular_rates_reports_missing_pairs() {
        let (provider, _) = eur_at(0.85);
        let (app, _dir) = make_app(provider);

        let rates = app.popular_rates().await;
        assert_eq!(rates.len(), POPULAR_PAIRS.len());
        // Only USD->EUR resolves against the fixed table.
        for (from, to, rate) in rates {
            if from == CurrencyCode::USD && to == CurrencyCode::EUR {
                assert_eq!(rate, Some(0.85));
            } else {
                assert_eq!(rate, None, "{from}-{to} should be unavailable");
            }
        }
    }
}
