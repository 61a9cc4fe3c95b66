//! Error taxonomy for the conversion pipeline.

use crate::currency::CurrencyCode;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Both the primary and the fallback rate endpoint failed.
    #[error("unable to fetch current exchange rates: {0}")]
    RateFetch(String),

    /// Rates were fetched but the table has no entry for the target code.
    #[error("exchange rate not available for {0}")]
    RateUnavailable(CurrencyCode),

    /// Bad user input, rejected before any network call.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
