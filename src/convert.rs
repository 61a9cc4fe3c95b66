//! The conversion engine: request validation and rate application.

use crate::currency::CurrencyCode;
use crate::error::{Error, Result};
use crate::rate_provider::RateTable;
use chrono::{DateTime, Utc};

/// Largest accepted amount for a single conversion.
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

/// A validated conversion request.
///
/// Invariants: amount is finite, positive and at most [`MAX_AMOUNT`]; the
/// source and target codes differ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionRequest {
    amount: f64,
    from: CurrencyCode,
    to: CurrencyCode,
}

impl ConversionRequest {
    pub fn new(amount: f64, from: CurrencyCode, to: CurrencyCode) -> Result<Self> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::Validation(
                "Please enter a valid positive amount".to_string(),
            ));
        }
        if amount > MAX_AMOUNT {
            return Err(Error::Validation("Amount is too large".to_string()));
        }
        if from == to {
            return Err(Error::Validation(
                "Please select different currencies".to_string(),
            ));
        }
        Ok(Self { amount, from, to })
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn from(&self) -> CurrencyCode {
        self.from
    }

    pub fn to(&self) -> CurrencyCode {
        self.to
    }
}

/// The outcome of a conversion. Never mutated after creation.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub amount: f64,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub converted_amount: f64,
    pub rate: f64,
    pub computed_at: DateTime<Utc>,
}

/// Applies a rate table to a request.
///
/// The product is exact; rounding happens only at display time.
pub fn convert(request: &ConversionRequest, rates: &RateTable) -> Result<ConversionResult> {
    let rate = rates
        .rate_for(request.to())
        .ok_or(Error::RateUnavailable(request.to()))?;

    Ok(ConversionResult {
        amount: request.amount(),
        from: request.from(),
        to: request.to(),
        converted_amount: request.amount() * rate,
        rate,
        computed_at: Utc::now(),
    })
}
