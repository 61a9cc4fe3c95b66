//! The known currency set and its display names.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Display;
use std::str::FromStr;

/// Supported currencies, mapped to their display names.
pub const CURRENCIES: &[(&str, &str)] = &[
    ("USD", "US Dollar"),
    ("EUR", "Euro"),
    ("GBP", "British Pound Sterling"),
    ("JPY", "Japanese Yen"),
    ("AUD", "Australian Dollar"),
    ("CAD", "Canadian Dollar"),
    ("CHF", "Swiss Franc"),
    ("CNY", "Chinese Yuan"),
    ("SEK", "Swedish Krona"),
    ("NZD", "New Zealand Dollar"),
    ("MXN", "Mexican Peso"),
    ("SGD", "Singapore Dollar"),
    ("HKD", "Hong Kong Dollar"),
    ("NOK", "Norwegian Krone"),
    ("INR", "Indian Rupee"),
    ("BRL", "Brazilian Real"),
    ("RUB", "Russian Ruble"),
    ("KRW", "South Korean Won"),
    ("TRY", "Turkish Lira"),
    ("ZAR", "South African Rand"),
    ("PLN", "Polish Zloty"),
    ("THB", "Thai Baht"),
    ("MYR", "Malaysian Ringgit"),
    ("CZK", "Czech Koruna"),
    ("DKK", "Danish Krone"),
    ("HUF", "Hungarian Forint"),
    ("ILS", "Israeli Shekel"),
    ("CLP", "Chilean Peso"),
    ("PHP", "Philippine Peso"),
    ("AED", "UAE Dirham"),
    ("COP", "Colombian Peso"),
    ("SAR", "Saudi Riyal"),
    ("RON", "Romanian Leu"),
    ("BGN", "Bulgarian Lev"),
    ("HRK", "Croatian Kuna"),
    ("ISK", "Icelandic Krona"),
    ("EGP", "Egyptian Pound"),
];

/// Frequently converted pairs, shown by the `popular` command.
pub const POPULAR_PAIRS: &[(CurrencyCode, CurrencyCode)] = &[
    (CurrencyCode("USD"), CurrencyCode("EUR")),
    (CurrencyCode("USD"), CurrencyCode("GBP")),
    (CurrencyCode("USD"), CurrencyCode("JPY")),
    (CurrencyCode("USD"), CurrencyCode("INR")),
    (CurrencyCode("EUR"), CurrencyCode("USD")),
    (CurrencyCode("GBP"), CurrencyCode("USD")),
];

/// A validated three-letter currency code from the known set.
///
/// Construction goes through [`CurrencyCode::parse`], so a value of this type
/// always refers to an entry in [`CURRENCIES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CurrencyCode(&'static str);

impl CurrencyCode {
    pub const USD: Self = Self("USD");
    pub const EUR: Self = Self("EUR");

    /// Resolves a code case-insensitively against the known set.
    pub fn parse(token: &str) -> Option<Self> {
        CURRENCIES
            .iter()
            .find(|(code, _)| code.eq_ignore_ascii_case(token))
            .map(|(code, _)| Self(code))
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Display name, e.g. "US Dollar" for USD.
    pub fn name(&self) -> &'static str {
        CURRENCIES
            .iter()
            .find(|(code, _)| *code == self.0)
            .map(|(_, name)| *name)
            .unwrap_or(self.0)
    }

    pub fn all() -> impl Iterator<Item = Self> {
        CURRENCIES.iter().map(|(code, _)| Self(code))
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| anyhow::anyhow!("Unknown currency code: {}", s))
    }
}

impl Serialize for CurrencyCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

impl<'de> Deserialize<'de> for CurrencyCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Self::parse(&code)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown currency code: {code}")))
    }
}
