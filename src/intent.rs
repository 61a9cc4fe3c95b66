//! Free-text conversion intent parsing for the chat mode.
//!
//! Turns phrases like "convert 100 dollars to euros" into a structured
//! [`ConversionRequest`]. Parsing never fails loudly: anything ambiguous or
//! unresolvable is `None` and the caller replies that it did not understand.

use crate::convert::ConversionRequest;
use crate::currency::CurrencyCode;
use regex::Regex;
use std::sync::LazyLock;

/// Phrase patterns, in priority order. Each captures (amount, from, to).
/// The first pattern that matches and resolves wins.
static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"convert\s+(\d+(?:\.\d+)?)\s+(\w+)\s+to\s+(\w+)",
        r"(\d+(?:\.\d+)?)\s+(\w+)\s+to\s+(\w+)",
        r"(\d+(?:\.\d+)?)\s+(\w+)\s+in\s+(\w+)",
        r"what'?s\s+(\d+(?:\.\d+)?)\s+(\w+)\s+in\s+(\w+)",
        r"how\s+much\s+is\s+(\d+(?:\.\d+)?)\s+(\w+)\s+in\s+(\w+)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("invalid intent pattern"))
    .collect()
});

/// Common currency names and their codes. Tokens not found here fall back to
/// a direct case-insensitive code match.
const SYNONYMS: &[(&str, &str)] = &[
    ("dollar", "USD"),
    ("dollars", "USD"),
    ("euro", "EUR"),
    ("euros", "EUR"),
    ("pound", "GBP"),
    ("pounds", "GBP"),
    ("yen", "JPY"),
    ("rupee", "INR"),
    ("rupees", "INR"),
    ("yuan", "CNY"),
    ("franc", "CHF"),
    ("francs", "CHF"),
    ("won", "KRW"),
    ("real", "BRL"),
    ("reals", "BRL"),
    ("reais", "BRL"),
];

fn resolve_currency(token: &str) -> Option<CurrencyCode> {
    SYNONYMS
        .iter()
        .find(|(name, _)| *name == token)
        .and_then(|(_, code)| CurrencyCode::parse(code))
        .or_else(|| CurrencyCode::parse(token))
}

/// Extracts a conversion request from free-form text.
pub fn parse(text: &str) -> Option<ConversionRequest> {
    let message = text.to_lowercase();

    for pattern in PATTERNS.iter() {
        let Some(captures) = pattern.captures(&message) else {
            continue;
        };

        let Ok(amount) = captures[1].parse::<f64>() else {
            continue;
        };
        let Some(from) = resolve_currency(&captures[2]) else {
            continue;
        };
        let Some(to) = resolve_currency(&captures[3]) else {
            continue;
        };

        // A matching pattern with an invalid triple (zero amount, identical
        // currencies) falls through to the remaining patterns.
        if let Ok(request) = ConversionRequest::new(amount, from, to) {
            return Some(request);
        }
    }

    None
}
