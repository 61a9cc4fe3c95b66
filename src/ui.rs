//! Terminal rendering for conversion results and stored collections.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::convert::ConversionResult;
use crate::currency::CurrencyCode;
use crate::format::format_amount;
use crate::rate_provider::RateTable;
use crate::store::favorites::FavoriteEntry;
use crate::store::history::HistoryEntry;

/// Creates a new `comfy_table::Table` with standard styling.
fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn rate_cell(rate: f64) -> Cell {
    Cell::new(format_amount(rate)).set_alignment(CellAlignment::Right)
}

/// Spinner shown while a fetch is in flight.
pub fn fetch_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .expect("invalid spinner template"),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// The three-line result panel: converted amount, what it came from, and the
/// unit rate.
pub fn render_result(result: &ConversionResult) -> String {
    let amount_line = style(format!(
        "{} {}",
        format_amount(result.converted_amount),
        result.to
    ))
    .green()
    .bold();
    let details_line = format!("{} {} equals", format_amount(result.amount), result.from.name());
    let rate_line = style(format!(
        "1 {} = {} {}",
        result.from,
        format_amount(result.rate),
        result.to
    ))
    .dim();

    format!("{details_line}\n{amount_line}\n{rate_line}")
}

pub fn history_table(entries: &[HistoryEntry]) -> String {
    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("When"),
        header_cell("Conversion"),
        header_cell("Rate"),
    ]);

    for entry in entries {
        let conversion = format!(
            "{} {} → {} {}",
            format_amount(entry.amount),
            entry.from_currency,
            format_amount(entry.converted_amount),
            entry.to_currency
        );
        table.add_row(vec![
            Cell::new(entry.timestamp.format("%Y-%m-%d %H:%M").to_string()),
            Cell::new(conversion),
            rate_cell(entry.rate),
        ]);
    }
    table.to_string()
}

pub fn favorites_table(entries: &[FavoriteEntry]) -> String {
    let mut table = new_styled_table();
    table.set_header(vec![header_cell("Pair"), header_cell("Currencies")]);

    for entry in entries {
        table.add_row(vec![
            Cell::new(format!("{} → {}", entry.from_currency, entry.to_currency)),
            Cell::new(format!("{} to {}", entry.from_name, entry.to_name)),
        ]);
    }
    table.to_string()
}

/// Full rate table for one base, restricted to the known currency set.
pub fn rates_table(table: &RateTable) -> String {
    let mut out = new_styled_table();
    out.set_header(vec![
        header_cell("Code"),
        header_cell("Currency"),
        header_cell(&format!("Rate (1 {})", table.base())),
    ]);

    for code in CurrencyCode::all() {
        if code == table.base() {
            continue;
        }
        if let Some(rate) = table.rate_for(code) {
            out.add_row(vec![
                Cell::new(code.as_str()),
                Cell::new(code.name()),
                rate_cell(rate),
            ]);
        }
    }
    out.to_string()
}

pub fn popular_table(pairs: &[(CurrencyCode, CurrencyCode, Option<f64>)]) -> String {
    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("Pair"),
        header_cell("Currencies"),
        header_cell("Rate"),
    ]);

    for (from, to, rate) in pairs {
        let cell = match rate {
            Some(rate) => rate_cell(*rate),
            None => Cell::new("N/A").fg(Color::DarkGrey),
        };
        table.add_row(vec![
            Cell::new(format!("{from} → {to}")),
            Cell::new(format!("{} to {}", from.name(), to.name())),
            cell,
        ]);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_render_result_lines() {
        let result = ConversionResult {
            amount: 100.0,
            from: CurrencyCode::USD,
            to: CurrencyCode::EUR,
            converted_amount: 85.0,
            rate: 0.85,
            computed_at: Utc::now(),
        };

        let rendered = render_result(&result);
        let plain = console::strip_ansi_codes(&rendered).to_string();
        assert!(plain.contains("100.00 US Dollar equals"));
        assert!(plain.contains("85.00 EUR"));
        assert!(plain.contains("1 USD = 0.85 EUR"));
    }

    #[test]
    fn test_history_table_contains_entries() {
        let entries = vec![HistoryEntry {
            id: uuid::Uuid::new_v4(),
            amount: 10.0,
            from_currency: CurrencyCode::USD,
            to_currency: CurrencyCode::EUR,
            converted_amount: 8.5,
            rate: 0.85,
            timestamp: Utc::now(),
        }];

        let rendered = history_table(&entries);
        assert!(rendered.contains("10.00 USD"));
        assert!(rendered.contains("8.50 EUR"));
    }
}
