//! Display formatting for converted amounts and rates.

/// Formats a monetary value for display.
///
/// Values >= 1 get exactly two fraction digits. Sub-unit values keep up to
/// six fraction digits (at least two) so small rates stay meaningful. The
/// integer part is grouped with commas.
pub fn format_amount(value: f64) -> String {
    let formatted = if value.abs() >= 1.0 {
        format!("{value:.2}")
    } else {
        trim_fraction(format!("{value:.6}"))
    };

    match formatted.split_once('.') {
        Some((int_part, frac_part)) => format!("{}.{frac_part}", group_thousands(int_part)),
        None => group_thousands(&formatted),
    }
}

/// Drops trailing fractional zeros, keeping at least two fraction digits.
fn trim_fraction(formatted: String) -> String {
    let Some((int_part, frac_part)) = formatted.split_once('.') else {
        return formatted;
    };
    let mut frac_part = frac_part.trim_end_matches('0');
    if frac_part.len() < 2 {
        frac_part = &formatted[int_part.len() + 1..int_part.len() + 3];
    }
    format!("{int_part}.{frac_part}")
}

fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_above_one_have_two_digits() {
        assert_eq!(format_amount(1.0), "1.00");
        assert_eq!(format_amount(85.0), "85.00");
        assert_eq!(format_amount(1.005), "1.00"); // banker-ish f64 rounding of .005
        assert_eq!(format_amount(123.456), "123.46");
    }

    #[test]
    fn test_thousands_grouping() {
        assert_eq!(format_amount(1234.5), "1,234.50");
        assert_eq!(format_amount(1234567.891), "1,234,567.89");
        assert_eq!(format_amount(1_000_000_000.0), "1,000,000,000.00");
    }

    #[test]
    fn test_sub_unit_values_keep_up_to_six_digits() {
        assert_eq!(format_amount(0.000123), "0.000123");
        assert_eq!(format_amount(0.123456), "0.123456");
        assert_eq!(format_amount(0.1234567), "0.123457");
    }

    #[test]
    fn test_sub_unit_values_trim_to_two_digits() {
        assert_eq!(format_amount(0.5), "0.50");
        assert_eq!(format_amount(0.85), "0.85");
        assert_eq!(format_amount(0.12), "0.12");
        assert_eq!(format_amount(0.120000), "0.12");
    }
}
