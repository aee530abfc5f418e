//! Micros conversion and number formatting.
//!
//! The Google Ads API expresses every monetary amount in micros
//! (1,000,000 micros = one unit of the account currency).

pub const MICROS_PER_UNIT: f64 = 1_000_000.0;

pub fn micros_to_units(micros: i64) -> f64 {
    micros as f64 / MICROS_PER_UNIT
}

/// Insert thousands separators into an integer (`1234567` -> `1,234,567`).
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0 {
        out.insert(0, '-');
    }
    out
}

/// Two-decimal number with thousands separators (`1234.5` -> `1,234.50`).
pub fn format_decimal(value: f64) -> String {
    let rounded = format!("{:.2}", value.abs());
    let (whole, frac) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));
    let whole: i64 = whole.parse().unwrap_or(0);
    let sign = if value < 0.0 && rounded != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, group_thousands(whole), frac)
}

/// `EUR 1,234.56` from an amount in micros.
pub fn format_money(micros: i64, currency: &str) -> String {
    format!("{} {}", currency, format_decimal(micros_to_units(micros)))
}

/// Same as [`format_money`] for amounts already in units.
pub fn format_units(amount: f64, currency: &str) -> String {
    format!("{} {}", currency, format_decimal(amount))
}

/// Ratio rendered as a percentage with two decimals (`0.1234` -> `12.34%`).
pub fn format_percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}
