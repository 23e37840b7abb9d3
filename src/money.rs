//! Money formatting utilities for displaying monetary amounts.
//!
//! Amounts are carried as integer cents everywhere; formatting is a
//! presentation-only final step. Format: sign (negatives only) + currency
//! symbol + number with locale-dependent separators.

/// Format cents for display: `-$1,234.56` or `€1.234,56` depending on locale.
/// Negative amounts keep their minus sign; positive amounts get no prefix.
pub fn format_money(cents: i64, currency: &str, locale: &str) -> String {
    let is_negative = cents < 0;
    let abs_cents = cents.abs();
    let whole = abs_cents / 100;
    let fractional = abs_cents % 100;

    let (thousands_sep, decimal_sep) = locale_separators(locale);
    let whole_str = format_with_thousands(whole, thousands_sep);
    let symbol = currency_symbol(currency);

    if is_negative {
        format!("-{}{}{}{:02}", symbol, whole_str, decimal_sep, fractional)
    } else {
        format!("{}{}{}{:02}", symbol, whole_str, decimal_sep, fractional)
    }
}

/// Convert a major-unit decimal amount (as the wire carries it) to cents.
pub fn cents_from_decimal(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Convert cents back to a major-unit decimal for mutation variables.
pub fn decimal_from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Get thousands and decimal separators based on locale.
fn locale_separators(locale: &str) -> (char, char) {
    // Locales that use period as thousands separator and comma as decimal
    match locale {
        "de-DE" | "de-AT" | "de-CH" | "fr-FR" | "fr-BE" | "fr-CA" | "es-ES" | "es-AR" | "it-IT"
        | "pt-BR" | "pt-PT" | "nl-NL" | "nl-BE" | "pl-PL" | "ru-RU" | "tr-TR" | "vi-VN"
        | "id-ID" | "da-DK" | "nb-NO" | "sv-SE" | "fi-FI" | "cs-CZ" | "sk-SK" | "hu-HU"
        | "ro-RO" | "bg-BG" | "uk-UA" | "el-GR" => ('.', ','),
        // Most English-speaking countries and others use comma as thousands, period as decimal
        _ => (',', '.'),
    }
}

/// Format a number with thousands separators.
fn format_with_thousands(n: i64, sep: char) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let s = n.to_string();
    let chars: Vec<char> = s.chars().rev().collect();
    let mut result = Vec::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(sep);
        }
        result.push(*c);
    }

    result.iter().rev().collect()
}

/// Get currency symbol for a currency code.
fn currency_symbol(currency: &str) -> &'static str {
    match currency.to_uppercase().as_str() {
        "USD" => "$",
        "EUR" => "\u{20ac}",
        "GBP" => "\u{00a3}",
        "JPY" => "\u{00a5}",
        "CNY" => "\u{00a5}",
        "CAD" => "C$",
        "AUD" => "A$",
        "CHF" => "CHF\u{00a0}",
        "INR" => "\u{20b9}",
        "BRL" => "R$",
        "MXN" => "MX$",
        "KRW" => "\u{20a9}",
        "SEK" => "kr\u{00a0}",
        "NOK" => "kr\u{00a0}",
        "DKK" => "kr\u{00a0}",
        "PLN" => "z\u{0142}\u{00a0}",
        "RUB" => "\u{20bd}",
        "TRY" => "\u{20ba}",
        "ZAR" => "R\u{00a0}",
        "SGD" => "S$",
        "HKD" => "HK$",
        "NZD" => "NZ$",
        "THB" => "\u{0e3f}",
        _ => "$",
    }
}
