//! Display formatting for invoice values.
//!
//! Pure functions converting primitive values (dates, currency amounts,
//! status codes) into display strings. Stateless and safe to call from
//! concurrent compositions.

use chrono::format::Locale;
use chrono::{DateTime, Utc};

/// Format a date as a long-form Spanish (es-ES) date, the reference locale
/// of the invoice layout: `12 de marzo de 2024`.
///
/// Deterministic for a given date.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.date_naive()
        .format_localized("%-d de %B de %Y", Locale::es_ES)
        .to_string()
}

/// Format an amount with its currency symbol.
///
/// Known codes map to a symbol prefix; any other code is printed verbatim
/// as the prefix (`XYZ12.50`), a deliberate graceful fallback rather than
/// an error. Amounts always carry exactly two fractional digits regardless
/// of currency conventions (BTC included). Rounding is Rust's `{:.2}`
/// round-to-nearest on the stored binary value, so `1.005_f64` (stored as
/// 1.00499...) renders as `1.00`.
pub fn format_currency(amount: f64, currency: &str) -> String {
    let symbol = match currency {
        "USD" => "$",
        "ETH" => "\u{39E}",  // Ξ
        "BTC" => "\u{20BF}", // ₿
        other => other,
    };
    format!("{}{:.2}", symbol, amount)
}

/// Format a transaction status code as a display label.
///
/// The closed set of known codes maps to capitalized labels; unknown codes
/// pass through unchanged.
pub fn format_status(status: &str) -> String {
    match status {
        "pending" => "Pending".to_string(),
        "completed" => "Completed".to_string(),
        "failed" => "Failed".to_string(),
        "cancelled" => "Cancelled".to_string(),
        other => other.to_string(),
    }
}
