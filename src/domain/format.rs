//! Display formatting for money and counts.

use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount as US dollars with 0–2 fraction digits.
///
/// Rounds half away from zero to cents, drops trailing zeros and groups
/// thousands: `45200` → `$45,200`, `73.5294` → `$73.53`, `12.50` → `$12.5`.
pub fn format_usd(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = rounded.abs().to_string();
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut out = format!("{sign}${}", group_thousands(whole));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Format a per-share price with exactly two decimals: `0.3` → `0.30`.
pub fn format_price(price: Decimal) -> String {
    format!(
        "{:.2}",
        price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Format a count with thousands separators: `1247` → `1,247`.
pub fn format_count(count: u64) -> String {
    group_thousands(&count.to_string())
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
