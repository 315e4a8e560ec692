use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::CurrencyCode;

/// Render an amount with the currency symbol and thousands separators,
/// e.g. `$8,400.00`, `-€25.00`, `¥1,200`.
pub fn format_currency(amount: Decimal, currency: CurrencyCode) -> String {
    let digits = currency.fraction_digits();
    let rounded = amount.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);

    let text = format!("{:.*}", digits as usize, rounded.abs());
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut out = String::new();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(currency.symbol());
    out.push_str(&group_thousands(whole));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// One decimal place, e.g. `1.8%`.
pub fn format_percentage(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.1}%", rounded)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
