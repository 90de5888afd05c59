use crate::domain::Points;

const SYMBOL: &str = "₫";

/// Render `amount * unit` as whole đồng, e.g. `1.234.560 ₫`.
///
/// A non-positive `unit` counts as 1. Products beyond `i64` are computed in
/// `i128` so display never fails.
pub fn format_currency(amount: Points, unit: Points) -> String {
    let unit = if unit > 0 { unit } else { 1 };
    let value = i128::from(amount) * i128::from(unit);
    format!("{} {SYMBOL}", group_thousands(value))
}

fn group_thousands(value: i128) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
