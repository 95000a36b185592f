//! Number formatting for the Telegram summary and the chart labels.

/// Rouble sign appended to money amounts.
pub const ROUBLE: &str = "₽";

/// Formats an integer with thousands separated by a single space.
pub fn format_int(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

/// Rounds half-to-even and formats as whole roubles, e.g. `"1 235 ₽"`.
#[allow(clippy::cast_possible_truncation)]
pub fn format_money(rub: f64) -> String {
    format!("{} {ROUBLE}", format_int(rub.round_ties_even() as i64))
}

/// Percentage change from `prev` to `cur`, 0 when `prev` is zero.
#[allow(clippy::float_cmp)]
pub fn percent_change(cur: f64, prev: f64) -> f64 {
    if prev == 0.0 {
        0.0
    } else {
        (cur - prev) / prev * 100.0
    }
}

/// Formats the change from `prev` to `cur` as `"(+D | +P%)"`.
///
/// With `money` the absolute part carries the rouble sign: `"(+D ₽ | +P%)"`.
pub fn format_delta(cur: f64, prev: f64, money: bool) -> String {
    let delta = cur - prev;
    let pct = percent_change(cur, prev);
    if money {
        format!("({delta:+.0} {ROUBLE} | {pct:+.1}%)")
    } else {
        format!("({delta:+.0} | {pct:+.1}%)")
    }
}

/// Arrow showing the direction of change from `prev` to `cur`.
pub fn trend_icon(cur: f64, prev: f64) -> &'static str {
    if cur > prev {
        "▲"
    } else if cur < prev {
        "▼"
    } else {
        "•"
    }
}

/// Single-line, char-boundary-safe excerpt of a response body for logs.
pub fn preview(text: &str, max_chars: usize) -> String {
    text.trim()
        .chars()
        .take(max_chars)
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}
