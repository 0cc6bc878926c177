//! Amount handling for European style exports.
//!
//! Bank exports write `-1.234,56`: period for thousands, comma for decimals,
//! sometimes with spaces or non-breaking spaces as grouping and a currency
//! symbol glued on. The import format wants `1,234.56` split over two unsigned
//! columns. A cell that cannot be read is `None` all the way through, which
//! renders as an empty cell instead of a zero.

const NBSP: char = '\u{a0}';

/// Parse one raw amount cell, `None` when nothing numeric is left
pub fn parse_amount(raw: &str) -> Option<f64> {
    let s = strip_spaces(raw);
    let s = keep_numeric_chars(&s);
    let s = drop_thousands_periods(&s);
    let s = comma_to_decimal_point(&s);
    parse_decimal(&s)
}

/// Spaces are used as thousands separators by some banks
fn strip_spaces(s: &str) -> String {
    s.chars().filter(|&c| c != NBSP && c != ' ').collect()
}

/// Drop currency symbols and anything else that is not part of a number
fn keep_numeric_chars(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect()
}

fn drop_thousands_periods(s: &str) -> String {
    s.replace('.', "")
}

fn comma_to_decimal_point(s: &str) -> String {
    s.replace(',', ".")
}

fn parse_decimal(s: &str) -> Option<f64> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            log::trace!("'{s}' is not a number");
            None
        }
    }
}

/// Split a signed amount into `(outflow, inflow)`, both unsigned.
///
/// At most one side is ever set. Zero and unparseable amounts set neither.
pub fn split_amount(amount: Option<f64>) -> (Option<f64>, Option<f64>) {
    match amount {
        Some(v) if v < 0.0 => (Some(v.abs()), None),
        Some(v) if v > 0.0 => (None, Some(v)),
        _ => (None, None),
    }
}

/// Render an amount as `1,234.50`, empty for missing or zero amounts
pub fn format_amount(amount: Option<f64>) -> String {
    match amount {
        Some(v) if v != 0.0 => {
            let fixed = format!("{:.2}", v.abs());
            let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
            let sign = if v < 0.0 { "-" } else { "" };
            format!("{sign}{}.{frac}", group_thousands(int))
        }
        _ => String::new(),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Read back a value written by [`format_amount`]
pub fn parse_formatted(s: &str) -> Option<f64> {
    s.replace(',', "").parse::<f64>().ok()
}
