//! Cell display formatting. Missing values render empty; values that are
//! present but not numeric render as `NaN` in numeric formats.

use chrono::DateTime;
use serde_json::Value;

use crate::data::value::{as_number, as_text, as_timestamp_ms};
use crate::data::Record;
use crate::table::column::{CellFormat, Column};

fn present(value: Option<&Value>) -> Option<&Value> {
    match value {
        None | Some(Value::Null) => None,
        v => v,
    }
}

/// Fixed-point with `digits` decimals; never prints a negative zero.
pub fn to_fixed(n: f64, digits: usize) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let out = format!("{:.*}", digits, n);
    if out.starts_with('-') && out[1..].chars().all(|c| c == '0' || c == '.') {
        return out[1..].to_string();
    }
    out
}

/// Shortest display of a number: integers without a fraction.
pub fn number_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// en-US grouping with up to three fraction digits: 1234567.5 -> "1,234,567.5"
pub fn grouped(n: f64) -> String {
    if !n.is_finite() {
        return to_fixed(n, 0);
    }
    let fixed = format!("{:.3}", n.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');
    let mut out = String::new();
    if n < 0.0 && (int_part != "0" || !frac.is_empty()) {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

pub fn fmt_money(value: Option<&Value>) -> String {
    match present(value) {
        None => String::new(),
        Some(v) => format!("${}", to_fixed(as_number(Some(v)), 2)),
    }
}

pub fn fmt_int(value: Option<&Value>) -> String {
    match present(value) {
        None => String::new(),
        Some(v) => grouped(as_number(Some(v))),
    }
}

/// Expired contracts keep their raw value for sorting but display as 0.
pub fn fmt_dte(value: Option<&Value>) -> String {
    let Some(v) = present(value) else {
        return String::new();
    };
    let n = as_number(Some(v));
    if n.is_nan() {
        return String::new();
    }
    if n <= 0.0 {
        "0".to_string()
    } else {
        number_string(n)
    }
}

/// Moneyness is stored as a fraction: 0.052 -> "5.2%".
pub fn fmt_percent(value: Option<&Value>, signed: bool) -> String {
    let Some(v) = present(value) else {
        return String::new();
    };
    let pct = as_number(Some(v)) * 100.0;
    let sign = if signed && pct > 0.0 { "+" } else { "" };
    format!("{}{}%", sign, to_fixed(pct, 1))
}

/// "Jan 19, 2024" (`short` gives "Jan 19, 24"); empty when unparsable.
pub fn fmt_date(value: Option<&Value>, short: bool) -> String {
    let Some(ms) = as_timestamp_ms(present(value)) else {
        return String::new();
    };
    let Some(dt) = DateTime::from_timestamp_millis(ms) else {
        return String::new();
    };
    let pattern = if short { "%b %-d, %y" } else { "%b %-d, %Y" };
    dt.format(pattern).to_string()
}

pub fn fmt_option_type(value: Option<&Value>) -> String {
    match present(value) {
        Some(Value::String(s)) if s == "C" => "Call".to_string(),
        Some(Value::String(s)) if s == "P" => "Put".to_string(),
        v => as_text(v),
    }
}

pub fn format_cell(record: &Record, column: &Column) -> String {
    let value = record.get(&column.key);
    match column.format {
        CellFormat::Raw => as_text(value),
        CellFormat::Money => fmt_money(value),
        CellFormat::Int => fmt_int(value),
        CellFormat::Dte => fmt_dte(value),
        CellFormat::Percent => fmt_percent(value, false),
        CellFormat::SignedPercent => fmt_percent(value, true),
        CellFormat::LongDate => fmt_date(value, false),
        CellFormat::ShortDate => fmt_date(value, true),
        CellFormat::OptionType => fmt_option_type(value),
    }
}
