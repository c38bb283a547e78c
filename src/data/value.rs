//! Loose coercions of JSON field values into the three column types.
//!
//! Snapshot files carry no schema, so every coercion is total: a value that
//! does not fit degrades to NaN (numbers), `None` (dates) or `""` (text).

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Numeric view of a field. Missing, null and empty strings are NaN.
pub fn as_number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => {
            let t = s.trim();
            if t.is_empty() {
                return f64::NAN;
            }
            parse_numeric_text(t)
        }
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => f64::NAN,
    }
}

/// Decimal or exponent notation, plus the spellings `Infinity` and
/// `-Infinity`. Rust-only forms such as `inf` or `nan` are NaN.
fn parse_numeric_text(t: &str) -> f64 {
    let unsigned = t.strip_prefix(['+', '-']).unwrap_or(t);
    if unsigned == "Infinity" {
        return if t.starts_with('-') { f64::NEG_INFINITY } else { f64::INFINITY };
    }
    if unsigned.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return f64::NAN;
    }
    t.parse::<f64>().unwrap_or(f64::NAN)
}

/// Epoch milliseconds of a date field, `None` when unparsable or outside
/// the representable calendar range.
pub fn as_timestamp_ms(value: Option<&Value>) -> Option<i64> {
    match value {
        Some(Value::String(s)) => parse_timestamp_ms(s),
        Some(Value::Number(n)) => n
            .as_f64()
            .filter(|v| v.is_finite())
            .and_then(|v| DateTime::from_timestamp_millis(v as i64))
            .map(|dt| dt.timestamp_millis()),
        _ => None,
    }
}

/// String form of a field; null and missing become `""`.
pub fn as_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            Some(f) => format!("{}", f),
            None => n.to_string(),
        },
        Some(other) => other.to_string(),
    }
}

/// Parse RFC 3339, a bare ISO date-time (taken as UTC) or an ISO date
/// (UTC midnight).
pub fn parse_timestamp_ms(s: &str) -> Option<i64> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Some(dt.timestamp_millis());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(t, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(t, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Calendar date of a field, ignoring any time-of-day component.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let t = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(t, "%Y-%m-%d") {
        return Some(d);
    }
    if t.len() <= 10 {
        return None;
    }
    let ms = parse_timestamp_ms(t)?;
    DateTime::from_timestamp_millis(ms).map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn number_coercion() {
        assert_eq!(as_number(Some(&json!(12.5))), 12.5);
        assert_eq!(as_number(Some(&json!(" 7 "))), 7.0);
        assert_eq!(as_number(Some(&json!(true))), 1.0);
        assert!(as_number(Some(&json!(""))).is_nan());
        assert!(as_number(Some(&json!("abc"))).is_nan());
        assert!(as_number(Some(&Value::Null)).is_nan());
        assert!(as_number(None).is_nan());
    }

    #[test]
    fn only_js_number_spellings_parse() {
        assert_eq!(as_number(Some(&json!("1e3"))), 1000.0);
        assert_eq!(as_number(Some(&json!("-2.5E-1"))), -0.25);
        assert_eq!(as_number(Some(&json!("Infinity"))), f64::INFINITY);
        assert_eq!(as_number(Some(&json!("-Infinity"))), f64::NEG_INFINITY);
        for text in ["inf", "-inf", "infinity", "INF", "NaN", "nan", "+infinity"] {
            assert!(as_number(Some(&json!(text))).is_nan(), "{}", text);
        }
    }

    #[test]
    fn date_forms() {
        let day = parse_timestamp_ms("2024-01-19").unwrap();
        assert_eq!(parse_timestamp_ms("2024-01-19T00:00:00Z"), Some(day));
        assert_eq!(parse_timestamp_ms("2024-01-19T00:00:00"), Some(day));
        assert_eq!(parse_timestamp_ms("2024-01-19T01:00:00+01:00"), Some(day));
        assert_eq!(parse_timestamp_ms("not a date"), None);
        assert_eq!(parse_timestamp_ms(""), None);
        assert_eq!(as_timestamp_ms(Some(&json!(1000))), Some(1000));
    }

    #[test]
    fn out_of_range_epoch_is_unparsable() {
        assert_eq!(as_timestamp_ms(Some(&json!(-1e30))), None);
        assert_eq!(as_timestamp_ms(Some(&json!(1e30))), None);
        assert_eq!(as_timestamp_ms(Some(&json!(i64::MAX))), None);
    }

    #[test]
    fn text_forms() {
        assert_eq!(as_text(Some(&json!(5))), "5");
        assert_eq!(as_text(Some(&json!(5.5))), "5.5");
        assert_eq!(as_text(Some(&json!("C"))), "C");
        assert_eq!(as_text(Some(&Value::Null)), "");
        assert_eq!(as_text(None), "");
    }

    #[test]
    fn date_only_from_datetime() {
        assert_eq!(parse_date("2024-03-01T15:30:00Z"), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(parse_date("2024-03-01"), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(parse_date("03/01/2024"), None);
    }
}
