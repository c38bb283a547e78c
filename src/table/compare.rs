//! Typed comparators and the fixed tie-break chain.
//!
//! Missing or unparsable numbers and dates compare as NaN. NaN always sinks
//! to the end of the visible order, whichever direction is active.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::column::ColumnType;
use crate::data::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Numbers and dates open "biggest/soonest first", strings A→Z.
    pub fn default_for(kind: ColumnType) -> Self {
        match kind {
            ColumnType::Number | ColumnType::Date => SortDirection::Desc,
            ColumnType::String => SortDirection::Asc,
        }
    }

    pub fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }

    pub fn aria(self) -> &'static str {
        match self {
            SortDirection::Asc => "ascending",
            SortDirection::Desc => "descending",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

fn numeric_key(record: &Record, key: &str, kind: ColumnType) -> f64 {
    match kind {
        ColumnType::Date => record.timestamp_ms(key).map(|ms| ms as f64).unwrap_or(f64::NAN),
        _ => record.number(key),
    }
}

fn compare_numeric(a: f64, b: f64, dir: SortDirection) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => dir.apply(a.partial_cmp(&b).unwrap_or(Ordering::Equal)),
    }
}

/// Compare one field of two records under the given type and direction.
pub fn compare_field(a: &Record, b: &Record, key: &str, kind: ColumnType, dir: SortDirection) -> Ordering {
    match kind {
        ColumnType::Number | ColumnType::Date => {
            compare_numeric(numeric_key(a, key, kind), numeric_key(b, key, kind), dir)
        }
        ColumnType::String => dir.apply(a.text(key).cmp(&b.text(key))),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub key: String,
    pub kind: ColumnType,
    pub dir: SortDirection,
}

impl SortKey {
    pub fn new(key: &str, kind: ColumnType, dir: SortDirection) -> Self {
        Self {
            key: key.to_string(),
            kind,
            dir,
        }
    }
}

/// Secondary keys consulted, in order, when the active column ties. A key
/// equal to the active column is skipped.
pub fn default_tie_breaks() -> Vec<SortKey> {
    vec![
        SortKey::new("total_volume", ColumnType::Number, SortDirection::Desc),
        SortKey::new("expiration_date", ColumnType::Date, SortDirection::Asc),
        SortKey::new("strike_price", ColumnType::Number, SortDirection::Asc),
        SortKey::new("option_type", ColumnType::String, SortDirection::Asc),
        SortKey::new("option_symbol", ColumnType::String, SortDirection::Asc),
    ]
}

pub fn compare_records(a: &Record, b: &Record, active: &SortKey, tie_breaks: &[SortKey]) -> Ordering {
    let primary = compare_field(a, b, &active.key, active.kind, active.dir);
    if primary != Ordering::Equal {
        return primary;
    }
    for tb in tie_breaks.iter().filter(|tb| tb.key != active.key) {
        let ord = compare_field(a, b, &tb.key, tb.kind, tb.dir);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

pub fn sort_rows(rows: &mut [&Record], active: &SortKey, tie_breaks: &[SortKey]) {
    rows.sort_by(|a, b| compare_records(a, b, active, tie_breaks));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn rec(vol: Value, strike: Value) -> Record {
        Record::new().with("total_volume", vol).with("strike_price", strike)
    }

    #[test]
    fn volume_tie_falls_to_strike() {
        let a = rec(json!(5), json!(10));
        let b = rec(json!(5), json!(5));
        let mut rows = vec![&a, &b];
        let active = SortKey::new("total_volume", ColumnType::Number, SortDirection::Desc);
        sort_rows(&mut rows, &active, &default_tie_breaks());
        assert_eq!(rows[0].number("strike_price"), 5.0);
        assert_eq!(rows[1].number("strike_price"), 10.0);
    }

    #[test]
    fn nan_sinks_in_both_directions() {
        let a = rec(json!(null), json!(1));
        let b = rec(json!(3), json!(2));
        let c = rec(json!("n/a"), json!(3));
        let d = rec(json!(7), json!(4));
        for dir in [SortDirection::Asc, SortDirection::Desc] {
            let mut rows = vec![&a, &b, &c, &d];
            let active = SortKey::new("total_volume", ColumnType::Number, dir);
            sort_rows(&mut rows, &active, &default_tie_breaks());
            assert!(!rows[0].number("total_volume").is_nan());
            assert!(!rows[1].number("total_volume").is_nan());
            assert!(rows[2].number("total_volume").is_nan());
            assert!(rows[3].number("total_volume").is_nan());
        }
    }

    #[test]
    fn strings_treat_null_as_empty() {
        let a = Record::new().with("option_type", json!(null));
        let b = Record::new().with("option_type", json!("C"));
        assert_eq!(
            compare_field(&a, &b, "option_type", ColumnType::String, SortDirection::Asc),
            Ordering::Less
        );
        assert_eq!(
            compare_field(&a, &b, "option_type", ColumnType::String, SortDirection::Desc),
            Ordering::Greater
        );
    }

    #[test]
    fn dates_compare_as_timestamps() {
        let a = Record::new().with("expiration_date", json!("2024-02-01"));
        let b = Record::new().with("expiration_date", json!("2024-01-31T23:00:00Z"));
        let bad = Record::new().with("expiration_date", json!("soon"));
        assert_eq!(
            compare_field(&a, &b, "expiration_date", ColumnType::Date, SortDirection::Asc),
            Ordering::Greater
        );
        assert_eq!(
            compare_field(&bad, &a, "expiration_date", ColumnType::Date, SortDirection::Desc),
            Ordering::Greater
        );
    }

    #[test]
    fn default_directions() {
        assert_eq!(SortDirection::default_for(ColumnType::Number), SortDirection::Desc);
        assert_eq!(SortDirection::default_for(ColumnType::Date), SortDirection::Desc);
        assert_eq!(SortDirection::default_for(ColumnType::String), SortDirection::Asc);
        assert_eq!(SortDirection::Asc.toggled(), SortDirection::Desc);
    }
}
