pub mod value;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Fields every options snapshot row is expected to carry.
pub const EXPECTED_FIELDS: [&str; 9] = [
    "option_symbol",
    "underlying_ticker",
    "expiration_date",
    "option_type",
    "strike_price",
    "latest_close_price",
    "total_volume",
    "days_to_expiration",
    "signed_moneyness_pct",
];

/// One flat snapshot row, kept exactly as it was loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.0.insert(key.to_string(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn number(&self, key: &str) -> f64 {
        value::as_number(self.get(key))
    }

    pub fn timestamp_ms(&self, key: &str) -> Option<i64> {
        value::as_timestamp_ms(self.get(key))
    }

    pub fn text(&self, key: &str) -> String {
        value::as_text(self.get(key))
    }

    /// Exact string equality, as the ticker selector compares.
    pub fn field_equals(&self, key: &str, expected: &str) -> bool {
        matches!(self.get(key), Some(Value::String(s)) if s == expected)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    fn set_derived(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParsedSnapshot {
    pub records: Vec<Record>,
    /// Array elements that were not JSON objects
    pub bad_rows: u64,
}

/// Parse a snapshot body: a JSON array of flat objects.
pub fn parse_records(bytes: &[u8]) -> Result<ParsedSnapshot> {
    let root: Value = serde_json::from_slice(bytes).context("snapshot is not valid JSON")?;
    let items = match root {
        Value::Array(items) => items,
        other => {
            return Err(anyhow!(
                "snapshot root must be an array, got {}",
                json_kind(&other)
            ))
        }
    };
    let mut parsed = ParsedSnapshot::default();
    for item in items {
        match item {
            Value::Object(fields) => parsed.records.push(Record::from_map(fields)),
            _ => parsed.bad_rows += 1,
        }
    }
    Ok(parsed)
}

pub fn load_records(path: &Path) -> Result<ParsedSnapshot> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse_records(&bytes).with_context(|| format!("failed to parse {}", path.display()))
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Sorted distinct string values of `key`, used to fill the ticker selector.
pub fn distinct_values(records: &[Record], key: &str) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| match r.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Whole days from `as_of` to `expiry`, rounded up and floored at zero.
/// `None` when the difference does not fit in milliseconds.
pub fn days_until(expiry_ms: i64, as_of: NaiveDate) -> Option<i64> {
    let start = as_of.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis();
    let diff = expiry_ms.checked_sub(start)?;
    let day = 86_400_000i64;
    let days = if diff > 0 { diff.checked_add(day - 1)? / day } else { diff / day };
    Some(days.max(0))
}

/// Set `field` on every record to days-to-expiration measured from `as_of`.
/// Records without a parsable expiry get `null`.
pub fn derive_days_to_expiration(records: &mut [Record], as_of: NaiveDate, expiry_key: &str, field: &str) {
    for record in records.iter_mut() {
        let derived = match record.timestamp_ms(expiry_key).and_then(|ms| days_until(ms, as_of)) {
            Some(days) => Value::from(days),
            None => Value::Null,
        };
        record.set_derived(field, derived);
    }
}

// =============================================================================
// Snapshot manifest
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotManifest {
    pub path: String,
    pub hash_sha256: String,
    pub record_count: u64,
    pub bad_rows: u64,
    pub tickers: Vec<String>,
    pub unparsable_expiry: u64,
    pub missing_fields: BTreeMap<String, u64>,
    pub warnings: Vec<String>,
    pub generated_at_epoch: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataQualityReport {
    pub records: u64,
    pub bad_rows: u64,
    pub tickers: u64,
    pub empty: bool,
    pub warnings: Vec<String>,
}

pub fn analyze_snapshot(path: &Path, now_ts: u64) -> Result<(SnapshotManifest, DataQualityReport)> {
    let hash = file_sha256(path)?;
    let parsed = load_records(path)?;
    let mut warnings = Vec::new();

    let mut missing_fields: BTreeMap<String, u64> = BTreeMap::new();
    let mut unparsable_expiry = 0u64;
    for record in &parsed.records {
        for field in EXPECTED_FIELDS {
            if matches!(record.get(field), None | Some(Value::Null)) {
                *missing_fields.entry(field.to_string()).or_insert(0) += 1;
            }
        }
        if record.contains("expiration_date") && record.timestamp_ms("expiration_date").is_none() {
            unparsable_expiry += 1;
        }
    }

    let tickers = distinct_values(&parsed.records, "underlying_ticker");
    if parsed.records.is_empty() {
        warnings.push("empty_snapshot".to_string());
    }
    if parsed.bad_rows > 0 {
        warnings.push(format!("bad_rows: {}", parsed.bad_rows));
    }
    if unparsable_expiry > 0 {
        warnings.push(format!("unparsable_expiry: {}", unparsable_expiry));
    }
    for (field, count) in &missing_fields {
        warnings.push(format!("missing_field: {} ({} rows)", field, count));
    }

    let manifest = SnapshotManifest {
        path: path.display().to_string(),
        hash_sha256: hash,
        record_count: parsed.records.len() as u64,
        bad_rows: parsed.bad_rows,
        tickers: tickers.clone(),
        unparsable_expiry,
        missing_fields,
        warnings: warnings.clone(),
        generated_at_epoch: now_ts,
    };

    let report = DataQualityReport {
        records: parsed.records.len() as u64,
        bad_rows: parsed.bad_rows,
        tickers: tickers.len() as u64,
        empty: parsed.records.is_empty(),
        warnings,
    };

    Ok((manifest, report))
}

pub fn file_sha256(path: &Path) -> Result<String> {
    let mut file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

pub fn default_manifest_path(snapshot_path: &Path) -> PathBuf {
    let mut p = snapshot_path.to_path_buf();
    let fname = snapshot_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("snapshot.json");
    p.set_file_name(format!("{}.manifest.json", fname));
    p
}
