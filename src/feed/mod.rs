pub mod source;

use anyhow::Result;

use crate::data::{derive_days_to_expiration, ParsedSnapshot};
use crate::logging::{log_fetch_failed, log_fetch_start, log_snapshot_empty, log_snapshot_loaded};
use crate::state::Config;
use crate::table::column::ColumnPreset;
use crate::table::view::{TableView, ViewOptions, EMPTY_SNAPSHOT_MESSAGE, LOAD_FAILED_MESSAGE};

pub use source::{source_for, FileSource, HttpSource, SnapshotSource};

/// Outcome of the one snapshot load a view instance performs.
#[derive(Debug)]
pub enum Dashboard {
    Ready(TableView),
    /// Load succeeded with zero records
    Empty,
    /// Load or parse failed; carries the error text for logs
    Failed(String),
}

impl Dashboard {
    /// Static message shown in place of the table, if any.
    pub fn fallback_message(&self) -> Option<&'static str> {
        match self {
            Dashboard::Ready(_) => None,
            Dashboard::Empty => Some(EMPTY_SNAPSHOT_MESSAGE),
            Dashboard::Failed(_) => Some(LOAD_FAILED_MESSAGE),
        }
    }

    pub fn from_load(source: &str, result: Result<ParsedSnapshot>, cfg: &Config) -> Self {
        match result {
            Err(err) => {
                let text = format!("{:#}", err);
                log_fetch_failed(source, &text);
                Dashboard::Failed(text)
            }
            Ok(parsed) if parsed.records.is_empty() => {
                log_snapshot_empty(source);
                Dashboard::Empty
            }
            Ok(parsed) => {
                log_snapshot_loaded(source, parsed.records.len(), parsed.bad_rows);
                let mut records = parsed.records;
                if cfg.column_preset == ColumnPreset::TopContracts {
                    derive_days_to_expiration(
                        &mut records,
                        cfg.as_of_date(),
                        "expiration_date",
                        cfg.column_preset.dte_field(),
                    );
                }
                Dashboard::Ready(TableView::new(
                    records,
                    cfg.column_preset.columns(),
                    ViewOptions::from_config(cfg),
                ))
            }
        }
    }
}

pub async fn load_dashboard(source: &dyn SnapshotSource, cfg: &Config) -> Dashboard {
    let name = source.describe();
    log_fetch_start(&name);
    let result = source.load().await;
    Dashboard::from_load(&name, result, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;
    use anyhow::anyhow;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn failure_and_empty_are_distinct() {
        let cfg = Config::default();
        let failed = Dashboard::from_load("x", Err(anyhow!("boom")), &cfg);
        assert_eq!(failed.fallback_message(), Some(LOAD_FAILED_MESSAGE));
        let empty = Dashboard::from_load("x", Ok(ParsedSnapshot::default()), &cfg);
        assert_eq!(empty.fallback_message(), Some(EMPTY_SNAPSHOT_MESSAGE));
    }

    #[test]
    fn top_contracts_derive_dte() {
        let cfg = Config {
            column_preset: ColumnPreset::TopContracts,
            snapshot_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            ..Config::default()
        };
        let parsed = ParsedSnapshot {
            records: vec![Record::new()
                .with("underlying_ticker", json!("AAPL"))
                .with("expiration_date", json!("2024-06-21"))],
            bad_rows: 0,
        };
        match Dashboard::from_load("x", Ok(parsed), &cfg) {
            Dashboard::Ready(view) => assert_eq!(view.records()[0].get("dte"), Some(&json!(20))),
            other => panic!("expected ready, got {:?}", other),
        }
    }
}
