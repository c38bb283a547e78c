//! Top-contracts export: condense daily options-chain rows into one row per
//! contract over a trailing window, then keep the most traded contracts of
//! each underlying.

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::data::value::parse_date;
use crate::logging::log_export;
use crate::state::Config;

/// One contract on one trading day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyChainRow {
    pub option_symbol: String,
    pub underlying_ticker: String,
    pub trade_date: String,
    pub expiration_date: String,
    pub option_type: String,
    pub strike_price: f64,
    #[serde(default)]
    pub option_close_price: Option<f64>,
    #[serde(default)]
    pub option_volume: Option<f64>,
    #[serde(default)]
    pub signed_moneyness_pct: Option<f64>,
}

/// One row of the exported snapshot; field names match the table presets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopContract {
    pub option_symbol: String,
    pub underlying_ticker: String,
    pub expiration_date: String,
    pub option_type: String,
    pub strike_price: f64,
    pub latest_close_price: Option<f64>,
    pub total_volume: f64,
    /// Relative to the underlying's last trade date; negative once expired
    pub days_to_expiration: Option<i64>,
    pub signed_moneyness_pct: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub window_days: i64,
    pub top_n: usize,
    /// Restrict to these underlyings; empty keeps all
    pub tickers: Vec<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            window_days: 60,
            top_n: 25,
            tickers: Vec::new(),
        }
    }
}

impl ExportOptions {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            window_days: cfg.window_days,
            top_n: cfg.top_n,
            tickers: cfg.tickers.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub rows: Vec<TopContract>,
    pub input_rows: usize,
    /// Rows dropped for an unparsable trade date
    pub skipped: usize,
    pub tickers: Vec<String>,
}

struct Accumulator {
    first: DailyChainRow,
    total_volume: f64,
    moneyness_sum: f64,
    moneyness_n: u32,
    latest: Option<(NaiveDate, Option<f64>)>,
}

impl Accumulator {
    fn new(row: &DailyChainRow) -> Self {
        Self {
            first: row.clone(),
            total_volume: 0.0,
            moneyness_sum: 0.0,
            moneyness_n: 0,
            latest: None,
        }
    }

    fn add(&mut self, row: &DailyChainRow, trade_date: NaiveDate) {
        self.total_volume += row.option_volume.unwrap_or(0.0);
        if let Some(m) = row.signed_moneyness_pct {
            self.moneyness_sum += m;
            self.moneyness_n += 1;
        }
        let newer = match self.latest {
            None => true,
            Some((d, _)) => trade_date > d,
        };
        if newer {
            self.latest = Some((trade_date, row.option_close_price));
        }
    }

    fn finish(self, max_trade_date: NaiveDate) -> TopContract {
        let dte = parse_date(&self.first.expiration_date).map(|exp| (exp - max_trade_date).num_days());
        TopContract {
            option_symbol: self.first.option_symbol,
            underlying_ticker: self.first.underlying_ticker,
            expiration_date: self.first.expiration_date,
            option_type: self.first.option_type,
            strike_price: self.first.strike_price,
            latest_close_price: self.latest.and_then(|(_, close)| close),
            total_volume: self.total_volume,
            days_to_expiration: dte,
            signed_moneyness_pct: if self.moneyness_n > 0 {
                Some(self.moneyness_sum / self.moneyness_n as f64)
            } else {
                None
            },
        }
    }
}

fn rank_order(a: &TopContract, b: &TopContract) -> Ordering {
    b.total_volume
        .partial_cmp(&a.total_volume)
        .unwrap_or(Ordering::Equal)
        .then_with(|| {
            let ea = parse_date(&a.expiration_date);
            let eb = parse_date(&b.expiration_date);
            match (ea, eb) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => a.expiration_date.cmp(&b.expiration_date),
            }
        })
        .then_with(|| a.strike_price.partial_cmp(&b.strike_price).unwrap_or(Ordering::Equal))
        .then_with(|| a.option_symbol.cmp(&b.option_symbol))
}

pub fn top_contracts(rows: &[DailyChainRow], opts: &ExportOptions) -> ExportSummary {
    let window = opts.window_days.max(1);
    let wanted = |t: &str| opts.tickers.is_empty() || opts.tickers.iter().any(|w| w == t);

    let mut skipped = 0usize;
    let mut dated: Vec<(&DailyChainRow, NaiveDate)> = Vec::with_capacity(rows.len());
    for row in rows.iter().filter(|r| wanted(&r.underlying_ticker)) {
        match parse_date(&row.trade_date) {
            Some(d) => dated.push((row, d)),
            None => skipped += 1,
        }
    }

    let mut bounds: HashMap<&str, NaiveDate> = HashMap::new();
    for (row, d) in &dated {
        bounds
            .entry(row.underlying_ticker.as_str())
            .and_modify(|m| *m = (*m).max(*d))
            .or_insert(*d);
    }

    let mut groups: BTreeMap<(String, String), Accumulator> = BTreeMap::new();
    for (row, d) in &dated {
        let max = bounds[row.underlying_ticker.as_str()];
        let min = max
            .checked_sub_days(Days::new((window - 1) as u64))
            .unwrap_or(NaiveDate::MIN);
        if *d < min || *d > max {
            continue;
        }
        groups
            .entry((row.underlying_ticker.clone(), row.option_symbol.clone()))
            .or_insert_with(|| Accumulator::new(row))
            .add(row, *d);
    }

    let mut by_ticker: BTreeMap<String, Vec<TopContract>> = BTreeMap::new();
    for ((ticker, _), acc) in groups {
        let max = bounds[ticker.as_str()];
        by_ticker.entry(ticker).or_default().push(acc.finish(max));
    }

    let tickers: Vec<String> = by_ticker.keys().cloned().collect();
    let mut out = Vec::new();
    for (_, mut contracts) in by_ticker {
        contracts.sort_by(rank_order);
        contracts.truncate(opts.top_n);
        out.extend(contracts);
    }

    log_export(tickers.len(), rows.len(), out.len());
    ExportSummary {
        rows: out,
        input_rows: rows.len(),
        skipped,
        tickers,
    }
}

pub fn load_daily_rows(path: &Path) -> Result<Vec<DailyChainRow>> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("failed to parse daily rows in {}", path.display()))
}

pub fn write_snapshot(path: &Path, rows: &[TopContract]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    let body = serde_json::to_string_pretty(rows)?;
    std::fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
