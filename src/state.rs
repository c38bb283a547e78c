use anyhow::Result;
use chrono::NaiveDate;

use crate::table::column::ColumnPreset;
use crate::table::view::ViewEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Html,
    Text,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "html" => Some(OutputFormat::Html),
            "text" | "txt" => Some(OutputFormat::Text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// File path or http(s) URL of the snapshot JSON
    pub data_url: String,
    /// Record field the ticker selector filters on
    pub filter_key: String,
    /// Used when the selector value is empty
    pub default_ticker: String,
    pub page_size: usize,
    /// Reference date for derived DTE; `None` means today (UTC)
    pub snapshot_date: Option<NaiveDate>,
    pub column_preset: ColumnPreset,
    pub output_format: OutputFormat,
    pub http_timeout_secs: u64,
    pub container_id: String,
    pub selector_id: String,
    pub ticker_label_id: String,
    pub top_n: usize,
    pub window_days: i64,
    /// Underlyings kept by the export step; empty keeps all
    pub tickers: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_url: "public/assets/data/options_top_contracts_8tickers.json".to_string(),
            filter_key: "underlying_ticker".to_string(),
            default_ticker: "AAPL".to_string(),
            page_size: 10,
            snapshot_date: None,
            column_preset: ColumnPreset::OptionsChain,
            output_format: OutputFormat::Html,
            http_timeout_secs: 10,
            container_id: "tickers-options-chain-dashboard".to_string(),
            selector_id: "daily-activity-ticker".to_string(),
            ticker_label_id: "options-table-ticker-label".to_string(),
            top_n: 25,
            window_days: 60,
            tickers: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            data_url: std::env::var("DATA_URL").unwrap_or(d.data_url),
            filter_key: std::env::var("FILTER_KEY").unwrap_or(d.filter_key),
            default_ticker: std::env::var("DEFAULT_TICKER").unwrap_or(d.default_ticker),
            page_size: std::env::var("PAGE_SIZE").ok().and_then(|v| v.parse().ok()).unwrap_or(d.page_size).max(1),
            snapshot_date: std::env::var("SNAPSHOT_DATE")
                .ok()
                .and_then(|v| NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").ok()),
            column_preset: std::env::var("COLUMN_PRESET")
                .ok()
                .and_then(|v| ColumnPreset::parse(&v))
                .unwrap_or(d.column_preset),
            output_format: std::env::var("OUTPUT_FORMAT")
                .ok()
                .and_then(|v| OutputFormat::parse(&v))
                .unwrap_or(d.output_format),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(d.http_timeout_secs),
            container_id: std::env::var("CONTAINER_ID").unwrap_or(d.container_id),
            selector_id: std::env::var("SELECTOR_ID").unwrap_or(d.selector_id),
            ticker_label_id: std::env::var("TICKER_LABEL_ID").unwrap_or(d.ticker_label_id),
            top_n: std::env::var("TOP_N").ok().and_then(|v| v.parse().ok()).unwrap_or(d.top_n),
            window_days: std::env::var("WINDOW_DAYS").ok().and_then(|v| v.parse().ok()).unwrap_or(d.window_days).max(1),
            tickers: std::env::var("TICKERS")
                .map(|v| parse_ticker_list(&v))
                .unwrap_or(d.tickers),
        }
    }

    /// Date that derived days-to-expiration is measured from.
    pub fn as_of_date(&self) -> NaiveDate {
        self.snapshot_date.unwrap_or_else(today_utc)
    }
}

/// Command line of the `chainview` binary: `[--] [SOURCE] [EVENT...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// Overrides `DATA_URL` when present
    pub source: Option<String>,
    pub events: Vec<ViewEvent>,
}

impl Invocation {
    /// A first argument that reads as an event (`next`, `ticker=..`) is an
    /// event. A leading `--` forces the argument after it to be the source.
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter().peekable();
        let (separator, has_source) = match args.peek() {
            Some(first) if first == "--" => (true, true),
            Some(first) => (false, first.parse::<ViewEvent>().is_err()),
            None => (false, false),
        };
        if separator {
            args.next();
        }
        let source = if has_source { args.next() } else { None };
        let events = args.map(|a| a.parse::<ViewEvent>()).collect::<Result<Vec<_>>>()?;
        Ok(Self { source, events })
    }
}

/// "AAPL, msft,,NVDA" -> ["AAPL", "MSFT", "NVDA"]
pub fn parse_ticker_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect()
}

pub fn today_utc() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

pub fn now_ts() -> u64 {
    chrono::Utc::now().timestamp() as u64
}
