//! The table view: immutable records plus a small piece of view state that
//! only user events mutate.
//!
//! The page shown is always `sort(filter(records))` windowed by the current
//! page index. Every event goes through [`reduce`], which clamps the page
//! index before returning, so a `TableView` can never point past its data.

use anyhow::{anyhow, Result};
use std::str::FromStr;

use super::column::{Column, ColumnSet, ColumnType};
use super::compare::{default_tie_breaks, sort_rows, SortDirection, SortKey};
use super::page::{PageWindow, Pagination};
use crate::data::{distinct_values, Record};
use crate::format::format_cell;
use crate::logging::{log_view_event, ProfileScope};
use crate::state::Config;

pub const LOAD_FAILED_MESSAGE: &str = "Unable to load options data right now.";
pub const EMPTY_SNAPSHOT_MESSAGE: &str = "No options data available for the current window.";

pub fn empty_filter_message(filter: &str) -> String {
    format!("No options data available for {} in this window.", filter)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub filter: String,
    pub sort_key: String,
    pub sort_dir: SortDirection,
    pub page: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// Ticker selector changed
    SelectFilter(String),
    /// Header with this field key clicked
    ClickHeader(String),
    NextPage,
    PrevPage,
}

impl ViewEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ViewEvent::SelectFilter(_) => "select_filter",
            ViewEvent::ClickHeader(_) => "click_header",
            ViewEvent::NextPage => "next_page",
            ViewEvent::PrevPage => "prev_page",
        }
    }
}

impl FromStr for ViewEvent {
    type Err = anyhow::Error;

    /// `ticker=MSFT`, `sort=strike_price`, `next`, `prev`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s {
            "next" => return Ok(ViewEvent::NextPage),
            "prev" | "previous" => return Ok(ViewEvent::PrevPage),
            _ => {}
        }
        match s.split_once('=') {
            Some(("ticker", v)) | Some(("filter", v)) => Ok(ViewEvent::SelectFilter(v.to_string())),
            Some(("sort", v)) => Ok(ViewEvent::ClickHeader(v.to_string())),
            _ => Err(anyhow!("unrecognized view event: {:?}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReduceOutput {
    /// Whether the visible page must be re-rendered
    pub changed: bool,
}

/// Apply one user event to the view state.
///
/// `total_for` reports how many records match a filter value; it is used to
/// bound paging and to clamp the page index after the event.
pub fn reduce(
    state: &mut ViewState,
    event: &ViewEvent,
    columns: &ColumnSet,
    default_filter: &str,
    total_for: &dyn Fn(&str) -> usize,
    page_size: usize,
) -> ReduceOutput {
    let before = state.clone();
    match event {
        ViewEvent::SelectFilter(value) => {
            state.filter = if value.is_empty() {
                default_filter.to_string()
            } else {
                value.clone()
            };
            state.page = 0;
        }
        ViewEvent::ClickHeader(key) => {
            let Some(col) = columns.find(key) else {
                return ReduceOutput { changed: false };
            };
            if state.sort_key == col.key {
                state.sort_dir = state.sort_dir.toggled();
            } else {
                state.sort_key = col.key.clone();
                state.sort_dir = SortDirection::default_for(col.kind);
            }
            state.page = 0;
        }
        ViewEvent::NextPage => {
            let pages = Pagination::new(page_size, total_for(&state.filter));
            if state.page < pages.max_index() {
                state.page += 1;
            }
        }
        ViewEvent::PrevPage => {
            state.page = state.page.saturating_sub(1);
        }
    }
    state.page = Pagination::new(page_size, total_for(&state.filter)).clamp(state.page);
    ReduceOutput {
        changed: *state != before,
    }
}

#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub filter_key: String,
    pub default_filter: String,
    pub page_size: usize,
    pub initial_sort: (String, SortDirection),
    pub tie_breaks: Vec<SortKey>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            filter_key: "underlying_ticker".to_string(),
            default_filter: "AAPL".to_string(),
            page_size: 10,
            initial_sort: ("total_volume".to_string(), SortDirection::Desc),
            tie_breaks: default_tie_breaks(),
        }
    }
}

impl ViewOptions {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            filter_key: cfg.filter_key.clone(),
            default_filter: cfg.default_ticker.clone(),
            page_size: cfg.page_size.max(1),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell {
    pub label: String,
    pub key: String,
    pub kind: ColumnType,
    pub title: Option<String>,
    /// `ascending`, `descending` or `none`
    pub aria_sort: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Rows(Vec<Vec<String>>),
    /// Single full-width message row
    Empty(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PagerModel {
    pub status: String,
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

/// Everything a renderer needs for one full re-render.
#[derive(Debug, Clone, PartialEq)]
pub struct PageModel {
    pub filter: String,
    pub headers: Vec<HeaderCell>,
    pub body: Body,
    pub pager: PagerModel,
}

#[derive(Debug, Clone)]
pub struct TableView {
    records: Vec<Record>,
    columns: ColumnSet,
    options: ViewOptions,
    state: ViewState,
}

impl TableView {
    pub fn new(records: Vec<Record>, columns: ColumnSet, options: ViewOptions) -> Self {
        let state = ViewState {
            filter: options.default_filter.clone(),
            sort_key: options.initial_sort.0.clone(),
            sort_dir: options.initial_sort.1,
            page: 0,
        };
        Self {
            records,
            columns,
            options,
            state,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn page_size(&self) -> usize {
        self.options.page_size.max(1)
    }

    /// Distinct values of the filter field, for the shared selector.
    pub fn filter_values(&self) -> Vec<String> {
        distinct_values(&self.records, &self.options.filter_key)
    }

    fn count_for(&self, filter: &str) -> usize {
        self.records
            .iter()
            .filter(|r| r.field_equals(&self.options.filter_key, filter))
            .count()
    }

    pub fn dispatch(&mut self, event: ViewEvent) -> ReduceOutput {
        let mut state = self.state.clone();
        let out = reduce(
            &mut state,
            &event,
            &self.columns,
            &self.options.default_filter,
            &|f: &str| self.count_for(f),
            self.page_size(),
        );
        self.state = state;
        log_view_event(
            event.name(),
            &self.state.filter,
            &self.state.sort_key,
            self.state.sort_dir.as_str(),
            self.state.page,
            out.changed,
        );
        out
    }

    pub fn filtered(&self) -> Vec<&Record> {
        self.records
            .iter()
            .filter(|r| r.field_equals(&self.options.filter_key, &self.state.filter))
            .collect()
    }

    pub fn active_sort(&self) -> SortKey {
        SortKey::new(
            &self.state.sort_key,
            self.columns.kind_of(&self.state.sort_key),
            self.state.sort_dir,
        )
    }

    /// Filtered and sorted, before paging.
    pub fn sorted(&self) -> Vec<&Record> {
        let _scope = ProfileScope::new("view", "sort");
        let mut rows = self.filtered();
        sort_rows(&mut rows, &self.active_sort(), &self.options.tie_breaks);
        rows
    }

    pub fn current_page(&self) -> (PageWindow, Vec<&Record>) {
        let rows = self.sorted();
        let window = Pagination::new(self.page_size(), rows.len()).window(self.state.page);
        let page = rows[window.start..window.end].to_vec();
        (window, page)
    }

    pub fn page_model(&self) -> PageModel {
        let (window, rows) = self.current_page();
        let empty = rows.is_empty();
        let headers = self
            .columns
            .iter()
            .map(|c| HeaderCell {
                label: c.label.clone(),
                key: c.key.clone(),
                kind: c.kind,
                title: c.title.clone(),
                aria_sort: if !empty && c.key == self.state.sort_key {
                    self.state.sort_dir.aria()
                } else {
                    "none"
                },
            })
            .collect();

        if empty {
            return PageModel {
                filter: self.state.filter.clone(),
                headers,
                body: Body::Empty(empty_filter_message(&self.state.filter)),
                pager: PagerModel {
                    status: String::new(),
                    prev_disabled: true,
                    next_disabled: true,
                },
            };
        }

        let cols: Vec<&Column> = self.columns.iter().collect();
        let body = rows
            .iter()
            .map(|r| cols.iter().map(|c| format_cell(r, c)).collect())
            .collect();
        PageModel {
            filter: self.state.filter.clone(),
            headers,
            body: Body::Rows(body),
            pager: PagerModel {
                status: window.status_line(),
                prev_disabled: !window.has_prev,
                next_disabled: !window.has_next,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn contract(ticker: &str, vol: i64, strike: f64) -> Record {
        Record::new()
            .with("underlying_ticker", json!(ticker))
            .with("total_volume", json!(vol))
            .with("strike_price", json!(strike))
            .with("expiration_date", json!("2024-06-21"))
            .with("option_type", json!("C"))
    }

    fn view(records: Vec<Record>) -> TableView {
        TableView::new(records, ColumnSet::options_chain(), ViewOptions::default())
    }

    #[test]
    fn parse_events() {
        assert_eq!("next".parse::<ViewEvent>().unwrap(), ViewEvent::NextPage);
        assert_eq!("prev".parse::<ViewEvent>().unwrap(), ViewEvent::PrevPage);
        assert_eq!(
            "ticker=MSFT".parse::<ViewEvent>().unwrap(),
            ViewEvent::SelectFilter("MSFT".into())
        );
        assert_eq!(
            "sort=strike_price".parse::<ViewEvent>().unwrap(),
            ViewEvent::ClickHeader("strike_price".into())
        );
        assert!("jump".parse::<ViewEvent>().is_err());
    }

    #[test]
    fn header_click_toggles_and_defaults() {
        let mut v = view(vec![contract("AAPL", 1, 1.0)]);
        assert_eq!(v.state().sort_dir, SortDirection::Desc);
        v.dispatch(ViewEvent::ClickHeader("total_volume".into()));
        assert_eq!(v.state().sort_dir, SortDirection::Asc);
        v.dispatch(ViewEvent::ClickHeader("option_type".into()));
        assert_eq!(v.state().sort_key, "option_type");
        assert_eq!(v.state().sort_dir, SortDirection::Asc);
        v.dispatch(ViewEvent::ClickHeader("expiration_date".into()));
        assert_eq!(v.state().sort_dir, SortDirection::Desc);
    }

    #[test]
    fn unknown_header_is_noop() {
        let mut v = view(vec![contract("AAPL", 1, 1.0)]);
        let out = v.dispatch(ViewEvent::ClickHeader("underlying_ticker".into()));
        assert!(!out.changed);
        assert_eq!(v.state().sort_key, "total_volume");
    }

    #[test]
    fn paging_stops_at_bounds() {
        let records = (0..25).map(|i| contract("AAPL", i, i as f64)).collect();
        let mut v = view(records);
        assert!(!v.dispatch(ViewEvent::PrevPage).changed);
        v.dispatch(ViewEvent::NextPage);
        v.dispatch(ViewEvent::NextPage);
        assert_eq!(v.state().page, 2);
        assert!(!v.dispatch(ViewEvent::NextPage).changed);
        let model = v.page_model();
        assert!(!model.pager.prev_disabled);
        assert!(model.pager.next_disabled);
        assert_eq!(model.pager.status, "Showing 21–25 of 25 contracts");
    }

    #[test]
    fn empty_filter_falls_back_to_default() {
        let mut v = view(vec![contract("AAPL", 1, 1.0), contract("MSFT", 1, 1.0)]);
        v.dispatch(ViewEvent::SelectFilter("MSFT".into()));
        assert_eq!(v.state().filter, "MSFT");
        v.dispatch(ViewEvent::SelectFilter(String::new()));
        assert_eq!(v.state().filter, "AAPL");
    }

    #[test]
    fn empty_result_model() {
        let mut v = view(vec![contract("AAPL", 1, 1.0)]);
        v.dispatch(ViewEvent::SelectFilter("TSLA".into()));
        let model = v.page_model();
        assert_eq!(
            model.body,
            Body::Empty("No options data available for TSLA in this window.".into())
        );
        assert!(model.headers.iter().all(|h| h.aria_sort == "none"));
        assert!(model.pager.prev_disabled && model.pager.next_disabled);
        assert_eq!(model.pager.status, "");
    }

    #[test]
    fn active_header_marked() {
        let v = view(vec![contract("AAPL", 1, 1.0)]);
        let model = v.page_model();
        let vol = model.headers.iter().find(|h| h.key == "total_volume").unwrap();
        assert_eq!(vol.aria_sort, "descending");
        assert_eq!(model.headers.iter().filter(|h| h.aria_sort != "none").count(), 1);
    }
}
