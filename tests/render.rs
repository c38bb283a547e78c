use chainview::data::Record;
use chainview::feed::Dashboard;
use chainview::render::render_dashboard;
use chainview::state::{Config, OutputFormat};
use chainview::table::{ColumnSet, TableView, ViewEvent, ViewOptions};
use chainview::table::view::{EMPTY_SNAPSHOT_MESSAGE, LOAD_FAILED_MESSAGE};
use serde_json::json;

fn record(ticker: &str, symbol: &str, strike: f64, volume: i64) -> Record {
    Record::new()
        .with("underlying_ticker", json!(ticker))
        .with("option_symbol", json!(symbol))
        .with("expiration_date", json!("2025-01-17"))
        .with("option_type", json!("C"))
        .with("strike_price", json!(strike))
        .with("latest_close_price", json!(3.1))
        .with("total_volume", json!(volume))
        .with("days_to_expiration", json!(-2))
        .with("signed_moneyness_pct", json!(0.125))
}

fn ready(records: Vec<Record>, page_size: usize) -> Dashboard {
    Dashboard::Ready(TableView::new(
        records,
        ColumnSet::options_chain(),
        ViewOptions {
            page_size,
            ..ViewOptions::default()
        },
    ))
}

#[test]
fn html_fragment_has_selector_label_and_table() {
    let dashboard = ready(
        vec![record("AAPL", "A1", 150.0, 12000), record("MSFT", "M1", 300.0, 5)],
        10,
    );
    let html = render_dashboard(&dashboard, &Config::default());

    assert!(html.starts_with("<select id=\"daily-activity-ticker\">"));
    assert!(html.contains("<option value=\"AAPL\" selected>AAPL</option>"));
    assert!(html.contains("<option value=\"MSFT\">MSFT</option>"));
    assert!(html.contains("<span id=\"options-table-ticker-label\">AAPL</span>"));
    assert!(html.contains("<div id=\"tickers-options-chain-dashboard\">"));
    assert!(html.contains(
        "<th data-key=\"total_volume\" data-type=\"number\" data-index=\"4\" aria-sort=\"descending\">Total volume</th>"
    ));
    assert!(html.contains("aria-sort=\"none\"><abbr title=\"DTE = Days to Expiration"));
    assert!(html.contains(
        "<tr><td>Jan 17, 2025</td><td>Call</td><td>$150.00</td><td>$3.10</td><td>12,000</td><td>0</td><td>12.5%</td></tr>"
    ));
    assert!(!html.contains("M1"));
    assert!(html.contains("<span class=\"options-table-page-info\">Showing 1–1 of 1 contracts</span>"));
    assert!(html.contains("options-table-page-btn\" disabled>Previous"));
    assert!(html.contains("options-table-page-btn\" disabled>Next"));
}

#[test]
fn ticker_values_are_escaped() {
    let mut dashboard = ready(vec![record("<b>&", "X", 1.0, 1)], 10);
    if let Dashboard::Ready(view) = &mut dashboard {
        view.dispatch(ViewEvent::SelectFilter("<b>&".into()));
    }
    let html = render_dashboard(&dashboard, &Config::default());
    assert!(!html.contains("<b>"));
    assert!(html.contains("&lt;b&gt;&amp;"));
}

#[test]
fn unknown_ticker_renders_full_width_message() {
    let mut dashboard = ready(vec![record("AAPL", "A1", 150.0, 1)], 10);
    if let Dashboard::Ready(view) = &mut dashboard {
        view.dispatch(ViewEvent::SelectFilter("TSLA".into()));
    }
    let html = render_dashboard(&dashboard, &Config::default());
    assert!(html.contains("<td colspan=\"7\">No options data available for TSLA in this window.</td>"));
    assert!(!html.contains("aria-sort=\"descending\""));
}

#[test]
fn text_output_pages_through_rows() {
    let records = (0..3).map(|i| record("AAPL", &format!("A{}", i), 100.0 + i as f64, 10 - i)).collect();
    let mut dashboard = ready(records, 2);
    if let Dashboard::Ready(view) = &mut dashboard {
        view.dispatch(ViewEvent::NextPage);
    }
    let cfg = Config {
        output_format: OutputFormat::Text,
        ..Config::default()
    };
    let text = render_dashboard(&dashboard, &cfg);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Ticker: AAPL");
    assert!(lines[1].contains("Total volume v"));
    assert_eq!(lines.len(), 5);
    assert!(lines[3].contains("$102.00"));
    assert_eq!(lines[4], "[prev] Showing 3–3 of 3 contracts (next)");
}

#[test]
fn fallback_messages_replace_the_table() {
    let cfg = Config::default();
    let failed = render_dashboard(&Dashboard::Failed("timeout".into()), &cfg);
    assert!(failed.contains(LOAD_FAILED_MESSAGE));
    assert!(!failed.contains("<table"));

    let empty = render_dashboard(&Dashboard::Empty, &cfg);
    assert!(empty.contains(EMPTY_SNAPSHOT_MESSAGE));
    assert!(!empty.contains(LOAD_FAILED_MESSAGE));
}
