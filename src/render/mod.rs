pub mod html;
pub mod text;

use crate::feed::Dashboard;
use crate::logging::{log_render, ProfileScope};
use crate::state::{Config, OutputFormat};
use crate::table::view::Body;

pub use html::{html_escape, render_container, render_table, RenderTarget};
pub use text::render_text;

impl RenderTarget {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            container_id: cfg.container_id.clone(),
            selector_id: cfg.selector_id.clone(),
            ticker_label_id: cfg.ticker_label_id.clone(),
        }
    }
}

/// Full re-render of a dashboard in the configured output format.
///
/// HTML output includes the shared ticker selector and label when the
/// snapshot loaded; fallbacks render the static message alone.
pub fn render_dashboard(dashboard: &Dashboard, cfg: &Config) -> String {
    let _scope = ProfileScope::new("render", "dashboard");
    let target = RenderTarget::from_config(cfg);
    let (out, ticker, rows) = match (dashboard, cfg.output_format) {
        (Dashboard::Ready(view), OutputFormat::Html) => {
            let model = view.page_model();
            let mut out = html::render_selector(&target, &view.filter_values(), &model.filter);
            out.push_str(&html::render_ticker_label(&target, &model.filter));
            out.push_str(&render_container(&target, Some(&model), ""));
            (out, model.filter.clone(), body_rows(&model.body))
        }
        (Dashboard::Ready(view), OutputFormat::Text) => {
            let model = view.page_model();
            let mut out = format!("Ticker: {}\n", model.filter);
            out.push_str(&render_text(&model));
            (out, model.filter.clone(), body_rows(&model.body))
        }
        (other, OutputFormat::Html) => {
            let msg = other.fallback_message().unwrap_or_default();
            (render_container(&target, None, msg), String::new(), 0)
        }
        (other, OutputFormat::Text) => {
            let msg = other.fallback_message().unwrap_or_default();
            (format!("{}\n", msg), String::new(), 0)
        }
    };
    let format = match cfg.output_format {
        OutputFormat::Html => "html",
        OutputFormat::Text => "text",
    };
    log_render(format, &ticker, rows, out.len());
    out
}

fn body_rows(body: &Body) -> usize {
    match body {
        Body::Rows(rows) => rows.len(),
        Body::Empty(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::view::{EMPTY_SNAPSHOT_MESSAGE, LOAD_FAILED_MESSAGE};

    #[test]
    fn fallbacks_replace_table() {
        let cfg = Config::default();
        let html = render_dashboard(&Dashboard::Failed("boom".into()), &cfg);
        assert_eq!(
            html,
            format!("<div id=\"tickers-options-chain-dashboard\">\n{}\n</div>\n", LOAD_FAILED_MESSAGE)
        );
        let text_cfg = Config {
            output_format: OutputFormat::Text,
            ..Config::default()
        };
        assert_eq!(
            render_dashboard(&Dashboard::Empty, &text_cfg),
            format!("{}\n", EMPTY_SNAPSHOT_MESSAGE)
        );
    }
}
