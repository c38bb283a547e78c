//! HTML fragments matching the options table's DOM contract: a container
//! with a known id, an `options-table` table with `data-key`/`aria-sort`
//! headers, and an `options-table-pager` control row.

use std::fmt::Write;

use crate::table::view::{Body, PageModel};

/// Element ids the fragment binds to.
#[derive(Debug, Clone)]
pub struct RenderTarget {
    pub container_id: String,
    pub selector_id: String,
    pub ticker_label_id: String,
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn disabled(flag: bool) -> &'static str {
    if flag {
        " disabled"
    } else {
        ""
    }
}

/// `<table>` plus pager for one page model.
pub fn render_table(model: &PageModel) -> String {
    let mut out = String::new();
    out.push_str("<table class=\"options-table\">\n<thead>\n<tr>");
    for (idx, h) in model.headers.iter().enumerate() {
        let _ = write!(
            out,
            "<th data-key=\"{}\" data-type=\"{}\" data-index=\"{}\" aria-sort=\"{}\">",
            html_escape(&h.key),
            h.kind.as_str(),
            idx,
            h.aria_sort
        );
        match &h.title {
            Some(title) => {
                let _ = write!(
                    out,
                    "<abbr title=\"{}\">{}</abbr>",
                    html_escape(title),
                    html_escape(&h.label)
                );
            }
            None => out.push_str(&html_escape(&h.label)),
        }
        out.push_str("</th>");
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");
    match &model.body {
        Body::Rows(rows) => {
            for row in rows {
                out.push_str("<tr>");
                for cell in row {
                    let _ = write!(out, "<td>{}</td>", html_escape(cell));
                }
                out.push_str("</tr>\n");
            }
        }
        Body::Empty(message) => {
            let _ = writeln!(
                out,
                "<tr><td colspan=\"{}\">{}</td></tr>",
                model.headers.len(),
                html_escape(message)
            );
        }
    }
    out.push_str("</tbody>\n</table>\n");
    let _ = writeln!(
        out,
        "<div class=\"options-table-pager\"><button type=\"button\" class=\"options-table-page-btn\"{}>Previous</button><span class=\"options-table-page-info\">{}</span><button type=\"button\" class=\"options-table-page-btn\"{}>Next</button></div>",
        disabled(model.pager.prev_disabled),
        html_escape(&model.pager.status),
        disabled(model.pager.next_disabled)
    );
    out
}

/// Container holding the table, or the static fallback text.
pub fn render_container(target: &RenderTarget, model: Option<&PageModel>, fallback: &str) -> String {
    let inner = match model {
        Some(m) => render_table(m),
        None => format!("{}\n", html_escape(fallback)),
    };
    format!(
        "<div id=\"{}\">\n{}</div>\n",
        html_escape(&target.container_id),
        inner
    )
}

/// The shared ticker `<select>` with the current value selected.
pub fn render_selector(target: &RenderTarget, values: &[String], selected: &str) -> String {
    let mut out = format!("<select id=\"{}\">", html_escape(&target.selector_id));
    for v in values {
        let sel = if v == selected { " selected" } else { "" };
        let _ = write!(out, "<option value=\"{0}\"{1}>{0}</option>", html_escape(v), sel);
    }
    out.push_str("</select>\n");
    out
}

pub fn render_ticker_label(target: &RenderTarget, ticker: &str) -> String {
    let shown = if ticker.is_empty() { "—" } else { ticker };
    format!(
        "<span id=\"{}\">{}</span>\n",
        html_escape(&target.ticker_label_id),
        html_escape(shown)
    )
}
