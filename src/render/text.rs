use crate::table::view::{Body, PageModel};

fn width(s: &str) -> usize {
    s.chars().count()
}

fn pad(s: &str, w: usize) -> String {
    let mut out = s.to_string();
    for _ in width(s)..w {
        out.push(' ');
    }
    out
}

fn sort_marker(aria: &str) -> &'static str {
    match aria {
        "ascending" => " ^",
        "descending" => " v",
        _ => "",
    }
}

/// Aligned plain-text table followed by the pager line.
pub fn render_text(model: &PageModel) -> String {
    let labels: Vec<String> = model
        .headers
        .iter()
        .map(|h| format!("{}{}", h.label, sort_marker(h.aria_sort)))
        .collect();
    let mut widths: Vec<usize> = labels.iter().map(|l| width(l)).collect();
    if let Body::Rows(rows) = &model.body {
        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(width(cell));
                }
            }
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, c)| pad(c, widths.get(i).copied().unwrap_or(0)))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(&labels));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');
    match &model.body {
        Body::Rows(rows) => {
            for row in rows {
                out.push_str(&line(row));
                out.push('\n');
            }
        }
        Body::Empty(message) => {
            out.push_str(message);
            out.push('\n');
        }
    }
    let prev = if model.pager.prev_disabled { "(prev)" } else { "[prev]" };
    let next = if model.pager.next_disabled { "(next)" } else { "[next]" };
    if model.pager.status.is_empty() {
        out.push_str(&format!("{} {}\n", prev, next));
    } else {
        out.push_str(&format!("{} {} {}\n", prev, model.pager.status, next));
    }
    out
}
