use anyhow::Result;
use serde_json::json;

use chainview::feed::{load_dashboard, source_for, Dashboard};
use chainview::logging::{json_log, obj, v_str};
use chainview::render::render_dashboard;
use chainview::state::{Config, Invocation};

/// chainview [--] [SOURCE] [EVENT...]
///
/// SOURCE is a snapshot path or URL (default `DATA_URL`). Events replay user
/// interaction in order: `ticker=MSFT`, `sort=strike_price`, `next`, `prev`.
/// A source whose name reads as an event needs the `--` separator.
#[tokio::main]
async fn main() -> Result<()> {
    let mut cfg = Config::from_env();
    let Invocation { source, events } = Invocation::parse(std::env::args().skip(1))?;
    if let Some(source) = source {
        cfg.data_url = source;
    }

    json_log(
        "startup",
        obj(&[
            ("source", v_str(&cfg.data_url)),
            ("ticker", v_str(&cfg.default_ticker)),
            ("page_size", json!(cfg.page_size)),
            ("events", json!(events.len())),
        ]),
    );

    let source = source_for(&cfg.data_url, cfg.http_timeout_secs)?;
    let mut dashboard = load_dashboard(source.as_ref(), &cfg).await;
    if let Dashboard::Ready(view) = &mut dashboard {
        for event in events {
            view.dispatch(event);
        }
    }

    print!("{}", render_dashboard(&dashboard, &cfg));
    Ok(())
}
