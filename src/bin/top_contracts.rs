use chainview::aggregate::{load_daily_rows, top_contracts, write_snapshot, ExportOptions};
use chainview::state::Config;
use std::env;
use std::path::PathBuf;

/// top_contracts DAILY.json [OUT.json]
fn main() {
    let mut args = env::args().skip(1);
    let input = match args.next() {
        Some(p) => PathBuf::from(p),
        None => {
            eprintln!("usage: top_contracts DAILY.json [OUT.json]");
            std::process::exit(1);
        }
    };
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("public/assets/data/options_top_contracts_8tickers.json"));

    let cfg = Config::from_env();
    let opts = ExportOptions::from_config(&cfg);

    let rows = match load_daily_rows(&input) {
        Ok(r) => r,
        Err(err) => {
            eprintln!("load failed: {:#}", err);
            std::process::exit(2);
        }
    };

    let summary = top_contracts(&rows, &opts);
    if summary.skipped > 0 {
        eprintln!("skipped {} rows with unparsable trade_date", summary.skipped);
    }

    if let Err(err) = write_snapshot(&output, &summary.rows) {
        eprintln!("{:#}", err);
        std::process::exit(4);
    }
    println!(
        "wrote {} contracts for {} tickers ({} input rows, window {}d, top {}) to {}",
        summary.rows.len(),
        summary.tickers.len(),
        summary.input_rows,
        opts.window_days,
        opts.top_n,
        output.display()
    );
}
