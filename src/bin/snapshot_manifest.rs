use chainview::data::{analyze_snapshot, default_manifest_path};
use chainview::state::now_ts;
use serde_json::json;
use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    let path = PathBuf::from(
        env::args()
            .nth(1)
            .unwrap_or_else(|| "public/assets/data/options_top_contracts_8tickers.json".to_string()),
    );
    let strict = env::var("MANIFEST_STRICT").map(|v| v == "1").unwrap_or(false);

    let (manifest, report) = match analyze_snapshot(&path, now_ts()) {
        Ok(m) => m,
        Err(err) => {
            eprintln!("analysis failed: {:#}", err);
            std::process::exit(1);
        }
    };

    for w in &report.warnings {
        eprintln!("warning: {}", w);
    }

    let out_path = default_manifest_path(&path);
    let payload = json!({
        "manifest": manifest,
        "report": report
    });
    let body = match serde_json::to_string_pretty(&payload) {
        Ok(b) => b,
        Err(err) => {
            eprintln!("failed to encode manifest: {}", err);
            std::process::exit(3);
        }
    };
    if let Err(err) = fs::write(&out_path, body) {
        eprintln!("failed to write {}: {}", out_path.display(), err);
        std::process::exit(4);
    }
    println!("wrote manifest {}", out_path.display());

    if strict && report.empty {
        std::process::exit(2);
    }
}
