//! Structured logging for snapshot loading and table rendering.
//!
//! Every record is one JSON line on stderr, so rendered tables on stdout
//! stay clean. When `LOG_DIR` is set, records are also appended to
//! `<LOG_DIR>/<run_id>/events.jsonl` (info and above) and `trace.jsonl`
//! (trace/debug).

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

// =============================================================================
// Log Levels
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl Level {
    pub fn from_env() -> Self {
        match std::env::var("LOG_LEVEL").as_deref() {
            Ok("trace") => Level::Trace,
            Ok("debug") => Level::Debug,
            Ok("info") => Level::Info,
            Ok("warn") => Level::Warn,
            Ok("error") => Level::Error,
            _ => Level::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

// =============================================================================
// Log Domains
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Data,      // Snapshot fetch and parse
    View,      // Filter/sort/page events
    Render,    // HTML/text output
    Aggregate, // Top-contracts export
    System,    // Startup, config
    Profile,   // Timing scopes
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Data => "data",
            Domain::View => "view",
            Domain::Render => "render",
            Domain::Aggregate => "aggregate",
            Domain::System => "system",
            Domain::Profile => "profile",
        }
    }

    pub fn is_enabled(&self) -> bool {
        // LOG_DOMAINS is a comma-separated list or "all"
        match std::env::var("LOG_DOMAINS").as_deref() {
            Ok("all") | Err(_) => true,
            Ok(domains) => domains.split(',').any(|d| d.trim() == self.as_str()),
        }
    }
}

// =============================================================================
// Run context
// =============================================================================

static LOG_SEQ: AtomicU64 = AtomicU64::new(0);
static RUN_CONTEXT: OnceLock<RunContext> = OnceLock::new();

fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst)
}

#[derive(Debug)]
struct RunFiles {
    events: Mutex<BufWriter<File>>,
    trace: Mutex<BufWriter<File>>,
}

#[derive(Debug)]
struct RunContext {
    run_id: String,
    files: Option<RunFiles>,
}

fn open_run_files(base: &str, run_id: &str) -> Option<RunFiles> {
    let mut run_dir = PathBuf::from(base);
    run_dir.push(run_id);
    if let Err(err) = create_dir_all(&run_dir) {
        eprintln!("[log] failed to create run dir: {}", err);
        return None;
    }
    let _ = std::fs::write(
        run_dir.join("manifest.json"),
        json!({
            "run_id": run_id,
            "ts": ts_now(),
            "pid": process::id(),
            "log_dir": run_dir.to_string_lossy(),
        })
        .to_string(),
    );
    let events = File::create(run_dir.join("events.jsonl"))
        .map_err(|err| eprintln!("[log] failed to create events log: {}", err))
        .ok()?;
    let trace = File::create(run_dir.join("trace.jsonl"))
        .map_err(|err| eprintln!("[log] failed to create trace log: {}", err))
        .ok()?;
    Some(RunFiles {
        events: Mutex::new(BufWriter::new(events)),
        trace: Mutex::new(BufWriter::new(trace)),
    })
}

fn ensure_run_context() -> &'static RunContext {
    RUN_CONTEXT.get_or_init(|| {
        let run_id = std::env::var("RUN_ID")
            .unwrap_or_else(|_| format!("r-{}-{}", ts_epoch_ms(), process::id()));
        let files = std::env::var("LOG_DIR")
            .ok()
            .and_then(|base| open_run_files(&base, &run_id));
        RunContext { run_id, files }
    })
}

fn split_fields(mut fields: Map<String, Value>) -> (Map<String, Value>, Map<String, Value>) {
    let mut top = Map::new();
    for key in ["source", "ticker", "msg"] {
        if let Some(value) = fields.remove(key) {
            top.insert(key.to_string(), value);
        }
    }
    (top, fields)
}

fn write_line(writer: &Mutex<BufWriter<File>>, line: &str) {
    if let Ok(mut w) = writer.lock() {
        let _ = writeln!(w, "{}", line);
        let _ = w.flush();
    }
}

// =============================================================================
// Core logging functions
// =============================================================================

/// RFC3339 timestamp with milliseconds
pub fn ts_now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

pub fn ts_epoch_ms() -> u64 {
    Utc::now().timestamp_millis() as u64
}

pub fn log(level: Level, domain: Domain, event: &str, fields: Map<String, Value>) {
    if level < Level::from_env() || !domain.is_enabled() {
        return;
    }
    emit_record(level, domain.as_str(), event, fields);
}

/// Info-level record keyed by module name.
pub fn json_log(module: &str, fields: Map<String, Value>) {
    log(Level::Info, Domain::System, module, fields);
}

fn build_record(run_id: &str, level: Level, component: &str, event: &str, fields: Map<String, Value>) -> Value {
    let (mut top, data) = split_fields(fields);
    let msg = top.remove("msg").unwrap_or(Value::String(String::new()));
    let mut entry = Map::new();
    entry.insert("ts".to_string(), json!(ts_now()));
    entry.insert("run_id".to_string(), json!(run_id));
    entry.insert("seq".to_string(), json!(next_seq()));
    entry.insert("lvl".to_string(), json!(level.as_str().to_uppercase()));
    entry.insert("component".to_string(), json!(component));
    entry.insert("event".to_string(), json!(event));
    entry.insert("msg".to_string(), msg);
    for (k, v) in top {
        entry.insert(k, v);
    }
    entry.insert("data".to_string(), Value::Object(data));
    Value::Object(entry)
}

fn emit_record(level: Level, component: &str, event: &str, fields: Map<String, Value>) {
    let ctx = ensure_run_context();
    let line = build_record(&ctx.run_id, level, component, event, fields).to_string();
    if let Some(files) = &ctx.files {
        match level {
            Level::Trace | Level::Debug => write_line(&files.trace, &line),
            _ => write_line(&files.events, &line),
        }
    }
    eprintln!("{}", line);
}

// =============================================================================
// Domain-specific helpers
// =============================================================================

pub fn log_fetch_start(source: &str) {
    log(Level::Info, Domain::Data, "fetch_start", obj(&[("source", v_str(source))]));
}

pub fn log_snapshot_loaded(source: &str, records: usize, bad_rows: u64) {
    log(
        Level::Info,
        Domain::Data,
        "snapshot_loaded",
        obj(&[
            ("source", v_str(source)),
            ("records", json!(records)),
            ("bad_rows", json!(bad_rows)),
        ]),
    );
}

pub fn log_snapshot_empty(source: &str) {
    log(
        Level::Warn,
        Domain::Data,
        "snapshot_empty",
        obj(&[("source", v_str(source)), ("msg", v_str("snapshot contains no records"))]),
    );
}

pub fn log_fetch_failed(source: &str, err: &str) {
    log(
        Level::Error,
        Domain::Data,
        "fetch_failed",
        obj(&[("source", v_str(source)), ("msg", v_str(err))]),
    );
}

pub fn log_view_event(event: &str, ticker: &str, sort_key: &str, sort_dir: &str, page: usize, changed: bool) {
    log(
        Level::Debug,
        Domain::View,
        event,
        obj(&[
            ("ticker", v_str(ticker)),
            ("sort_key", v_str(sort_key)),
            ("sort_dir", v_str(sort_dir)),
            ("page", json!(page)),
            ("changed", json!(changed)),
        ]),
    );
}

pub fn log_render(format: &str, ticker: &str, rows: usize, bytes: usize) {
    log(
        Level::Info,
        Domain::Render,
        "render",
        obj(&[
            ("format", v_str(format)),
            ("ticker", v_str(ticker)),
            ("rows", json!(rows)),
            ("bytes", json!(bytes)),
        ]),
    );
}

pub fn log_export(tickers: usize, input_rows: usize, output_rows: usize) {
    log(
        Level::Info,
        Domain::Aggregate,
        "top_contracts",
        obj(&[
            ("tickers", json!(tickers)),
            ("input_rows", json!(input_rows)),
            ("output_rows", json!(output_rows)),
        ]),
    );
}

// =============================================================================
// Utility Functions
// =============================================================================

pub fn obj(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (k, v) in pairs {
        map.insert((*k).to_string(), v.clone());
    }
    map
}

pub fn v_str(s: &str) -> Value {
    Value::String(s.to_string())
}

pub fn v_num(n: f64) -> Value {
    json!(n)
}

// =============================================================================
// Profiling Scope
// =============================================================================

/// Emits a trace-level timing record when dropped.
pub struct ProfileScope {
    module: &'static str,
    label: &'static str,
    started: Instant,
}

impl ProfileScope {
    pub fn new(module: &'static str, label: &'static str) -> Self {
        Self {
            module,
            label,
            started: Instant::now(),
        }
    }
}

impl Drop for ProfileScope {
    fn drop(&mut self) {
        let elapsed_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        log(
            Level::Trace,
            Domain::Profile,
            "profile",
            obj(&[
                ("module", v_str(self.module)),
                ("label", v_str(self.label)),
                ("elapsed_ms", v_num(elapsed_ms)),
            ]),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
    }

    #[test]
    fn test_obj_helper() {
        let m = obj(&[("key", v_str("value")), ("num", v_num(42.0))]);
        assert_eq!(m.get("key").unwrap(), "value");
        assert_eq!(m.get("num").unwrap(), 42.0);
    }

    #[test]
    fn test_seq_increments() {
        let s1 = next_seq();
        let s2 = next_seq();
        assert!(s2 > s1);
    }

    #[test]
    fn test_record_lifts_top_level_fields() {
        let rec = build_record(
            "r-test",
            Level::Warn,
            "data",
            "snapshot_empty",
            obj(&[("source", v_str("a.json")), ("msg", v_str("empty")), ("rows", json!(0))]),
        );
        assert_eq!(rec["lvl"], "WARN");
        assert_eq!(rec["source"], "a.json");
        assert_eq!(rec["msg"], "empty");
        assert_eq!(rec["data"]["rows"], 0);
        assert!(rec["data"].get("source").is_none());
    }
}
