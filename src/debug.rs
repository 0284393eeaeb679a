//! Debug logging for gidtree.
//!
//! Every `log::info!()` / `log::debug!()` record from the workspace crates is
//! routed to `gidtree_debug.log` in the system temp directory, keeping
//! command output on stdout clean. When `RUST_LOG` is set the records are
//! mirrored to stderr as well.
//!
//! Level precedence: `--log-level` flag, then `RUST_LOG`, then the
//! `log_level` setting in `~/.gidtree/config.yaml`. At `off` no log file is
//! created.

use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;

const LOG_FILE_NAME: &str = "gidtree_debug.log";

struct DebugLogger {
    file: Option<File>,
    mirror_stderr: bool,
}

impl DebugLogger {
    fn open(level: LevelFilter, mirror_stderr: bool) -> Self {
        let path = log_path();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .ok();

        let mut logger = DebugLogger {
            file,
            mirror_stderr,
        };
        logger.write_raw(&format!(
            "\n{}\ngidtree {} started at {} (level={})\n{}\n",
            "=".repeat(80),
            crate::VERSION,
            timestamp(),
            level,
            "=".repeat(80)
        ));
        logger
    }

    fn write_raw(&mut self, msg: &str) {
        // Logging must never fail a command
        if let Some(ref mut file) = self.file {
            let _ = file.write_all(msg.as_bytes());
            let _ = file.flush();
        }
    }

    fn write_record(&mut self, line: &str) {
        self.write_raw(line);
        if self.mirror_stderr {
            let _ = std::io::stderr().write_all(line.as_bytes());
        }
    }
}

static LOGGER: OnceLock<Mutex<DebugLogger>> = OnceLock::new();

struct LogBridge;

static BRIDGE: LogBridge = LogBridge;

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Some(logger) = LOGGER.get() {
            let line = format_record(record.level(), record.target(), &record.args().to_string());
            logger.lock().write_record(&line);
        }
    }

    fn flush(&self) {
        if let Some(logger) = LOGGER.get()
            && let Some(ref mut file) = logger.lock().file
        {
            let _ = file.flush();
        }
    }
}

/// Location of the debug log file.
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join(LOG_FILE_NAME)
}

fn timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%d %H:%M:%S%.3f")
        .to_string()
}

fn format_record(level: log::Level, target: &str, message: &str) -> String {
    format!("[{}] [{:<5}] [{}] {}\n", timestamp(), level, target, message)
}

/// Interpret a `RUST_LOG` value.
///
/// Plain levels (`debug`) are used as-is. For directive lists such as
/// `gidtree=debug,gidtree_mapping=trace` the most verbose level wins.
/// Anything unrecognized means `info`.
pub fn parse_rust_log(value: &str) -> LevelFilter {
    let levels: Vec<LevelFilter> = value
        .split(',')
        .filter_map(|directive| {
            let level = directive.rsplit('=').next().unwrap_or(directive).trim();
            level.parse::<LevelFilter>().ok()
        })
        .collect();
    levels.into_iter().max().unwrap_or(LevelFilter::Info)
}

/// Pick the effective level: CLI flag, then `RUST_LOG`, then settings.
pub fn resolve_level(
    cli_level: Option<LevelFilter>,
    rust_log: Option<&str>,
    settings_level: LevelFilter,
) -> LevelFilter {
    if let Some(level) = cli_level {
        return level;
    }
    match rust_log {
        Some(value) if !value.trim().is_empty() => parse_rust_log(value),
        _ => settings_level,
    }
}

/// Install the `log` bridge. Safe to call more than once; only the first
/// call takes effect.
pub fn init_log_bridge(cli_level: Option<LevelFilter>, settings_level: LevelFilter) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let level = resolve_level(cli_level, rust_log.as_deref(), settings_level);
    if level == LevelFilter::Off {
        return;
    }

    let mirror_stderr = rust_log.is_some();
    LOGGER.get_or_init(|| Mutex::new(DebugLogger::open(level, mirror_stderr)));

    if log::set_logger(&BRIDGE).is_ok() {
        log::set_max_level(level);
    }
}
