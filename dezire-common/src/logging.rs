//! Logging infrastructure for the Dezire wallet libraries
//!
//! Structured logging on top of the `log` facade with an `env_logger` backend:
//! - Categorizes log events by context (selection, ledger ingestion, configuration)
//! - Truncates identifiers such as transaction ids before they reach the log
//! - Provides both human-readable and JSON line output
//!
//! # Usage
//!
//! ```
//! use dezire_common::logging::{self, LogConfig, LogLevel};
//! use serde_json::json;
//!
//! logging::init(&LogConfig::default()).expect("Failed to initialize logging");
//!
//! logging::log_selection(
//!     LogLevel::Debug,
//!     "selection requested",
//!     Some(json!({ "candidates": 3 })),
//! );
//! ```

use bitcoin::OutPoint;
use chrono::Local;
use log::{debug, LevelFilter};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs::OpenOptions;
use std::io::Write as IoWrite;
use std::sync::OnceLock;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    /// Error conditions
    Error,
    /// Warning conditions
    Warn,
    /// Informational messages
    Info,
    /// Debug-level messages
    Debug,
    /// Trace level (very verbose)
    Trace,
}

/// Log context categories for structured logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogContext {
    /// Coin selection requests and outcomes
    Selection,
    /// Ingestion of ledger snapshots into candidate sets
    Ledger,
    /// Configuration loading and validation
    Config,
}

/// Configuration for the logging system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default log level
    #[serde(default = "default_level")]
    pub level: LogLevel,
    /// Path to log file (None for console-only)
    #[serde(default)]
    pub log_file: Option<String>,
    /// Whether to include timestamps in log messages
    #[serde(default = "default_true")]
    pub include_timestamps: bool,
    /// Whether to include source location in log messages
    #[serde(default)]
    pub include_source_location: bool,
    /// Whether to log to console when no file is configured
    #[serde(default = "default_true")]
    pub console_logging: bool,
    /// Whether to use JSON format for logs (machine-readable)
    #[serde(default)]
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            log_file: None,
            include_timestamps: true,
            include_source_location: false,
            console_logging: true,
            json_format: false,
        }
    }
}

fn default_level() -> LogLevel {
    LogLevel::Info
}

fn default_true() -> bool {
    true
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

// Outcome of the one and only logger installation
static LOGGING_INIT: OnceLock<Result<(), String>> = OnceLock::new();

/// Initialize the logging system with the given configuration
///
/// Only the first call installs a logger; its outcome is kept, so a log file that could
/// not be opened keeps failing later calls instead of silently logging nowhere. Every
/// successful call applies `config.level`. A logger installed by someone else (e.g. a
/// test harness) is left in place.
///
/// # Returns
/// * Result with () on success, error string if the log file cannot be opened
pub fn init(config: &LogConfig) -> Result<(), String> {
    let outcome = LOGGING_INIT.get_or_init(|| install(config)).clone();
    if outcome.is_ok() {
        set_log_level(config.level);
    }
    outcome
}

fn install(config: &LogConfig) -> Result<(), String> {
    let include_timestamps = config.include_timestamps;
    let include_source_location = config.include_source_location;
    let json_format = config.json_format;

    let mut builder = env_logger::Builder::new();
    // Verbosity is governed by the global max level, see `set_log_level`
    builder.filter_level(LevelFilter::Trace);

    builder.format(move |buf, record| {
        let timestamp = if include_timestamps {
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
        } else {
            String::new()
        };

        let source_location = if include_source_location {
            format!(
                " [{}:{}]",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0)
            )
        } else {
            String::new()
        };

        if json_format {
            writeln!(buf, "{}", json_line(record, &timestamp, &source_location))
        } else {
            let mut style = buf.style();
            style.set_bold(true);

            if include_timestamps {
                write!(buf, "{} ", timestamp)?;
            }
            writeln!(
                buf,
                "[{}{}] {}",
                style.value(record.level()),
                source_location,
                record.args()
            )
        }
    });

    if let Some(file_path) = &config.log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)
            .map_err(|e| format!("Failed to open log file {}: {}", file_path, e))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    } else if !config.console_logging {
        builder.target(env_logger::Target::Pipe(Box::new(std::io::sink())));
    }

    if let Err(e) = builder.try_init() {
        // Another logger is already installed; keep using it
        debug!("Logger already initialized: {}", e);
    }
    Ok(())
}

/// One machine-readable log line
fn json_line(record: &log::Record, timestamp: &str, source_location: &str) -> serde_json::Value {
    json!({
        "timestamp": timestamp,
        "level": record.level().to_string(),
        "target": record.target(),
        "location": source_location.trim(),
        "message": record.args().to_string(),
    })
}

/// Update the log level dynamically
pub fn set_log_level(level: LogLevel) {
    log::set_max_level(level.into());
}

/// Truncate a potentially identifying string for logging
///
/// Keeps the first and last four characters of longer values.
pub fn sanitize_for_logging(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let chars: Vec<char> = input.chars().collect();
    if chars.len() <= 8 {
        return "*****".to_string();
    }

    let first: String = chars[..4].iter().collect();
    let last: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", first, last)
}

/// Sanitized form of an outpoint, `abcd...wxyz:vout`
pub fn sanitize_outpoint(outpoint: &OutPoint) -> String {
    format!(
        "{}:{}",
        sanitize_for_logging(&outpoint.txid.to_string()),
        outpoint.vout
    )
}

fn log_with_context(
    level: LogLevel,
    context: LogContext,
    message: &str,
    params: Option<serde_json::Value>,
) {
    let level: log::Level = level.into();
    match params {
        Some(params) => log::log!(level, "[{:?}] {} - {}", context, message, params),
        None => log::log!(level, "[{:?}] {}", context, message),
    }
}

/// Log a coin selection event
pub fn log_selection(level: LogLevel, message: &str, params: Option<serde_json::Value>) {
    log_with_context(level, LogContext::Selection, message, params);
}

/// Log a ledger ingestion event
pub fn log_ledger(level: LogLevel, message: &str, params: Option<serde_json::Value>) {
    log_with_context(level, LogContext::Ledger, message, params);
}

/// Log a configuration event
pub fn log_config(level: LogLevel, message: &str, params: Option<serde_json::Value>) {
    log_with_context(level, LogContext::Config, message, params);
}

/// Build a JSON object from (name, value) pairs
pub fn log_params(params: Vec<(&str, String)>) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for (name, value) in params {
        map.insert(name.to_string(), serde_json::Value::String(value));
    }
    serde_json::Value::Object(map)
}
