//! Terminal output for the CLI commands.
//!
//! Every helper either prints a styled line or, with `--json`, one JSON
//! record per line of the form `{"type": ..., "payload": ...}`. `--quiet`
//! hides everything except warnings and errors.

use std::fmt::Display;

use owo_colors::OwoColorize;
use parking_lot::RwLock;
use serde_json::{json, Value};

/// Global flags that shape output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputConfig {
    pub json: bool,
    pub quiet: bool,
    /// Number of `-v` flags.
    pub verbose: u8,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            json,
            quiet,
            verbose,
        }
    }
}

static CONFIG: RwLock<OutputConfig> = parking_lot::const_rwlock(OutputConfig::new(false, false, 0));

/// Whether a human-readable line survives `--quiet`.
#[derive(Clone, Copy)]
enum Level {
    Info,
    Alert,
}

fn current() -> OutputConfig {
    *CONFIG.read()
}

fn record(kind: &str, payload: Value) -> Value {
    json!({ "type": kind, "payload": payload })
}

fn emit(kind: &str, payload: Value, level: Level, human: impl FnOnce()) {
    let config = current();
    if config.json {
        println!("{}", record(kind, payload));
    } else if !config.quiet || matches!(level, Level::Alert) {
        human();
    }
}

/// Install the flags parsed from the command line.
pub fn configure(config: OutputConfig) {
    *CONFIG.write() = config;
}

#[must_use]
pub fn is_json() -> bool {
    current().json
}

#[must_use]
pub fn is_quiet() -> bool {
    current().quiet
}

#[must_use]
pub fn verbosity() -> u8 {
    current().verbose
}

/// `referee <version>` banner.
pub fn header(version: &str) {
    emit(
        "header",
        json!({ "app": "referee", "version": version }),
        Level::Info,
        || println!("{} {}\n", "referee".bold(), version.dimmed()),
    );
}

pub fn section(title: &str) {
    emit("section", json!({ "title": title }), Level::Info, || {
        println!("\n{}", title.bold());
    });
}

/// Labeled value, label left-aligned.
pub fn field(label: &str, value: impl Display) {
    let value = value.to_string();
    emit(
        "field",
        json!({ "label": label, "value": value }),
        Level::Info,
        || println!("  {:<12} {}", label.dimmed(), value),
    );
}

pub fn success(message: &str) {
    emit("success", json!({ "message": message }), Level::Info, || {
        println!("  {} {}", "✓".green(), message);
    });
}

pub fn warning(message: &str) {
    emit("warning", json!({ "message": message }), Level::Alert, || {
        println!("  {} {}", "⚠".yellow(), message);
    });
}

pub fn hint(message: &str) {
    emit("hint", json!({ "message": message }), Level::Info, || {
        println!("  {}: {}", "hint".cyan(), message.dimmed());
    });
}

/// Pre-rendered block such as a table, indented line by line.
pub fn lines(content: &str) {
    emit("lines", json!({ "content": content }), Level::Info, || {
        for line in content.lines() {
            println!("  {line}");
        }
    });
}

/// Errors always go to stderr.
pub fn error(message: &str) {
    if current().json {
        eprintln!("{}", record("error", json!({ "message": message })));
    } else {
        eprintln!("  {} {}", "×".red(), message);
    }
}

/// Print a command's complete JSON result as-is.
pub fn json_output(value: Value) {
    println!("{value}");
}
