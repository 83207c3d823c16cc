//! Browser console capture and filtering.
//!
//! Entries use the WebDriver log levels. Only `SEVERE` entries are candidate
//! failures, and the benign "resource 404" network noise is dropped.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Message Chrome emits for any missing asset
pub const BENIGN_404_MESSAGE: &str =
    "Failed to load resource: the server responded with a status of 404";

/// Severity of a console entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// Verbose / debug output
    Debug,
    /// `console.log` / `console.info`
    Info,
    /// `console.warn`
    Warning,
    /// `console.error`, uncaught exceptions, failed network loads
    Severe,
}

impl LogLevel {
    /// WebDriver level name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Severe => "SEVERE",
        }
    }

    /// Map a console API / CDP level name
    #[must_use]
    pub fn from_console_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "error" | "severe" | "assert" => Self::Severe,
            "warn" | "warning" => Self::Warning,
            "debug" | "verbose" | "trace" => Self::Debug,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One captured console line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleEntry {
    /// Severity
    pub level: LogLevel,
    /// Message text
    pub message: String,
    /// Origin (`console-api`, `network`, `javascript`, ...)
    pub source: Option<String>,
}

impl ConsoleEntry {
    /// Create an entry
    #[must_use]
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a severe entry
    #[must_use]
    pub fn severe(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Severe, message)
    }

    /// Set the source
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl fmt::Display for ConsoleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// A message the filter drops
#[derive(Debug, Clone)]
enum IgnoreRule {
    Contains(String),
    Pattern(Regex),
}

impl IgnoreRule {
    fn matches(&self, message: &str) -> bool {
        match self {
            Self::Contains(needle) => message.contains(needle.as_str()),
            Self::Pattern(re) => re.is_match(message),
        }
    }
}

/// Selects the console entries that should fail a test
#[derive(Debug, Clone)]
pub struct ConsoleFilter {
    min_level: LogLevel,
    ignore: Vec<IgnoreRule>,
}

impl Default for ConsoleFilter {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Severe,
            ignore: vec![IgnoreRule::Contains(BENIGN_404_MESSAGE.to_string())],
        }
    }
}

impl ConsoleFilter {
    /// Default filter: severe entries, benign 404s ignored
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter with no ignore patterns
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            min_level: LogLevel::Severe,
            ignore: Vec::new(),
        }
    }

    /// Also ignore messages matching `pattern`
    pub fn ignoring(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.ignore.push(IgnoreRule::Pattern(Regex::new(pattern)?));
        Ok(self)
    }

    /// Lowest level that counts
    #[must_use]
    pub const fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// True when the entry should be reported
    #[must_use]
    pub fn is_reportable(&self, entry: &ConsoleEntry) -> bool {
        entry.level >= self.min_level
            && !self
                .ignore
                .iter()
                .any(|rule| rule.matches(&entry.message))
    }

    /// Reportable entries, in capture order
    #[must_use]
    pub fn apply<'a>(&self, entries: &'a [ConsoleEntry]) -> Vec<&'a ConsoleEntry> {
        entries.iter().filter(|e| self.is_reportable(e)).collect()
    }
}
