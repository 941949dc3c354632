//! Pipeline diagnostics.
//!
//! Steps never write to the diagnostic stream themselves. They stamp a
//! [`LogMessage`] and push it onto a [`LogQueue`]; a single [`LogSink`]
//! worker owns the stream and is its only writer, so lines from concurrent
//! branches never interleave.

pub mod format;
pub mod sink;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::blob::Blob;

pub use format::format_line;
pub use sink::{DiagnosticStream, LogQueue, LogSink};

/// Severity, ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    Warning,
    Info,
    Debug,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warning => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warning" | "warn" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// Parse a verbosity threshold where `none`/`off` disables logging.
pub fn parse_verbosity(s: &str) -> Result<Option<Level>, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "none" | "off" => Ok(None),
        other => other.parse().map(Some),
    }
}

/// Key/value pairs appended to a log line.
pub type Tags = Vec<(String, String)>;

pub fn tag(key: impl Into<String>, value: impl fmt::Display) -> (String, String) {
    (key.into(), value.to_string())
}

/// `time=<milliseconds>ms`, three decimals.
pub fn elapsed_tag(elapsed: Duration) -> (String, String) {
    tag("time", format!("{:.3}ms", elapsed.as_secs_f64() * 1000.0))
}

/// `path` and `language` of an input, optionally prefixed (`before_path`, ...).
pub fn blob_tags(prefix: Option<&str>, blob: &Blob) -> Tags {
    let key = |name: &str| match prefix {
        Some(prefix) => format!("{prefix}_{name}"),
        None => name.to_string(),
    };
    vec![
        tag(key("path"), blob.path_display()),
        tag(key("language"), blob.language_name()),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogMessage {
    pub level: Level,
    pub message: String,
    pub time: DateTime<Local>,
    pub tags: Tags,
}

impl LogMessage {
    /// Build a message stamped with the current local time.
    pub fn now(level: Level, message: impl Into<String>, tags: Tags) -> Self {
        Self {
            level,
            message: message.into(),
            time: Local::now(),
            tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_order_by_severity() {
        assert!(Level::Error < Level::Warning);
        assert!(Level::Warning < Level::Info);
        assert!(Level::Info < Level::Debug);
    }

    #[test]
    fn verbosity_parsing() {
        assert_eq!(parse_verbosity("none"), Ok(None));
        assert_eq!(parse_verbosity("WARN"), Ok(Some(Level::Warning)));
        assert_eq!(parse_verbosity("debug"), Ok(Some(Level::Debug)));
        assert!(parse_verbosity("loud").is_err());
    }

    #[test]
    fn tag_helpers() {
        let blob = Blob::new("foo.py", Some(crate::blob::Language::Python), "");
        assert_eq!(
            blob_tags(Some("before"), &blob),
            vec![tag("before_path", "foo.py"), tag("before_language", "Python")]
        );
        assert_eq!(
            elapsed_tag(Duration::from_micros(1500)),
            tag("time", "1.500ms")
        );
    }
}
