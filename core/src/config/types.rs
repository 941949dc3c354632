use serde::{Deserialize, Serialize};

use crate::log::{DiagnosticStream, Level};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SemflowConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub options: Options,
}

/// Internal tracing of the tool itself, separate from pipeline diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default)]
    pub file: bool,

    /// EnvFilter string, e.g. "warn" or "semflow_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: false,
            level: default_logging_level(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    Always,
    Never,
    #[default]
    Auto,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" | "on" | "true" => Ok(Self::Always),
            "never" | "off" | "false" => Ok(Self::Never),
            "auto" => Ok(Self::Auto),
            other => Err(format!("unknown color choice: {other}")),
        }
    }
}

/// Run-scoped options, resolved once before a run starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    #[serde(default)]
    pub color: ColorChoice,

    /// Most verbose level that still reaches the diagnostic stream.
    /// `None` disables pipeline logging entirely.
    #[serde(default = "default_verbosity", with = "verbosity_serde")]
    pub verbosity: Option<Level>,

    /// Echo the offending source slice in assignment diagnostics.
    #[serde(default)]
    pub echo_source_on_error: bool,

    #[serde(default = "default_log_channel_capacity")]
    pub log_channel_capacity: usize,
}

fn default_verbosity() -> Option<Level> {
    Some(Level::Warning)
}

fn default_log_channel_capacity() -> usize {
    1024
}

impl Default for Options {
    fn default() -> Self {
        Self {
            color: ColorChoice::default(),
            verbosity: default_verbosity(),
            echo_source_on_error: false,
            log_channel_capacity: default_log_channel_capacity(),
        }
    }
}

impl Options {
    /// Fix every undecided choice against the stream the run will log to.
    pub fn resolve(&self, stream: &DiagnosticStream) -> ResolvedOptions {
        let color = match self.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => stream.is_terminal(),
        };
        ResolvedOptions {
            color,
            verbosity: self.verbosity,
            echo_source_on_error: self.echo_source_on_error,
            log_channel_capacity: self.log_channel_capacity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub color: bool,
    pub verbosity: Option<Level>,
    pub echo_source_on_error: bool,
    pub log_channel_capacity: usize,
}

mod verbosity_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::log::{parse_verbosity, Level};

    pub fn serialize<S: Serializer>(value: &Option<Level>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(level) => s.serialize_str(&format!("{level:?}").to_ascii_lowercase()),
            None => s.serialize_str("none"),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Level>, D::Error> {
        let raw = String::deserialize(d)?;
        parse_verbosity(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let opts = Options::default();
        assert_eq!(opts.color, ColorChoice::Auto);
        assert_eq!(opts.verbosity, Some(Level::Warning));
        assert!(!opts.echo_source_on_error);
    }

    #[test]
    fn toml_round_trip_with_disabled_verbosity() {
        let cfg: SemflowConfig = toml::from_str(
            r#"
            [options]
            color = "never"
            verbosity = "none"
            echo_source_on_error = true
            "#,
        )
        .unwrap();
        assert_eq!(cfg.options.color, ColorChoice::Never);
        assert_eq!(cfg.options.verbosity, None);
        assert!(cfg.options.echo_source_on_error);
        assert_eq!(cfg.options.log_channel_capacity, 1024);

        let text = toml::to_string(&cfg).unwrap();
        assert!(text.contains("verbosity = \"none\""));
    }

    #[test]
    fn resolve_fixes_color_against_stream() {
        let stream = DiagnosticStream::writer(tokio::io::sink());
        let auto = Options::default().resolve(&stream);
        assert!(!auto.color);
        let always = Options {
            color: ColorChoice::Always,
            ..Options::default()
        }
        .resolve(&stream);
        assert!(always.color);
    }
}
