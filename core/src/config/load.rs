use std::path::{Path, PathBuf};

use super::types::SemflowConfig;
use crate::log::parse_verbosity;

/// Get the default semflow data directory: ~/.semflow
pub fn get_semflow_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".semflow"))
}

pub fn load_default() -> anyhow::Result<SemflowConfig> {
    // Priority 1: ~/.semflow/config.toml
    let user_config = get_semflow_data_dir()?.join("config.toml");

    // Priority 2: ./semflow.toml (current directory)
    let local_config = Path::new("semflow.toml");

    let mut cfg = if user_config.exists() {
        load_file(&user_config)?
    } else if local_config.exists() {
        load_file(local_config)?
    } else {
        SemflowConfig::default()
    };

    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok())?;
    Ok(cfg)
}

pub fn load_file(path: &Path) -> anyhow::Result<SemflowConfig> {
    let s = std::fs::read_to_string(path)?;
    toml::from_str::<SemflowConfig>(&s)
        .map_err(|e| anyhow::anyhow!("invalid config {}: {e}", path.display()))
}

/// Environment variable overrides (highest priority below CLI flags).
pub fn apply_env_overrides(
    cfg: &mut SemflowConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = non_empty("SEMFLOW_LOG_LEVEL") {
        cfg.options.verbosity = parse_verbosity(&v).map_err(anyhow::Error::msg)?;
    }
    if let Some(v) = non_empty("SEMFLOW_COLOR") {
        cfg.options.color = v.parse().map_err(anyhow::Error::msg)?;
    }
    if let Some(v) = non_empty("SEMFLOW_PRINT_SOURCE") {
        cfg.options.echo_source_on_error = matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColorChoice;
    use crate::log::Level;
    use std::collections::HashMap;

    #[test]
    fn env_overrides_apply_and_validate() {
        let env: HashMap<&str, &str> = [
            ("SEMFLOW_LOG_LEVEL", "debug"),
            ("SEMFLOW_COLOR", "always"),
            ("SEMFLOW_PRINT_SOURCE", "1"),
        ]
        .into_iter()
        .collect();
        let mut cfg = SemflowConfig::default();
        apply_env_overrides(&mut cfg, |k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(cfg.options.verbosity, Some(Level::Debug));
        assert_eq!(cfg.options.color, ColorChoice::Always);
        assert!(cfg.options.echo_source_on_error);

        let mut cfg = SemflowConfig::default();
        let err = apply_env_overrides(&mut cfg, |k| {
            (k == "SEMFLOW_LOG_LEVEL").then(|| "chatty".to_string())
        });
        assert!(err.is_err());
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut cfg = SemflowConfig::default();
        apply_env_overrides(&mut cfg, |_| Some("  ".to_string())).unwrap();
        assert_eq!(cfg.options.verbosity, Some(Level::Warning));
    }

    #[test]
    fn loads_a_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("semflow.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\n[options]\nverbosity = \"info\"\n")
            .unwrap();
        let cfg = load_file(&path).unwrap();
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.options.verbosity, Some(Level::Info));
    }
}
