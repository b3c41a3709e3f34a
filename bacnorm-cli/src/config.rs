use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::default_config_path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputSection,
    pub log: LogSection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub format: OutputFormat,
    /// Pretty-print JSON output.
    pub pretty: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// `tracing_subscriber::EnvFilter` directive, used when RUST_LOG is unset.
    pub filter: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: OutputFormat::Csv,
            pretty: true,
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

/// `--config` if given, otherwise ~/.bacnorm/config.toml. `None` when there
/// is no `--config` and no home directory.
pub fn resolve_config_path(explicit: Option<&Path>, home: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| home.map(default_config_path))
}

/// Defaults when there is no config path at all.
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load_config(path),
        None => Ok(Config::default()),
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    Ok(toml::from_str(s)?)
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    save_config(path, &Config::default())?;
    println!("Wrote {}", path.display());
    Ok(())
}

pub fn render_config(cfg: &Config) -> Result<String> {
    toml::to_string_pretty(cfg).context("serialize config")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.output.format, OutputFormat::Csv);
        assert!(cfg.output.pretty);
        assert_eq!(cfg.log.filter, "warn");
    }

    #[test]
    fn test_partial_config() {
        let cfg = parse_config(
            r#"
[output]
format = "json"
"#,
        )
        .unwrap();
        assert_eq!(cfg.output.format, OutputFormat::Json);
        assert!(cfg.output.pretty);
        assert_eq!(cfg.log.filter, "warn");
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(parse_config("[output]\nformat = \"xlsx\"\n").is_err());
    }

    #[test]
    fn test_render_round_trips() {
        let mut cfg = Config::default();
        cfg.log.filter = "bacnorm_ingest=debug".to_string();
        let s = render_config(&cfg).unwrap();
        assert_eq!(parse_config(&s).unwrap(), cfg);
    }

    #[test]
    fn test_missing_file_is_default() {
        let cfg = load_config(Path::new("/nonexistent/bacnorm/config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_explicit_config_path_wins() {
        let path = resolve_config_path(Some(Path::new("/tmp/b.toml")), Some(Path::new("/home/ana")));
        assert_eq!(path, Some(PathBuf::from("/tmp/b.toml")));

        let path = resolve_config_path(Some(Path::new("/tmp/b.toml")), None);
        assert_eq!(path, Some(PathBuf::from("/tmp/b.toml")));
    }

    #[test]
    fn test_default_config_path_under_home() {
        let path = resolve_config_path(None, Some(Path::new("/home/ana")));
        assert_eq!(path, Some(PathBuf::from("/home/ana/.bacnorm/config.toml")));
    }

    #[test]
    fn test_no_home_falls_back_to_defaults() {
        let path = resolve_config_path(None, None);
        assert_eq!(path, None);
        assert_eq!(load_config_or_default(path.as_deref()).unwrap(), Config::default());
    }
}
