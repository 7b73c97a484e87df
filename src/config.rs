//! Optional TOML configuration.
//!
//! Looked up at `--config <FILE>` or else `~/.taskpad/config.toml`. A missing
//! default file is fine; a missing explicit file is an error. Command-line
//! flags win over file values.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context};
use serde::Deserialize;
/// Directory under `$HOME` used when nothing else is configured.
const APP_DIR: &str = ".taskpad";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where `tasks.json` and the log file live. `~/` is expanded.
    pub data_dir: Option<PathBuf>,
    /// How long the "task added" notice stays up.
    pub notice_secs: u64,
    /// Default tracing filter when neither RUST_LOG nor -v/-q is given.
    pub log_level: String,
    /// File the values came from; None when the defaults were used.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: None,
            notice_secs: 3,
            log_level: "warn".to_string(),
            source: None,
        }
    }
}

impl Config {
    /// Load configuration from `override_path`, or the default location.
    pub fn load(override_path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match override_path {
            Some(path) => expand_tilde(path),
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Config::default()),
            },
        };
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config {}", path.display()))?;
        let mut cfg = Config::from_toml_str(&text)
            .with_context(|| format!("invalid config {}", path.display()))?;
        cfg.source = Some(path);
        Ok(cfg)
    }

    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Resolve the data directory: flag, then config, then `~/.taskpad`.
    pub fn resolve_data_dir(&self, override_dir: Option<&Path>) -> anyhow::Result<PathBuf> {
        if let Some(dir) = override_dir {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = &self.data_dir {
            return Ok(expand_tilde(dir));
        }
        let home = dirs::home_dir().ok_or_else(|| anyhow!("cannot determine home directory"))?;
        Ok(home.join(APP_DIR))
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_secs(self.notice_secs)
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(APP_DIR).join(CONFIG_FILE))
}

fn expand_tilde(path: &Path) -> PathBuf {
    let text = path.to_string_lossy();
    if let Some(rest) = text.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let cfg = Config::from_toml_str("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.notice_ttl(), Duration::from_secs(3));
    }

    #[test]
    fn test_values_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "data_dir = \"/tmp/tp-data\"\nnotice_secs = 5\nlog_level = \"debug\"\n").unwrap();
        let cfg = Config::load(Some(&path)).unwrap();
        assert_eq!(cfg.data_dir, Some(PathBuf::from("/tmp/tp-data")));
        assert_eq!(cfg.notice_ttl(), Duration::from_secs(5));
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.source, Some(path));
    }

    #[test]
    fn test_source_is_skipped_when_parsing() {
        assert!(Config::from_toml_str("source = \"/etc/x.toml\"").is_err());
        assert_eq!(Config::from_toml_str("notice_secs = 1").unwrap().source, None);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(Config::from_toml_str("colour = true").is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_data_dir_precedence() {
        let cfg = Config {
            data_dir: Some(PathBuf::from("/from/config")),
            ..Config::default()
        };
        assert_eq!(
            cfg.resolve_data_dir(Some(Path::new("/from/flag"))).unwrap(),
            PathBuf::from("/from/flag")
        );
        assert_eq!(cfg.resolve_data_dir(None).unwrap(), PathBuf::from("/from/config"));
    }

    #[test]
    fn test_tilde_expansion() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde(Path::new("~/tasks")), home.join("tasks"));
        }
        assert_eq!(expand_tilde(Path::new("/abs")), PathBuf::from("/abs"));
    }
}
