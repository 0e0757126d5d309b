//! Configuration management for LoopChamber CLI
//!
//! Stores the memory document location and input defaults in
//! ~/.config/loopchamber/config.toml

use anyhow::{Context, Result};
use loopchamber::FragmentKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "loopchamber";
const CONFIG_FILE: &str = "config.toml";
const STORE_FILE: &str = "memories.json";

/// CLI Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Memory document location (defaults to the platform data dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
    /// Kind used when `add` is not given `--kind`
    #[serde(default)]
    pub default_kind: FragmentKind,
    /// Characters of text shown per memory in listings
    #[serde(default = "default_preview_width")]
    pub preview_width: usize,
}

fn default_preview_width() -> usize {
    80
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: None,
            default_kind: FragmentKind::default(),
            preview_width: default_preview_width(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join(CONFIG_DIR);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load config from the default location, or fall back to defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file")?;

        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory {:?}", dir))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Default memory document location
    pub fn default_store_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .context("Could not determine data directory")?
            .join(CONFIG_DIR);
        Ok(data_dir.join(STORE_FILE))
    }

    /// Memory document to use: command-line override, then config, then default
    pub fn resolve_store_path(&self, cli_override: Option<&Path>) -> Result<PathBuf> {
        match (cli_override, &self.store_path) {
            (Some(path), _) => Ok(path.to_path_buf()),
            (None, Some(path)) => Ok(path.clone()),
            (None, None) => Self::default_store_path(),
        }
    }

    pub fn set_store_path(&mut self, path: PathBuf) {
        self.store_path = Some(path);
    }

    pub fn set_default_kind(&mut self, kind: FragmentKind) {
        self.default_kind = kind;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.preview_width, 80);
        assert_eq!(config.default_kind, FragmentKind::Reflection);
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set_store_path(PathBuf::from("/tmp/chamber/memories.json"));
        config.set_default_kind(FragmentKind::Insight);
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "default_kind = \"question\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.default_kind, FragmentKind::Question);
        assert_eq!(config.store_path, None);
        assert_eq!(config.preview_width, 80);
    }

    #[test]
    fn test_cli_override_wins() {
        let mut config = Config::default();
        config.set_store_path(PathBuf::from("configured.json"));

        let resolved = config
            .resolve_store_path(Some(Path::new("override.json")))
            .unwrap();
        assert_eq!(resolved, PathBuf::from("override.json"));

        let resolved = config.resolve_store_path(None).unwrap();
        assert_eq!(resolved, PathBuf::from("configured.json"));
    }

    #[test]
    fn test_invalid_kind_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "default_kind = \"rumor\"\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
