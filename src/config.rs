// Runtime configuration: defaults, optional YAML file, then explicit overrides

use crate::assets::{AssetBase, DEFAULT_ASSET_BASE};
use eyre::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where collections live and how asset paths become URLs
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub asset_base: AssetBase,
}

/// On-disk shape of the config file; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    asset_base: Option<String>,
}

impl Config {
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
            asset_base: AssetBase::default(),
        }
    }

    pub fn with_asset_base(mut self, base: impl Into<String>) -> Self {
        self.asset_base = AssetBase::new(base);
        self
    }

    /// Build the effective config.
    ///
    /// `config_path` is read when given (it must exist); otherwise
    /// `<config dir>/mockshop/config.yaml` is used if present. CLI overrides
    /// win over the file, which wins over the defaults.
    pub fn load(config_path: Option<&Path>, data_dir: Option<PathBuf>, asset_base: Option<String>) -> Result<Self> {
        let file = match config_path {
            Some(path) => Self::read_file(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::read_file(&path)?,
                None => ConfigFile::default(),
            },
        };

        let data_dir = data_dir.or(file.data_dir).unwrap_or_else(default_data_dir);
        let asset_base = asset_base.or(file.asset_base).unwrap_or_else(|| DEFAULT_ASSET_BASE.to_string());

        let config = Self::new(data_dir).with_asset_base(asset_base);
        debug!(data_dir = ?config.data_dir, asset_base = config.asset_base.as_str(), "Resolved config");
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<ConfigFile> {
        let content = fs::read_to_string(path).with_context(|| format!("Failed to read config file {:?}", path))?;
        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse config file {:?}", path))
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mockshop").join("config.yaml"))
}

/// `<data dir>/mockshop`, or `./data` when the platform has no data dir
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("mockshop"))
        .unwrap_or_else(|| PathBuf::from("data"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_values_are_used() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "data_dir: /srv/shop\nasset_base: http://cdn.test/assets\n").unwrap();

        let config = Config::load(Some(path.as_path()), None, None).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/shop"));
        assert_eq!(config.asset_base.as_str(), "http://cdn.test/assets/");
    }

    #[test]
    fn test_overrides_win_over_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "data_dir: /srv/shop\n").unwrap();

        let config = Config::load(Some(path.as_path()), Some(temp.path().to_path_buf()), Some("http://x/".to_string())).unwrap();
        assert_eq!(config.data_dir, temp.path());
        assert_eq!(config.asset_base.as_str(), "http://x/");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "data_dir: /srv/shop\n").unwrap();

        let config = Config::load(Some(path.as_path()), None, None).unwrap();
        assert_eq!(config.asset_base, AssetBase::default());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let result = Config::load(Some(temp.path().join("nope.yaml").as_path()), None, None);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "port: 9999\n").unwrap();

        assert!(Config::load(Some(path.as_path()), None, None).is_err());
    }
}
