//! Configuration file handling for `config.ini`.

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;
use tracing::debug;

use super::settings::WallConfig;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read or parse the config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

/// Entry point for loading a [`WallConfig`] from disk.
pub struct ConfigFile;

impl ConfigFile {
    /// Default location: `<config dir>/tilewall/config.ini`.
    ///
    /// Returns `None` on platforms without a user configuration directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tilewall").join("config.ini"))
    }

    /// Load the configuration at the default path, or defaults if there is none.
    pub fn load_default() -> Result<WallConfig, ConfigFileError> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Ok(WallConfig::default()),
        }
    }

    /// Load configuration from `path`.
    ///
    /// A missing file yields the defaults. Keys that are not recognised are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigFileError::ReadError`] if the file cannot be read or is
    /// not valid INI, and [`ConfigFileError::InvalidValue`] if a known key has
    /// an unusable value.
    pub fn load(path: &Path) -> Result<WallConfig, ConfigFileError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(WallConfig::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Parse configuration from INI text.
    pub fn parse(content: &str) -> Result<WallConfig, ConfigFileError> {
        let ini = Ini::load_from_str(content).map_err(ini::Error::Parse)?;
        super::parser::parse_ini(&ini)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConfigFile::load(&dir.path().join("config.ini")).unwrap();
        assert_eq!(config, WallConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(
            &path,
            "[tiles]\ntile_size = 256\npyramid_extension = jpg\n\n[loader]\nthreads = 3\n",
        )
        .unwrap();

        let config = ConfigFile::load(&path).unwrap();
        assert_eq!(config.tiles.tile_size, 256);
        assert_eq!(config.tiles.pyramid_extension, "jpg");
        assert_eq!(config.loader.threads, 3);
        assert_eq!(config.logging, Default::default());
    }

    #[test]
    fn test_invalid_value_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, "[loader]\nthreads = many\n").unwrap();

        match ConfigFile::load(&path) {
            Err(ConfigFileError::InvalidValue { section, key, .. }) => {
                assert_eq!(section, "loader");
                assert_eq!(key, "threads");
            }
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_default_path_file_name() {
        if let Some(path) = ConfigFile::default_path() {
            assert!(path.ends_with("tilewall/config.ini"));
        }
    }
}
