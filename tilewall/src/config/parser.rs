//! INI parsing logic for converting `Ini` into a [`WallConfig`].
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;

use ini::Ini;

use super::file::ConfigFileError;
use super::settings::WallConfig;

/// Parse an `Ini` object into a `WallConfig`.
///
/// Starts from `WallConfig::default()` and overlays any values found.
pub(super) fn parse_ini(ini: &Ini) -> Result<WallConfig, ConfigFileError> {
    let mut config = WallConfig::default();

    // [tiles] section
    if let Some(section) = ini.section(Some("tiles")) {
        if let Some(v) = section.get("tile_size") {
            config.tiles.tile_size = match v.trim().parse::<u32>() {
                Ok(size) if size > 0 => size,
                _ => {
                    return Err(invalid(
                        "tiles",
                        "tile_size",
                        v,
                        "must be a positive integer (pixels)",
                    ))
                }
            };
        }
        if let Some(v) = section.get("pyramid_extension") {
            let v = v.trim().trim_start_matches('.').to_lowercase();
            if v.is_empty() {
                return Err(invalid(
                    "tiles",
                    "pyramid_extension",
                    &v,
                    "must not be empty",
                ));
            }
            config.tiles.pyramid_extension = v;
        }
    }

    // [loader] section
    if let Some(section) = ini.section(Some("loader")) {
        if let Some(v) = section.get("threads") {
            config.loader.threads = v.trim().parse().map_err(|_| {
                invalid(
                    "loader",
                    "threads",
                    v,
                    "must be a non-negative integer (0 = one per CPU)",
                )
            })?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
