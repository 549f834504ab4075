//! Configuration settings structs and their defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::source::{DEFAULT_PYRAMID_EXTENSION, DEFAULT_TILE_SIZE};

/// Default directory for log files.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "tilewall.log";

/// Complete wall configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallConfig {
    pub tiles: TileConfig,
    pub loader: LoaderConfig,
    pub logging: LogConfig,
}

/// `[tiles]` section: how content is cut into tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileConfig {
    /// Edge length of a square tile, in pixels.
    pub tile_size: u32,
    /// File extension of tiles inside an image pyramid directory.
    pub pyramid_extension: String,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            pyramid_extension: DEFAULT_PYRAMID_EXTENSION.to_string(),
        }
    }
}

/// `[loader]` section: tile decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Decode threads. `0` uses one thread per logical CPU.
    pub threads: usize,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    pub directory: PathBuf,
    pub file: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_LOG_DIR),
            file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

impl WallConfig {
    /// Set the tile size.
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tiles.tile_size = tile_size;
        self
    }

    /// Set the number of decode threads.
    pub fn with_loader_threads(mut self, threads: usize) -> Self {
        self.loader.threads = threads;
        self
    }

    /// Set the log directory.
    pub fn with_log_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.logging.directory = directory.into();
        self
    }
}
