//! Wall configuration loaded from `config.ini`.
//!
//! [`WallConfig`] holds the settings; [`ConfigFile`] reads them from an INI
//! file, starting from the defaults and overlaying the keys it recognises.
//!
//! ```ini
//! [tiles]
//! tile_size = 512
//! pyramid_extension = png
//!
//! [loader]
//! threads = 0
//!
//! [logging]
//! directory = logs
//! file = tilewall.log
//! ```

mod file;
mod parser;
mod settings;

pub use file::{ConfigFile, ConfigFileError};
pub use settings::{
    LogConfig, LoaderConfig, TileConfig, WallConfig, DEFAULT_LOG_DIR, DEFAULT_LOG_FILE,
};
