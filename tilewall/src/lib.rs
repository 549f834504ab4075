//! Tilewall - level-of-detail tiling for tiled display walls
//!
//! Large images, image pyramids, vector documents and live streams are cut
//! into a pyramid of square tiles. Each frame, only the tiles that cover the
//! unoccluded part of a window at a suitable level of detail are decoded.
//!
//! # Modules
//!
//! - [`lod`] - tile pyramid arithmetic and visible-tile queries
//! - [`source`] - data sources for each content kind, and their factory
//! - [`cache`] - shared cache of decoded tiles
//! - [`visibility`] - window occlusion on the wall
//! - [`tile`] - per-frame planning and parallel decoding
//!
//! # Example
//!
//! ```ignore
//! use tilewall::config::ConfigFile;
//! use tilewall::source::{ContentInfo, DataSourceFactory};
//! use tilewall::tile::{FramePlanner, TileLoader};
//!
//! let config = ConfigFile::load_default()?;
//! let factory = DataSourceFactory::from_config(&config.tiles);
//! let loader = TileLoader::from_config(&config.loader)?;
//!
//! let source = factory.create(&ContentInfo::new(8192, 8192, "pyramid", "/data/map"))?;
//! let planner = FramePlanner::new(&windows, wall_rect);
//! let plan = planner.plan(&windows[0], source.as_ref());
//! let report = loader.load_plan(source.as_ref(), &plan);
//! ```

pub mod cache;
pub mod config;
pub mod geometry;
pub mod lod;
pub mod logging;
pub mod source;
pub mod tile;
pub mod visibility;

/// Version of the tilewall library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
