//! Tiled content sources.
//!
//! A [`DataSource`] knows how one content item is laid out in tiles, which
//! tiles are visible for a given area and level of detail, and how to
//! decode a tile. Each content kind has its own policy:
//!
//! - [`ImageSource`] - whole bitmaps served as a single tile, with
//!   side-by-side stereo support
//! - [`PyramidSource`] - pre-tiled image pyramids on disk
//! - [`VectorSource`] - SVG/PDF documents rasterized per tile by a
//!   [`Rasterizer`] backend
//! - [`StreamSource`] - live streams laid out by their sender
//!
//! # Factory Pattern
//!
//! Use [`DataSourceFactory`] to build the right source from content
//! metadata:
//!
//! ```ignore
//! use tilewall::source::{ContentInfo, DataSourceFactory};
//!
//! let factory = DataSourceFactory::new(512);
//! let source = factory.create(&ContentInfo::new(8192, 8192, "pyramid", "/data/map"))?;
//! ```

mod bitmap;
mod error;
mod factory;
mod pyramid;
mod stream;
mod types;
mod vector;

pub use bitmap::{is_stereo_uri, ImageSource, WHOLE_IMAGE_TILE};
pub use error::SourceError;
pub use factory::{DataSourceFactory, DEFAULT_TILE_SIZE};
pub use pyramid::{PyramidSource, DEFAULT_PYRAMID_EXTENSION};
pub use stream::{StreamFrame, StreamSource, StreamTile};
pub use types::{ContentInfo, ContentType, DataSource, StereoView};
pub use vector::{Rasterizer, VectorSource};
