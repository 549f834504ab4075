//! Data source factory.
//!
//! Maps a content type tag to exactly one concrete [`DataSource`]. Tags
//! without a handler are a configuration error, never a silent fallback.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::config::TileConfig;

use super::bitmap::{is_stereo_uri, ImageSource};
use super::pyramid::{PyramidSource, DEFAULT_PYRAMID_EXTENSION};
use super::stream::StreamSource;
use super::vector::{Rasterizer, VectorSource};
use super::{ContentInfo, ContentType, DataSource, SourceError};

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 512;

/// Factory for creating data sources from content metadata.
///
/// # Example
///
/// ```
/// use tilewall::source::{ContentInfo, DataSourceFactory, SourceError};
///
/// let factory = DataSourceFactory::new(512);
///
/// let stream = factory
///     .create(&ContentInfo::new(1920, 1080, "stream", "desktop"))
///     .unwrap();
/// assert!(stream.is_valid());
///
/// let movie = factory.create(&ContentInfo::new(1920, 1080, "movie", "clip.mp4"));
/// assert!(matches!(movie, Err(SourceError::UnsupportedContentType(_))));
/// ```
#[derive(Clone)]
pub struct DataSourceFactory {
    tile_size: u32,
    pyramid_extension: String,
    rasterizers: HashMap<ContentType, Arc<dyn Rasterizer>>,
}

impl DataSourceFactory {
    /// Create a factory cutting tiled content into `tile_size` tiles.
    pub fn new(tile_size: u32) -> Self {
        Self {
            tile_size,
            pyramid_extension: DEFAULT_PYRAMID_EXTENSION.to_string(),
            rasterizers: HashMap::new(),
        }
    }

    /// Create a factory from the `[tiles]` configuration.
    pub fn from_config(config: &TileConfig) -> Self {
        Self::new(config.tile_size).with_pyramid_extension(config.pyramid_extension.clone())
    }

    /// Set the file extension of pyramid tiles.
    pub fn with_pyramid_extension(mut self, extension: impl Into<String>) -> Self {
        self.pyramid_extension = extension.into();
        self
    }

    /// Register the backend rendering `content_type` documents.
    pub fn with_rasterizer(
        mut self,
        content_type: ContentType,
        rasterizer: Arc<dyn Rasterizer>,
    ) -> Self {
        self.rasterizers.insert(content_type, rasterizer);
        self
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Whether a source can be built for `content_type`.
    pub fn supports(&self, content_type: ContentType) -> bool {
        match content_type {
            ContentType::Image | ContentType::Pyramid | ContentType::Stream => true,
            ContentType::Svg | ContentType::Pdf => self.rasterizers.contains_key(&content_type),
            ContentType::Movie | ContentType::WebBrowser => false,
        }
    }

    /// Build the data source for `info`.
    ///
    /// # Errors
    ///
    /// - [`SourceError::UnsupportedContentType`] for unknown tags, tags this
    ///   crate does not handle, and vector types without a rasterizer.
    /// - [`SourceError::Lod`] if the configured tile size is invalid.
    ///
    /// Unreadable resources do not fail: they produce a source whose
    /// `is_valid()` is false.
    pub fn create(&self, info: &ContentInfo) -> Result<Arc<dyn DataSource>, SourceError> {
        let content_type: ContentType = info.content_type.parse()?;
        if !self.supports(content_type) {
            return Err(SourceError::UnsupportedContentType(
                info.content_type.clone(),
            ));
        }

        let source: Arc<dyn DataSource> = match content_type {
            ContentType::Image => Arc::new(ImageSource::open(&info.uri)),
            ContentType::Pyramid => Arc::new(PyramidSource::open(
                info,
                self.tile_size,
                self.pyramid_extension.clone(),
            )?),
            ContentType::Svg | ContentType::Pdf => {
                let rasterizer = self.rasterizers.get(&content_type).cloned().ok_or_else(|| {
                    SourceError::UnsupportedContentType(info.content_type.clone())
                })?;
                Arc::new(VectorSource::open(
                    info,
                    content_type,
                    self.tile_size,
                    rasterizer,
                )?)
            }
            ContentType::Stream => Arc::new(StreamSource::new(
                info.uri.clone(),
                is_stereo_uri(&info.uri),
            )),
            ContentType::Movie | ContentType::WebBrowser => {
                return Err(SourceError::UnsupportedContentType(
                    info.content_type.clone(),
                ))
            }
        };

        debug!(
            uri = %info.uri,
            content_type = %content_type,
            valid = source.is_valid(),
            stereo = source.is_stereo(),
            max_lod = source.max_lod(),
            "Created data source"
        );
        Ok(source)
    }
}

impl Default for DataSourceFactory {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_SIZE)
    }
}

impl fmt::Debug for DataSourceFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut backends: Vec<_> = self
            .rasterizers
            .iter()
            .map(|(kind, backend)| format!("{}={}", kind, backend.name()))
            .collect();
        backends.sort();
        f.debug_struct("DataSourceFactory")
            .field("tile_size", &self.tile_size)
            .field("pyramid_extension", &self.pyramid_extension)
            .field("rasterizers", &backends)
            .finish()
    }
}
