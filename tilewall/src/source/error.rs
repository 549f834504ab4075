//! Error types for data source construction.

use thiserror::Error;

use crate::lod::LodError;

/// Errors raised while building a data source.
///
/// Tile-level decode failures are not errors: a tile that cannot be decoded
/// is reported as `None` by [`DataSource::tile_image`](super::DataSource::tile_image)
/// and may be retried later.
#[derive(Debug, Error)]
pub enum SourceError {
    /// No data source exists for this content type tag.
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// The underlying resource cannot be opened or decoded.
    #[error("Invalid source '{uri}': {reason}")]
    InvalidSource { uri: String, reason: String },

    /// The tile pyramid could not be built.
    #[error("Invalid tiling: {0}")]
    Lod(#[from] LodError),

    /// Content metadata could not be parsed.
    #[error("Invalid content metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}

impl SourceError {
    pub(crate) fn invalid(uri: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSource {
            uri: uri.to_string(),
            reason: reason.into(),
        }
    }
}
