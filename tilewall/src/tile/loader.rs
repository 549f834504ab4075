//! Parallel tile decoding.
//!
//! [`TileLoader`] owns a dedicated rayon pool so that decoding a frame's
//! tiles never competes with other rayon work in the process. Each request
//! goes through [`DataSource::tile_image`], so sources with a cache only
//! decode a tile once.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::TileImage;
use crate::config::LoaderConfig;
use crate::source::DataSource;

use super::planner::WindowPlan;
use super::request::TileRequest;

/// Errors raised while setting up a loader.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Failed to build decode thread pool: {0}")]
    ThreadPool(#[from] ThreadPoolBuildError),
}

/// A decoded tile ready for upload.
#[derive(Debug, Clone)]
pub struct LoadedTile {
    pub request: TileRequest,
    pub image: TileImage,
}

/// Outcome of decoding a batch of requests.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Decoded tiles, in request order.
    pub loaded: Vec<LoadedTile>,
    /// Requests whose tile could not be produced.
    pub failed: Vec<TileRequest>,
}

impl LoadReport {
    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    /// True if every request produced a tile.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Decodes tiles on a dedicated thread pool.
pub struct TileLoader {
    pool: ThreadPool,
}

impl TileLoader {
    /// Create a loader with `threads` decode threads (`0` = one per CPU).
    pub fn new(threads: usize) -> Result<Self, LoaderError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("tile-decode-{}", i))
            .build()?;
        info!(threads = pool.current_num_threads(), "Tile loader started");
        Ok(Self { pool })
    }

    /// Create a loader from the `[loader]` configuration section.
    pub fn from_config(config: &LoaderConfig) -> Result<Self, LoaderError> {
        Self::new(config.threads)
    }

    pub fn thread_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Decode `requests` from `source`.
    ///
    /// Blocks until every request has been attempted. Failed tiles are
    /// reported, not retried.
    pub fn load(&self, source: &dyn DataSource, requests: &[TileRequest]) -> LoadReport {
        let results: Vec<(TileRequest, Option<TileImage>)> = self.pool.install(|| {
            requests
                .par_iter()
                .map(|request| {
                    let image = source.tile_image(request.tile_id(), request.view());
                    (*request, image)
                })
                .collect()
        });

        let mut report = LoadReport::default();
        for (request, image) in results {
            match image {
                Some(image) => report.loaded.push(LoadedTile { request, image }),
                None => {
                    warn!(
                        uri = source.uri(),
                        tile_id = request.tile_id(),
                        channel = request.channel(),
                        "Tile could not be decoded"
                    );
                    report.failed.push(request);
                }
            }
        }

        debug!(
            uri = source.uri(),
            loaded = report.loaded.len(),
            failed = report.failed.len(),
            "Tile batch decoded"
        );
        report
    }

    /// Decode every request of a window plan.
    pub fn load_plan(&self, source: &dyn DataSource, plan: &WindowPlan) -> LoadReport {
        self.load(source, &plan.requests)
    }
}

impl std::fmt::Debug for TileLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileLoader")
            .field("threads", &self.pool.current_num_threads())
            .finish()
    }
}
