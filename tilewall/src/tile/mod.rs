//! Frame planning and tile loading.
//!
//! A frame is produced in two steps:
//!
//! 1. [`FramePlanner`] turns a window and its data source into a
//!    [`WindowPlan`]: the unoccluded area, the level of detail and one
//!    [`TileRequest`] per visible tile and channel.
//! 2. [`TileLoader`] decodes the requested tiles in parallel and returns
//!    them as [`LoadedTile`]s.

mod loader;
mod planner;
mod request;

pub use loader::{LoadReport, LoadedTile, LoaderError, TileLoader};
pub use planner::{FramePlanner, WindowPlan};
pub use request::TileRequest;
