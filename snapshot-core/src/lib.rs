//! Browser-independent half of the tier list snapshot: how wide to capture,
//! which styles make the detached copy render the same on every screen,
//! what to tell the renderer, and how to encode the result.

pub mod config;
pub mod error;
pub mod plan;
pub mod raster;

pub use config::{CaptureConfig, DEFAULT_FILE_NAME, DEFAULT_SCALE, DEFAULT_TARGET_WIDTH, ItemBox};
pub use error::SnapshotError;
pub use plan::{CapturePlan, Declarations, RenderOptions, resolve_target_width};
pub use raster::Raster;
