//! Error types for scene construction and rendering.

use ember_core::{ImageError, MeshError};
use thiserror::Error;

/// Errors raised while assembling a scene or building its hierarchy.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("primitive {index} has no bounding box")]
    MissingBoundingBox { index: usize },

    #[error("primitive {index} has a degenerate or non-finite bounding box")]
    InvalidBoundingBox { index: usize },

    #[error("cannot build a hierarchy over the empty range {start}..{end}")]
    EmptyRange { start: usize, end: usize },

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Invalid render settings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("image size must be non-zero, got {width}x{height}")]
    ZeroImageSize { width: u32, height: u32 },

    #[error("samples per pixel must be at least 1")]
    ZeroSamples,

    #[error("max bounces must be at least 1")]
    ZeroBounces,

    #[error("worker count must be at least 1")]
    ZeroWorkers,

    #[error("tile grid must be non-zero, got {0:?}")]
    ZeroTileGrid([u32; 2]),

    #[error("invalid camera: {0}")]
    InvalidCamera(&'static str),
}

/// Errors raised by a render session.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to spawn render thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("render thread panicked")]
    WorkerPanicked,

    #[error(transparent)]
    Image(#[from] ImageError),
}
