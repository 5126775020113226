//! Error taxonomy for panel configuration and rendering.

use thiserror::Error;

/// Invalid or unreadable panel configuration. Fatal; no layout is produced.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Wrap IO errors when reading panel files.
    #[error("failed to read panel config: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap serde parsing issues (including a missing `body` entry).
    #[error("failed to parse panel config: {0}")]
    Parse(#[from] serde_json::Error),
    /// The surface has no usable pixel size.
    #[error("panel surface must have a positive finite size, got {width}x{height}")]
    InvalidSurface {
        /// Configured width.
        width: f32,
        /// Configured height.
        height: f32,
    },
    /// A geometry or font attribute resolved to an unusable value.
    #[error("element `{element}` has invalid {attribute}: {value}")]
    InvalidAttribute {
        /// Element name (`body` for the defaults record).
        element: String,
        /// Attribute name as written in the config.
        attribute: &'static str,
        /// Offending value.
        value: f32,
    },
}

/// Render invoked before the drawing surface exists. Nothing is mutated.
#[derive(Debug, Error)]
pub enum PreconditionError {
    /// The backend reports no backing surface/mesh.
    #[error("drawing surface is not initialized")]
    SurfaceMissing,
}

/// Fatal outcomes of a render or frame call.
#[derive(Debug, Error)]
pub enum PanelError {
    /// See [`ConfigError`].
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// See [`PreconditionError`].
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
}
