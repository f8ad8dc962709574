//! Error types for surface mutations.
//!
//! The reconciler itself never invents failures. Every error originates in a
//! [`Surface`](crate::surface::Surface) primitive and is propagated unchanged
//! to the caller of the top-level reconciliation call. Mutations that
//! completed before the failure stay applied.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SurfaceError>;

/// A fault raised by a rendering surface or while loading configuration.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// Element creation was given a tag name the surface rejects.
    #[error("invalid tag name: {0:?}")]
    InvalidTag(String),

    /// A live child position was addressed that does not exist.
    #[error("no live child at index {index} (parent has {len} children)")]
    MissingChild {
        /// The requested position.
        index: usize,
        /// The number of children the parent actually has.
        len: usize,
    },

    /// A node handle that does not belong to this surface.
    #[error("unknown live node")]
    UnknownNode,

    /// An attribute, listener or child operation was attempted on a text node.
    #[error("operation requires an element node")]
    NotAnElement,

    /// Mount configuration could not be parsed.
    #[error("invalid mount configuration: {0}")]
    Config(#[from] serde_json::Error),
}
