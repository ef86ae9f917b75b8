//! Error type shared by every fallible map operation

use crate::{ObjectId, WorldSize};
use thiserror::Error;

/// Errors raised by coordinate, grid, catalog and export operations.
///
/// All of these are raised before any state is touched, so a failed call
/// leaves the grid exactly as it was.
#[derive(Debug, Error)]
pub enum MapError {
    /// Coordinate input that is negative, fractional or not finite
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Zoom factor other than 0.5 or 2
    #[error("zoom factor {0} is not supported, expected 0.5 or 2")]
    InvalidZoomFactor(f32),

    /// World dimensions with an empty axis or more cells than can be indexed
    #[error("invalid world size {size}: {reason}")]
    InvalidWorldSize { size: WorldSize, reason: String },

    /// Coordinate or linear index outside the world dimensions
    #[error("{position} lies outside the {size} world")]
    OutOfBounds { position: String, size: WorldSize },

    /// Object id with no catalog entry
    #[error("object {0} is not in the catalog")]
    UnknownObject(ObjectId),

    /// Catalog source that cannot be expanded into entries
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Imported cell record that breaks a grid invariant
    #[error("invalid cell record at {position}: {reason}")]
    InvalidRecord { position: String, reason: String },

    /// JSON encoding or decoding failure
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
