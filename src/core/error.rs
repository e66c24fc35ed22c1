//! Error types for area compositing and sprite animation

use thiserror::Error;

use crate::area::{ChunkKey, LayerKind};

/// Grid axis along which a dimension check failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Summed chunk widths of a row
    Row,
    /// Summed chunk heights of a column
    Column,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Row => f.write_str("row"),
            Axis::Column => f.write_str("column"),
        }
    }
}

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to locate chunk {key}")]
    MissingChunk { key: ChunkKey },

    #[error("unable to locate thumbnail of {area:?}")]
    MissingThumbnail { area: String },

    #[error("unable to locate {kind} layer of {area:?} at {}", .path.display())]
    MissingLayer {
        area: String,
        kind: LayerKind,
        path: std::path::PathBuf,
    },

    #[error(
        "mismatch between {axis} sums of {area:?} ({kind}) at {axis} {index} (prev={expected}, new={actual})"
    )]
    DimensionMismatch {
        area: String,
        kind: LayerKind,
        axis: Axis,
        index: u32,
        expected: u32,
        actual: u32,
    },

    #[error(
        "chunk height mismatch in {area:?} ({kind}) at row {row}, col {col} (row height={expected}, chunk height={actual})"
    )]
    CellHeightMismatch {
        area: String,
        kind: LayerKind,
        row: u32,
        col: u32,
        expected: u32,
        actual: u32,
    },

    #[error("area {area:?} has an empty chunk grid")]
    EmptyGrid { area: String },

    #[error("unknown area {0:?}")]
    UnknownArea(String),

    #[error("layer kind {0} is not composited")]
    UnsupportedLayerKind(LayerKind),

    #[error("clip {clip:?} has a zero back-and-forth increment")]
    InvalidIncrement { clip: String },

    #[error("clip {clip:?} is invalid: {reason}")]
    InvalidClip { clip: String, reason: String },

    #[error("unknown animation clip {0:?}")]
    UnknownClip(String),

    #[error("frame {index} of direction {direction} lies outside the {width}x{height} sheet")]
    FrameOutOfBounds {
        index: u32,
        direction: u32,
        width: u32,
        height: u32,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Manifest error: {0}")]
    Manifest(#[from] serde_json::Error),
}
