//! Error types for the CAM tools crate.
//!
//! Only structural and boundary failures are errors here. Per-block
//! classification problems are recorded as diagnostics on the block.

use kerfkit_core::SegmentError;
use thiserror::Error;

/// Errors that can occur while correcting a program.
#[derive(Error, Debug)]
pub enum CamToolError {
    /// The instruction stream could not be split into blocks.
    #[error(transparent)]
    Segment(#[from] SegmentError),

    /// Invalid correction options were provided.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type alias for CAM tool operations.
pub type CamToolResult<T> = Result<T, CamToolError>;
