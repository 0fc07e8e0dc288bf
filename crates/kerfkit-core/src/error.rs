//! Error handling for KerfKit
//!
//! Provides the error types shared by every layer of the toolkit:
//! - Segment errors (block structure of the instruction stream)
//! - Geometry errors (polygon construction)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Block segmentation error type
///
/// Structural failures of the instruction stream. These are fatal to the
/// whole run: no partial block is ever emitted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SegmentError {
    /// A block start marker was seen but the closing pair never appeared
    #[error("Malformed block starting at line {line_number}: {reason}")]
    MalformedBlock {
        /// The 1-based line number of the block start marker.
        line_number: usize,
        /// Why the block could not be segmented.
        reason: String,
    },
}

impl SegmentError {
    /// Create a malformed block error
    pub fn malformed(line_number: usize, reason: impl Into<String>) -> Self {
        Self::MalformedBlock {
            line_number,
            reason: reason.into(),
        }
    }
}

/// Geometry error type
///
/// Represents failures to derive a usable polygon from a block's path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The path does not have enough distinct vertices to enclose an area
    #[error("Degenerate geometry: {distinct} distinct vertices (at least 3 required)")]
    TooFewVertices {
        /// The number of distinct vertices found.
        distinct: usize,
    },

    /// The winding sum is zero, so no orientation can be assigned
    #[error("Degenerate geometry: zero winding sum")]
    ZeroWinding,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_error_display() {
        let err = SegmentError::malformed(12, "no closing M03/G40 pair");
        assert_eq!(
            err.to_string(),
            "Malformed block starting at line 12: no closing M03/G40 pair"
        );
    }

    #[test]
    fn test_geometry_error_display() {
        let err = GeometryError::TooFewVertices { distinct: 2 };
        assert_eq!(
            err.to_string(),
            "Degenerate geometry: 2 distinct vertices (at least 3 required)"
        );
    }
}
