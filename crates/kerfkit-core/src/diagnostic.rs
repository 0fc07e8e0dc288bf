//! Block-local diagnostics
//!
//! Non-fatal conditions found while classifying a block. They never abort
//! processing of the file; the affected block is emitted unmodified (or with
//! the part of the correction that could be resolved) and the diagnostic is
//! kept for the run report.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, no effect on the output
    Info,
    /// The block was processed but a choice was made on its behalf
    Warning,
    /// The block could not be classified and passes through unmodified
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A condition recorded against a single block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Fewer than three distinct vertices, or a zero winding sum
    DegenerateGeometry { reason: String },

    /// More than one block strictly contains this one
    AmbiguousContainment {
        /// Sequence ids of every container found
        candidates: Vec<usize>,
        /// Sequence id of the container that was recorded
        chosen: usize,
    },

    /// A main path line that matches no known instruction
    UnrecognizedLine { line: String },

    /// A line needed for geometry carries no coordinate pair
    MissingCoordinates { role: String, line: String },

    /// The start directive does not begin with a compensation code
    MissingCompensationDirective { line: String },

    /// A start marker appeared inside an open block and was kept as path text
    NestedStartMarker { line_number: usize },
}

impl Diagnostic {
    /// Severity of this diagnostic
    pub fn severity(&self) -> Severity {
        match self {
            Self::DegenerateGeometry { .. } => Severity::Error,
            Self::AmbiguousContainment { .. } => Severity::Warning,
            Self::UnrecognizedLine { .. } => Severity::Info,
            Self::MissingCoordinates { .. } => Severity::Warning,
            Self::MissingCompensationDirective { .. } => Severity::Warning,
            Self::NestedStartMarker { .. } => Severity::Warning,
        }
    }

    /// Log this diagnostic through `tracing` at the level matching its severity
    pub fn emit(&self, sequence_id: usize) {
        match self.severity() {
            Severity::Info => tracing::debug!(block = sequence_id, "{}", self),
            Severity::Warning => tracing::warn!(block = sequence_id, "{}", self),
            Severity::Error => tracing::error!(block = sequence_id, "{}", self),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateGeometry { reason } => write!(f, "{}", reason),
            Self::AmbiguousContainment { candidates, chosen } => write!(
                f,
                "Ambiguous containment: {} candidate containers {:?}, recorded block {}",
                candidates.len(),
                candidates,
                chosen
            ),
            Self::UnrecognizedLine { line } => write!(f, "Unrecognized line kept verbatim: {}", line),
            Self::MissingCoordinates { role, line } => {
                write!(f, "No coordinates on {} line: {}", role, line)
            }
            Self::MissingCompensationDirective { line } => write!(
                f,
                "Start directive has no compensation code to rewrite: {}",
                line
            ),
            Self::NestedStartMarker { line_number } => write!(
                f,
                "Start marker at line {} inside an open block kept as path text",
                line_number
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::AmbiguousContainment {
            candidates: vec![0, 2],
            chosen: 2,
        };
        assert_eq!(
            diag.to_string(),
            "Ambiguous containment: 2 candidate containers [0, 2], recorded block 2"
        );
        assert_eq!(diag.severity(), Severity::Warning);
    }

    #[test]
    fn test_diagnostic_serializes_with_kind_tag() {
        let diag = Diagnostic::UnrecognizedLine {
            line: "F1200".to_string(),
        };
        let json = serde_json::to_string(&diag).unwrap();
        assert_eq!(json, r#"{"kind":"unrecognized_line","line":"F1200"}"#);
    }
}
