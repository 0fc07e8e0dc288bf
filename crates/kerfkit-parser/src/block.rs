//! Block records and their processing lifecycle

use kerfkit_core::{BoundingBox, Diagnostic, Point, Polygon};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::instruction::{ControlCode, Instruction};
use crate::path::{extract_endpoint, extract_vertices};

/// Block processing phase
///
/// Phases only move forward. A block that cannot be classified stays at
/// the last phase it reached and is finalized unmodified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BlockPhase {
    /// Segmented, no geometry yet
    Parsed,
    /// Polygon, centroid and bounds built
    GeometryBuilt,
    /// Winding direction known
    OrientationResolved,
    /// Hole / exterior role known
    ContainmentResolved,
    /// Lead-in position relative to the path known
    ArcPositionResolved,
    /// Correction decision recorded
    CorrectionApplied,
    /// Output text produced
    Finalized,
}

impl fmt::Display for BlockPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parsed => write!(f, "Parsed"),
            Self::GeometryBuilt => write!(f, "GeometryBuilt"),
            Self::OrientationResolved => write!(f, "OrientationResolved"),
            Self::ContainmentResolved => write!(f, "ContainmentResolved"),
            Self::ArcPositionResolved => write!(f, "ArcPositionResolved"),
            Self::CorrectionApplied => write!(f, "CorrectionApplied"),
            Self::Finalized => write!(f, "Finalized"),
        }
    }
}

/// Winding direction of a block's path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Clockwise,
    CounterClockwise,
    Indeterminate,
}

impl Orientation {
    /// The opposite winding; `Indeterminate` stays as is
    pub fn reversed(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
            Self::Indeterminate => Self::Indeterminate,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clockwise => write!(f, "clockwise"),
            Self::CounterClockwise => write!(f, "counterclockwise"),
            Self::Indeterminate => write!(f, "indeterminate"),
        }
    }
}

/// Nesting role of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Containment {
    /// Not contained by any other block
    Exterior,
    /// Strictly contained by the block with `container_id`
    Hole { container_id: usize },
}

impl Containment {
    pub fn is_hole(&self) -> bool {
        matches!(self, Self::Hole { .. })
    }

    /// Sequence id of the containing block. Identity lookup only.
    pub fn container_id(&self) -> Option<usize> {
        match self {
            Self::Exterior => None,
            Self::Hole { container_id } => Some(*container_id),
        }
    }
}

/// Cutter compensation side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompensationSide {
    Left,
    Right,
}

impl CompensationSide {
    pub fn control_code(&self) -> ControlCode {
        match self {
            Self::Left => ControlCode::CompensationLeft,
            Self::Right => ControlCode::CompensationRight,
        }
    }

    pub fn as_code(&self) -> &'static str {
        self.control_code().as_str()
    }
}

/// Geometry derived from a block's main path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockGeometry {
    pub polygon: Polygon,
    /// Mean of the vertices, used as the orientation reference point
    pub centroid: Point,
    pub bounds: BoundingBox,
}

/// The correction decided for a block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Correction {
    /// Compensation code to write in place of the start directive's first line
    pub compensation: Option<CompensationSide>,
    /// Recomputed pierce point
    pub lead_in_point: Option<Point>,
    /// Rapid positioning line replacing the initial point line
    pub lead_in_line: Option<String>,
}

impl Correction {
    pub fn is_empty(&self) -> bool {
        self.compensation.is_none() && self.lead_in_line.is_none()
    }
}

/// One continuous cutting operation bounded by start and end markers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Parse-order identity
    pub sequence_id: usize,
    /// Source line number of the start marker
    pub line_number: usize,
    /// Pierce point line, two lines before the start marker
    pub initial_point: String,
    /// Compensation line and the start marker itself
    pub start_directive: [String; 2],
    /// The two lines following the start marker
    pub lead_in_arc: [String; 2],
    pub main_path: Vec<String>,
    /// End marker and compensation cancel
    pub end_markers: [String; 2],
    /// Path of exactly four instruction lines without linear cuts, treated
    /// as a circular bore. Unrecognized lines do not count.
    pub is_circle: bool,

    pub geometry: Option<BlockGeometry>,
    pub orientation: Option<Orientation>,
    pub containment: Option<Containment>,
    pub lead_in_inside: Option<bool>,
    pub correction: Option<Correction>,
    pub phase: BlockPhase,
    pub diagnostics: Vec<Diagnostic>,
}

impl Block {
    pub fn new(
        sequence_id: usize,
        line_number: usize,
        initial_point: String,
        start_directive: [String; 2],
        lead_in_arc: [String; 2],
        main_path: Vec<String>,
        end_markers: [String; 2],
    ) -> Self {
        let instructions: Vec<Instruction> = main_path
            .iter()
            .map(|line| Instruction::parse(line))
            .filter(Instruction::is_recognized)
            .collect();
        let is_circle =
            instructions.len() == 4 && !instructions.iter().any(Instruction::is_linear_cut);

        Self {
            sequence_id,
            line_number,
            initial_point,
            start_directive,
            lead_in_arc,
            main_path,
            end_markers,
            is_circle,
            geometry: None,
            orientation: None,
            containment: None,
            lead_in_inside: None,
            correction: None,
            phase: BlockPhase::Parsed,
            diagnostics: Vec::new(),
        }
    }

    /// Main path endpoints in order
    pub fn vertices(&self) -> Vec<Point> {
        extract_vertices(&self.main_path)
    }

    /// Coordinates of the original pierce point
    pub fn initial_coordinates(&self) -> Option<Point> {
        extract_endpoint(&self.initial_point)
    }

    /// Endpoints of the two lead-in lines
    pub fn lead_in_endpoints(&self) -> (Option<Point>, Option<Point>) {
        (
            extract_endpoint(&self.lead_in_arc[0]),
            extract_endpoint(&self.lead_in_arc[1]),
        )
    }

    /// The compensation code currently on the start directive, if any
    pub fn compensation_code(&self) -> Option<ControlCode> {
        match Instruction::parse(&self.start_directive[0]) {
            Instruction::Control(code) if code.is_compensation_side() => Some(code),
            _ => None,
        }
    }

    pub fn is_hole(&self) -> Option<bool> {
        self.containment.map(|c| c.is_hole())
    }

    /// Move the block to `phase`
    pub fn advance(&mut self, phase: BlockPhase) {
        debug_assert!(
            phase >= self.phase,
            "block {} cannot move back from {} to {}",
            self.sequence_id,
            self.phase,
            phase
        );
        self.phase = phase;
    }

    /// Record a diagnostic and log it
    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        diagnostic.emit(self.sequence_id);
        self.diagnostics.push(diagnostic);
    }

    /// The block's lines exactly as they were read
    pub fn original_lines(&self) -> Vec<&str> {
        std::iter::once(self.initial_point.as_str())
            .chain(self.start_directive.iter().map(String::as_str))
            .chain(self.lead_in_arc.iter().map(String::as_str))
            .chain(self.main_path.iter().map(String::as_str))
            .chain(self.end_markers.iter().map(String::as_str))
            .collect()
    }

    pub fn original_text(&self) -> String {
        self.original_lines().join("\n")
    }

    /// The block's lines with the recorded correction substituted
    pub fn corrected_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.original_lines().into_iter().map(String::from).collect();
        if let Some(correction) = &self.correction {
            if let Some(lead_in) = &correction.lead_in_line {
                lines[0] = lead_in.clone();
            }
            if let Some(side) = correction.compensation {
                if self.compensation_code().is_some() {
                    lines[1] = side.as_code().to_string();
                }
            }
        }
        lines
    }

    /// Re-join the block into its final text and mark it finalized
    pub fn finalize(&mut self) -> String {
        let text = self.corrected_lines().join("\n");
        self.advance(BlockPhase::Finalized);
        text
    }
}
