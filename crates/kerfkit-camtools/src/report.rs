//! Run report
//!
//! A serializable summary of what the pipeline decided for every block.

use kerfkit_core::{Diagnostic, Severity};
use kerfkit_parser::{Block, BlockPhase, Correction, Orientation};
use serde::{Deserialize, Serialize};

use crate::error::CamToolResult;

/// Classification and correction of a single block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockReport {
    pub sequence_id: usize,
    /// Source line of the start marker
    pub line_number: usize,
    pub phase: BlockPhase,
    pub orientation: Option<Orientation>,
    pub is_hole: Option<bool>,
    pub container_id: Option<usize>,
    pub lead_in_inside: Option<bool>,
    pub is_circle: bool,
    pub correction: Option<Correction>,
    /// Whether the emitted text differs from the input
    pub modified: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl BlockReport {
    pub fn from_block(block: &Block) -> Self {
        let modified = block
            .corrected_lines()
            .iter()
            .zip(block.original_lines())
            .any(|(corrected, original)| corrected != original);

        Self {
            sequence_id: block.sequence_id,
            line_number: block.line_number,
            phase: block.phase,
            orientation: block.orientation,
            is_hole: block.is_hole(),
            container_id: block.containment.and_then(|c| c.container_id()),
            lead_in_inside: block.lead_in_inside,
            is_circle: block.is_circle,
            correction: block.correction.clone(),
            modified,
            diagnostics: block.diagnostics.clone(),
        }
    }
}

/// Counts over the whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub blocks: usize,
    pub holes: usize,
    pub exteriors: usize,
    /// Blocks that never reached a correction decision
    pub unresolved: usize,
    pub modified: usize,
    pub compensation_changes: usize,
    pub lead_in_changes: usize,
    pub warnings: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub summary: RunSummary,
    pub blocks: Vec<BlockReport>,
}

impl RunReport {
    pub fn from_blocks(blocks: &[Block]) -> Self {
        let reports: Vec<BlockReport> = blocks.iter().map(BlockReport::from_block).collect();

        let mut summary = RunSummary {
            blocks: reports.len(),
            ..Default::default()
        };
        for (block, report) in blocks.iter().zip(&reports) {
            match report.is_hole {
                Some(true) => summary.holes += 1,
                Some(false) => summary.exteriors += 1,
                None => {}
            }
            if report.correction.is_none() {
                summary.unresolved += 1;
            }
            if report.modified {
                summary.modified += 1;
                let lines = block.corrected_lines();
                let original = block.original_lines();
                if lines[0] != original[0] {
                    summary.lead_in_changes += 1;
                }
                if lines[1] != original[1] {
                    summary.compensation_changes += 1;
                }
            }
            for diagnostic in &report.diagnostics {
                match diagnostic.severity() {
                    Severity::Warning => summary.warnings += 1,
                    Severity::Error => summary.errors += 1,
                    Severity::Info => {}
                }
            }
        }

        Self {
            summary,
            blocks: reports,
        }
    }

    pub fn to_json_pretty(&self) -> CamToolResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
