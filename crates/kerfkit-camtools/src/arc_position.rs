//! Arc position classifier
//!
//! Records whether the pierce point lies inside the block's own path.

use kerfkit_core::{point_in_polygon, Diagnostic};
use kerfkit_parser::{Block, BlockPhase};

use crate::options::CorrectionOptions;
use crate::pipeline::BlockPass;

/// Classify the lead-in position of a block.
///
/// Circles always count as inside. Otherwise the pierce point is tested
/// against the chord polygon with the boundary counted as inside. `None`
/// when there is no geometry or the initial line carries no coordinates.
pub fn classify_lead_in(block: &Block) -> Option<bool> {
    if block.is_circle {
        return Some(true);
    }
    let geometry = block.geometry.as_ref()?;
    let pierce = block.initial_coordinates()?;
    Some(point_in_polygon(pierce, &geometry.polygon))
}

#[derive(Debug, Default)]
pub struct ArcPositionClassifier;

impl ArcPositionClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl BlockPass for ArcPositionClassifier {
    fn name(&self) -> &str {
        "arc_position"
    }

    fn description(&self) -> &str {
        "Determines whether each lead-in starts inside its path"
    }

    fn run(&self, blocks: &mut [Block], _options: &CorrectionOptions) {
        for block in blocks.iter_mut() {
            let inside = classify_lead_in(block);
            block.lead_in_inside = inside;

            if inside.is_none() && block.geometry.is_some() {
                block.push_diagnostic(Diagnostic::MissingCoordinates {
                    role: "pierce point".to_string(),
                    line: block.initial_point.clone(),
                });
            }

            if inside.is_some() && block.phase == BlockPhase::ContainmentResolved {
                tracing::debug!(block = block.sequence_id, inside = ?inside, "Lead-in position");
                block.advance(BlockPhase::ArcPositionResolved);
            }
        }
    }
}
