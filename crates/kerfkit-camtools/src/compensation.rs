//! Compensation corrector
//!
//! Chooses the cutter compensation side for each classified block and
//! re-projects lead-ins that start on the wrong side of the path.
//!
//! | role     | lead-in | action                                           |
//! |----------|---------|--------------------------------------------------|
//! | hole     | inside  | compensation from orientation                    |
//! | hole     | outside | recompute lead-in, compensation from orientation |
//! | exterior | inside  | recompute lead-in, compensation per policy       |
//! | exterior | outside | no change                                        |

use kerfkit_core::{Diagnostic, Point};
use kerfkit_parser::{format_rapid, Block, BlockPhase, CompensationSide, Correction, Orientation};

use crate::options::{CorrectionOptions, ExteriorPolicy};
use crate::pipeline::BlockPass;

/// Compensation side for a hole cut in the given direction
pub fn hole_side(orientation: Orientation) -> CompensationSide {
    match orientation {
        Orientation::Clockwise => CompensationSide::Right,
        Orientation::CounterClockwise | Orientation::Indeterminate => CompensationSide::Left,
    }
}

/// Re-project a pierce point.
///
/// The new point lies on the ray from the lead-in arc's end point in the
/// direction `initial -> arc_start`, at the distance `|arc_end - initial|`.
pub fn recompute_lead_in(initial: Point, arc_start: Point, arc_end: Point) -> Point {
    let direction = (arc_start.y - initial.y).atan2(arc_start.x - initial.x);
    let distance = arc_end.distance_to(&initial);
    Point::new(
        arc_end.x + distance * direction.cos(),
        arc_end.y + distance * direction.sin(),
    )
}

#[derive(Debug, Default)]
pub struct CompensationCorrector;

impl CompensationCorrector {
    pub fn new() -> Self {
        Self
    }

    /// Decide the correction for a block.
    ///
    /// Returns `None` for blocks that never reached
    /// [`BlockPhase::ArcPositionResolved`]. The decision reads only the
    /// block's original lines, so deciding twice gives the same result.
    pub fn decide(
        &self,
        block: &Block,
        options: &CorrectionOptions,
    ) -> Option<(Correction, Vec<Diagnostic>)> {
        if block.phase < BlockPhase::ArcPositionResolved {
            return None;
        }
        let orientation = block.orientation?;
        let is_hole = block.is_hole()?;
        let inside = block.lead_in_inside?;

        let mut diagnostics = Vec::new();
        let mut correction = Correction::default();

        let side = match (is_hole, inside) {
            (true, _) => Some(hole_side(orientation)),
            (false, true) => match options.exterior_policy {
                ExteriorPolicy::MirrorHole => Some(hole_side(orientation.reversed())),
                ExteriorPolicy::Keep => None,
            },
            (false, false) => None,
        };

        if let Some(side) = side {
            if block.compensation_code().is_some() {
                correction.compensation = Some(side);
            } else {
                diagnostics.push(Diagnostic::MissingCompensationDirective {
                    line: block.start_directive[0].clone(),
                });
            }
        }

        if is_hole != inside {
            let (arc_start, arc_end) = block.lead_in_endpoints();
            match (block.initial_coordinates(), arc_start, arc_end) {
                (Some(initial), Some(arc_start), Some(arc_end)) => {
                    let point = recompute_lead_in(initial, arc_start, arc_end);
                    correction.lead_in_line =
                        Some(format_rapid(point, options.coordinate_precision));
                    correction.lead_in_point = Some(point);
                }
                (initial, arc_start, _) => {
                    let (role, line) = if initial.is_none() {
                        ("pierce point", &block.initial_point)
                    } else if arc_start.is_none() {
                        ("lead-in start", &block.lead_in_arc[0])
                    } else {
                        ("lead-in end", &block.lead_in_arc[1])
                    };
                    diagnostics.push(Diagnostic::MissingCoordinates {
                        role: role.to_string(),
                        line: line.clone(),
                    });
                }
            }
        }

        Some((correction, diagnostics))
    }
}

impl BlockPass for CompensationCorrector {
    fn name(&self) -> &str {
        "compensation"
    }

    fn description(&self) -> &str {
        "Applies compensation side and lead-in corrections"
    }

    fn run(&self, blocks: &mut [Block], options: &CorrectionOptions) {
        for block in blocks.iter_mut() {
            if !matches!(
                block.phase,
                BlockPhase::ArcPositionResolved | BlockPhase::CorrectionApplied
            ) {
                continue;
            }
            let Some((correction, diagnostics)) = self.decide(block, options) else {
                continue;
            };

            tracing::debug!(
                block = block.sequence_id,
                compensation = ?correction.compensation,
                lead_in = ?correction.lead_in_line,
                "Correction"
            );
            for diagnostic in diagnostics {
                block.push_diagnostic(diagnostic);
            }
            block.correction = Some(correction);
            block.advance(BlockPhase::CorrectionApplied);
        }
    }
}
