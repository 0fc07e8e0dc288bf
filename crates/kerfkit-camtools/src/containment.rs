//! Containment hierarchy
//!
//! Decides which blocks are holes. Every resolved block is tested against
//! every other one; a block strictly contained by at least one other block
//! is a hole, and its recorded container is the candidate with the smallest
//! polygon area (lowest sequence id on ties). Only one level of nesting is
//! resolved.

use kerfkit_core::{polygon_contains, Diagnostic};
use kerfkit_parser::{Block, BlockPhase, Containment};

use crate::options::CorrectionOptions;
use crate::pipeline::BlockPass;

/// Containment decision for one block
#[derive(Debug, Clone, PartialEq)]
pub struct ContainmentDecision {
    pub sequence_id: usize,
    pub containment: Containment,
    /// Every block that strictly contains this one, in sequence order
    pub candidates: Vec<usize>,
}

/// Resolve containment for every block with a determinate orientation.
///
/// Blocks without usable geometry are neither containers nor contained and
/// get no decision.
pub fn resolve_containment(blocks: &[Block]) -> Vec<ContainmentDecision> {
    let resolved: Vec<&Block> = blocks
        .iter()
        .filter(|b| b.phase >= BlockPhase::OrientationResolved && b.geometry.is_some())
        .collect();

    let mut decisions = Vec::with_capacity(resolved.len());
    for inner in &resolved {
        let Some(inner_geom) = &inner.geometry else {
            continue;
        };

        let mut containers: Vec<(usize, f64)> = Vec::new();
        for outer in &resolved {
            if outer.sequence_id == inner.sequence_id {
                continue;
            }
            let Some(outer_geom) = &outer.geometry else {
                continue;
            };
            if !outer_geom.bounds.contains(&inner_geom.bounds) {
                continue;
            }
            if polygon_contains(&outer_geom.polygon, &inner_geom.polygon) {
                containers.push((outer.sequence_id, outer_geom.polygon.area()));
            }
        }

        let containment = containers
            .iter()
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
            .map(|(id, _)| Containment::Hole { container_id: *id })
            .unwrap_or(Containment::Exterior);

        decisions.push(ContainmentDecision {
            sequence_id: inner.sequence_id,
            containment,
            candidates: containers.iter().map(|(id, _)| *id).collect(),
        });
    }

    decisions
}

#[derive(Debug, Default)]
pub struct ContainmentResolver;

impl ContainmentResolver {
    pub fn new() -> Self {
        Self
    }
}

impl BlockPass for ContainmentResolver {
    fn name(&self) -> &str {
        "containment"
    }

    fn description(&self) -> &str {
        "Marks blocks contained by another block as holes"
    }

    fn run(&self, blocks: &mut [Block], _options: &CorrectionOptions) {
        for decision in resolve_containment(blocks) {
            let Some(block) = blocks
                .iter_mut()
                .find(|b| b.sequence_id == decision.sequence_id)
            else {
                continue;
            };

            if let Containment::Hole { container_id } = decision.containment {
                tracing::debug!(block = block.sequence_id, container_id, "Hole");
                if decision.candidates.len() > 1 {
                    block.push_diagnostic(Diagnostic::AmbiguousContainment {
                        candidates: decision.candidates.clone(),
                        chosen: container_id,
                    });
                }
            }
            block.containment = Some(decision.containment);
            block.advance(BlockPhase::ContainmentResolved);
        }
    }
}
