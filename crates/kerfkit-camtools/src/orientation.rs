//! Orientation engine
//!
//! Winding is classified from a centroid-relative shoelace sum. Taking the
//! cross products about the centroid instead of the origin gives the same
//! sign for simple polygons and keeps magnitudes small for paths far from
//! the machine origin.

use kerfkit_core::{Diagnostic, GeometryError, Point};
use kerfkit_parser::{Block, BlockPhase, Orientation};

use crate::options::CorrectionOptions;
use crate::pipeline::BlockPass;

/// Winding sum of a closed ring about `centroid`.
///
/// Each term is the cross product of consecutive centroid-relative vertices,
/// signed so that a clockwise traversal in a y-up frame sums positive.
pub fn winding_sum(vertices: &[Point], centroid: Point) -> f64 {
    let n = vertices.len();
    (0..n)
        .map(|i| {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            (b.x - centroid.x) * (a.y - centroid.y) - (a.x - centroid.x) * (b.y - centroid.y)
        })
        .sum()
}

/// Classify a winding sum; magnitudes within `tolerance` are indeterminate
pub fn classify_winding(sum: f64, tolerance: f64) -> Orientation {
    if sum > tolerance {
        Orientation::Clockwise
    } else if sum < -tolerance {
        Orientation::CounterClockwise
    } else {
        Orientation::Indeterminate
    }
}

/// Orientation of a vertex ring about its own vertex-mean centroid
pub fn orientation_of(vertices: &[Point], tolerance: f64) -> Orientation {
    if vertices.is_empty() {
        return Orientation::Indeterminate;
    }
    let n = vertices.len() as f64;
    let centroid = Point::new(
        vertices.iter().map(|p| p.x).sum::<f64>() / n,
        vertices.iter().map(|p| p.y).sum::<f64>() / n,
    );
    classify_winding(winding_sum(vertices, centroid), tolerance)
}

#[derive(Debug, Default)]
pub struct OrientationEngine;

impl OrientationEngine {
    pub fn new() -> Self {
        Self
    }
}

impl BlockPass for OrientationEngine {
    fn name(&self) -> &str {
        "orientation"
    }

    fn description(&self) -> &str {
        "Classifies each path as clockwise or counter-clockwise"
    }

    fn run(&self, blocks: &mut [Block], options: &CorrectionOptions) {
        for block in blocks.iter_mut() {
            let Some(geometry) = &block.geometry else {
                continue;
            };
            let sum = winding_sum(geometry.polygon.vertices(), geometry.centroid);
            let orientation = classify_winding(sum, options.geometry_tolerance);
            tracing::debug!(block = block.sequence_id, sum, %orientation, "Orientation");

            block.orientation = Some(orientation);
            if orientation == Orientation::Indeterminate {
                block.push_diagnostic(Diagnostic::DegenerateGeometry {
                    reason: GeometryError::ZeroWinding.to_string(),
                });
            } else {
                block.advance(BlockPhase::OrientationResolved);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 0.0),
        ]
    }

    #[test]
    fn test_square_is_clockwise() {
        let sum = winding_sum(&square(), Point::new(5.0, 5.0));
        assert_eq!(sum, 200.0);
        assert_eq!(classify_winding(sum, 1e-9), Orientation::Clockwise);
    }

    #[test]
    fn test_reversed_square_is_counter_clockwise() {
        let mut vertices = square();
        vertices.reverse();
        assert_eq!(orientation_of(&vertices, 1e-9), Orientation::CounterClockwise);
    }

    #[test]
    fn test_far_from_origin_matches_near_origin() {
        let shifted: Vec<Point> = square()
            .iter()
            .map(|p| Point::new(p.x + 1.0e6, p.y - 2.0e6))
            .collect();
        assert_eq!(orientation_of(&shifted, 1e-9), Orientation::Clockwise);
    }

    #[test]
    fn test_collinear_is_indeterminate() {
        let vertices = vec![
            Point::new(0.0, 0.0),
            Point::new(5.0, 5.0),
            Point::new(10.0, 10.0),
        ];
        assert_eq!(orientation_of(&vertices, 1e-9), Orientation::Indeterminate);
    }

    #[test]
    fn test_empty_is_indeterminate() {
        assert_eq!(orientation_of(&[], 1e-9), Orientation::Indeterminate);
    }
}
