//! Geometry builder pass
//!
//! Builds each block's chord polygon, vertex-mean centroid and bounding box.

use kerfkit_core::{Diagnostic, GeometryError, Polygon};
use kerfkit_parser::{Block, BlockGeometry, BlockPhase, Orientation};

use crate::options::CorrectionOptions;
use crate::pipeline::BlockPass;

/// Derive the geometry of a single block.
///
/// Fails with [`GeometryError::TooFewVertices`] when the main path has
/// fewer than three distinct endpoints.
pub fn build_geometry(block: &Block, tolerance: f64) -> Result<BlockGeometry, GeometryError> {
    let polygon = Polygon::new(block.vertices());
    let distinct = polygon.distinct_vertex_count(tolerance);
    if distinct < 3 {
        return Err(GeometryError::TooFewVertices { distinct });
    }
    match (polygon.centroid(), polygon.bounds()) {
        (Some(centroid), Some(bounds)) => Ok(BlockGeometry {
            polygon,
            centroid,
            bounds,
        }),
        _ => Err(GeometryError::TooFewVertices { distinct: 0 }),
    }
}

#[derive(Debug, Default)]
pub struct GeometryBuilder;

impl GeometryBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl BlockPass for GeometryBuilder {
    fn name(&self) -> &str {
        "geometry"
    }

    fn description(&self) -> &str {
        "Builds chord polygons, centroids and bounds from main path endpoints"
    }

    fn run(&self, blocks: &mut [Block], options: &CorrectionOptions) {
        for block in blocks.iter_mut() {
            match build_geometry(block, options.geometry_tolerance) {
                Ok(geometry) => {
                    block.geometry = Some(geometry);
                    block.advance(BlockPhase::GeometryBuilt);
                }
                Err(e) => {
                    // Too few vertices: no winding can be assigned
                    block.orientation = Some(Orientation::Indeterminate);
                    block.push_diagnostic(Diagnostic::DegenerateGeometry {
                        reason: e.to_string(),
                    });
                }
            }
        }
    }
}
