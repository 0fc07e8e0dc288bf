//! # KerfKit CAM Tools
//!
//! Geometric classification and cutter-compensation correction of
//! segmented cutting programs.
//!
//! ## Passes
//!
//! - **Geometry**: chord polygon, centroid and bounds of each main path
//! - **Orientation**: clockwise / counter-clockwise from the winding sum
//! - **Containment**: hole or exterior, with the smallest enclosing block as container
//! - **Arc Position**: whether the lead-in starts inside the path
//! - **Compensation**: `G41`/`G42` selection and lead-in re-projection
//!
//! ## Supporting Infrastructure
//!
//! - **Pipeline**: ordered pass registry and the end-to-end driver
//! - **Report**: serializable per-block decisions and run counts

pub mod arc_position;
pub mod compensation;
pub mod containment;
pub mod error;
pub mod geometry;
pub mod options;
pub mod orientation;
pub mod pipeline;
pub mod report;

// Re-export commonly used items
pub use arc_position::{classify_lead_in, ArcPositionClassifier};
pub use compensation::{hole_side, recompute_lead_in, CompensationCorrector};
pub use containment::{resolve_containment, ContainmentDecision, ContainmentResolver};
pub use error::{CamToolError, CamToolResult};
pub use geometry::{build_geometry, GeometryBuilder};
pub use options::{CorrectionOptions, ExteriorPolicy, MAX_COORDINATE_PRECISION};
pub use orientation::{classify_winding, orientation_of, winding_sum, OrientationEngine};
pub use pipeline::{BlockPass, CorrectionPipeline, PassHandle, ProcessedProgram};
pub use report::{BlockReport, RunReport, RunSummary};
