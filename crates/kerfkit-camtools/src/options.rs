//! Correction options

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CamToolError, CamToolResult};

/// Highest supported decimal precision for emitted coordinates
pub const MAX_COORDINATE_PRECISION: usize = 6;

/// Compensation policy for an exterior profile whose pierce point lies
/// inside its own path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExteriorPolicy {
    /// Mirror the hole rule: clockwise cuts left, counter-clockwise cuts right,
    /// which keeps the kerf in the waste outside the part
    #[default]
    MirrorHole,
    /// Keep whatever compensation code the block already has
    Keep,
}

impl fmt::Display for ExteriorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MirrorHole => write!(f, "mirror-hole"),
            Self::Keep => write!(f, "keep"),
        }
    }
}

impl FromStr for ExteriorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mirror-hole" | "mirror" => Ok(Self::MirrorHole),
            "keep" => Ok(Self::Keep),
            _ => Err(format!("Unknown exterior policy: {}", s)),
        }
    }
}

/// Tunables shared by every correction pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionOptions {
    /// Decimal places for recomputed lead-in coordinates
    pub coordinate_precision: usize,
    /// Zero tolerance for winding sums and distinct-vertex checks
    pub geometry_tolerance: f64,
    pub exterior_policy: ExteriorPolicy,
}

impl Default for CorrectionOptions {
    fn default() -> Self {
        Self {
            coordinate_precision: 1,
            geometry_tolerance: 1e-9,
            exterior_policy: ExteriorPolicy::default(),
        }
    }
}

impl CorrectionOptions {
    pub fn validate(&self) -> CamToolResult<()> {
        if self.coordinate_precision > MAX_COORDINATE_PRECISION {
            return Err(CamToolError::InvalidParameters(format!(
                "coordinate precision must be at most {}",
                MAX_COORDINATE_PRECISION
            )));
        }
        if !(self.geometry_tolerance.is_finite() && self.geometry_tolerance > 0.0) {
            return Err(CamToolError::InvalidParameters(
                "geometry tolerance must be a positive number".to_string(),
            ));
        }
        Ok(())
    }
}
