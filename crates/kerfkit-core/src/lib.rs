//! # KerfKit Core
//!
//! Core types and utilities for KerfKit.
//! Provides the error taxonomy, block-local diagnostics and the planar
//! geometry used to classify cutting paths.

pub mod diagnostic;
pub mod error;
pub mod geometry;

pub use diagnostic::{Diagnostic, Severity};
pub use error::{GeometryError, SegmentError};
pub use geometry::{
    point_in_polygon, polygon_contains, BoundingBox, Point, Polygon, EPSILON,
};
