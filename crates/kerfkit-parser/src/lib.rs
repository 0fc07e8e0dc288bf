//! # KerfKit Parser
//!
//! Instruction grammar, block records and block segmentation.
//! Turns a plain line stream into a [`Document`] of pass-through lines and
//! [`Block`]s ready for geometric classification.

pub mod block;
pub mod instruction;
pub mod path;
pub mod segmenter;
pub mod stream;

pub use block::{
    Block, BlockGeometry, BlockPhase, CompensationSide, Containment, Correction, Orientation,
};
pub use instruction::{format_rapid, ControlCode, Instruction, MotionCode};
pub use path::{extract_endpoint, extract_vertices};
pub use segmenter::{BlockSegmenter, Document, Segment};
pub use stream::{source_lines, LineSink, ReaderLineSource, SourceLine, WriterLineSink};
