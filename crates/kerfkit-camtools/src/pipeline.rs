//! Block pass pipeline
//!
//! Classification and correction run as an ordered list of passes over the
//! complete block set. Containment compares every pair of blocks, so no pass
//! starts before segmentation has finished.

use kerfkit_parser::{source_lines, Block, BlockSegmenter, Document, SourceLine};

use crate::arc_position::ArcPositionClassifier;
use crate::compensation::CompensationCorrector;
use crate::containment::ContainmentResolver;
use crate::error::CamToolResult;
use crate::geometry::GeometryBuilder;
use crate::options::CorrectionOptions;
use crate::orientation::OrientationEngine;
use crate::report::RunReport;

/// A whole-document transformation step
///
/// Passes mutate blocks in place and never fail: anything that prevents a
/// block from advancing is recorded as a diagnostic on that block.
pub trait BlockPass {
    /// Get the name/identifier of this pass
    fn name(&self) -> &str;

    /// Get a description of what this pass does
    fn description(&self) -> &str;

    /// Run the pass over every block
    fn run(&self, blocks: &mut [Block], options: &CorrectionOptions);
}

/// Boxed pass for dynamic registration
pub type PassHandle = Box<dyn BlockPass>;

/// Output of a full correction run
#[derive(Debug, Clone)]
pub struct ProcessedProgram {
    /// Corrected program lines, pass-through lines included
    pub lines: Vec<String>,
    pub report: RunReport,
}

impl ProcessedProgram {
    /// The corrected program as newline-terminated text
    pub fn text(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

/// Ordered sequence of block passes
///
/// # Example
/// ```ignore
/// let pipeline = CorrectionPipeline::new(CorrectionOptions::default())?;
/// let program = pipeline.process_text(&cam_text)?;
/// std::fs::write("output.cam", program.text())?;
/// ```
pub struct CorrectionPipeline {
    passes: Vec<PassHandle>,
    options: CorrectionOptions,
}

impl CorrectionPipeline {
    /// Create a pipeline with the standard passes, in order
    pub fn new(options: CorrectionOptions) -> CamToolResult<Self> {
        let mut pipeline = Self::empty(options)?;
        pipeline
            .register(Box::new(GeometryBuilder::new()))
            .register(Box::new(OrientationEngine::new()))
            .register(Box::new(ContainmentResolver::new()))
            .register(Box::new(ArcPositionClassifier::new()))
            .register(Box::new(CompensationCorrector::new()));
        Ok(pipeline)
    }

    /// Create a pipeline with no passes
    pub fn empty(options: CorrectionOptions) -> CamToolResult<Self> {
        options.validate()?;
        Ok(Self {
            passes: Vec::new(),
            options,
        })
    }

    /// Register a pass; passes run in registration order
    pub fn register(&mut self, pass: PassHandle) -> &mut Self {
        self.passes.push(pass);
        self
    }

    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    pub fn options(&self) -> &CorrectionOptions {
        &self.options
    }

    /// List all registered passes as (name, description)
    pub fn list_passes(&self) -> Vec<(&str, &str)> {
        self.passes
            .iter()
            .map(|p| (p.name(), p.description()))
            .collect()
    }

    /// Run every pass over the document's blocks
    pub fn run(&self, document: &mut Document) {
        for pass in &self.passes {
            tracing::debug!(pass = pass.name(), "Running pass");
            pass.run(document.blocks_mut(), &self.options);
        }
    }

    /// Segment, classify, correct and finalize a line stream
    pub fn process_lines<I>(&self, lines: I) -> CamToolResult<ProcessedProgram>
    where
        I: IntoIterator<Item = SourceLine>,
    {
        let mut document = BlockSegmenter::new().segment(lines)?;
        self.run(&mut document);
        let lines = document.finalize();
        let report = RunReport::from_blocks(document.blocks());

        tracing::info!(
            blocks = report.summary.blocks,
            holes = report.summary.holes,
            modified = report.summary.modified,
            unresolved = report.summary.unresolved,
            "Correction complete"
        );

        Ok(ProcessedProgram { lines, report })
    }

    /// Convenience wrapper over [`process_lines`](Self::process_lines) for in-memory text
    pub fn process_text(&self, text: &str) -> CamToolResult<ProcessedProgram> {
        self.process_lines(source_lines(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_pass_order() {
        let pipeline = CorrectionPipeline::new(CorrectionOptions::default()).unwrap();
        let names: Vec<&str> = pipeline.list_passes().iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                "geometry",
                "orientation",
                "containment",
                "arc_position",
                "compensation"
            ]
        );
    }

    #[test]
    fn test_invalid_options_rejected() {
        let options = CorrectionOptions {
            coordinate_precision: 42,
            ..Default::default()
        };
        assert!(CorrectionPipeline::new(options).is_err());
    }

    #[test]
    fn test_empty_pipeline_passes_text_through() {
        let pipeline = CorrectionPipeline::empty(CorrectionOptions::default()).unwrap();
        assert_eq!(pipeline.pass_count(), 0);
        let text = "BOF\nG00X+1.0Y+1.0\nG41\nM04\nG01X+0.0Y+0.0\nG03X+2.0Y+0.0\nG01X+5.0Y+5.0\nM03\nG40\nEOF\n";
        let program = pipeline.process_text(text).unwrap();
        assert_eq!(program.text(), text);
    }
}
