//! Block segmentation
//!
//! A two-state machine over the non-blank lines of a program. A block opens
//! on a spindle-down marker (`M04`) and takes with it the pierce point line
//! two lines earlier, the compensation line right before the marker and the
//! two lead-in lines right after it. It closes on a spindle-up marker
//! (`M03`) immediately followed by a compensation cancel (`G40`). Lines
//! outside blocks pass through untouched.

use kerfkit_core::{Diagnostic, SegmentError};
use std::io;

use crate::block::Block;
use crate::instruction::{ControlCode, Instruction};
use crate::stream::{LineSink, SourceLine};

/// One element of a segmented program
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// A line outside any block, emitted verbatim
    Line(String),
    /// Index into [`Document::blocks`]
    Block(usize),
}

/// A segmented program: pass-through lines and blocks in source order
#[derive(Debug, Clone, Default)]
pub struct Document {
    segments: Vec<Segment>,
    blocks: Vec<Block>,
}

impl Document {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    /// Output lines with every block finalized
    pub fn finalize(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        for segment in &self.segments {
            match segment {
                Segment::Line(line) => out.push(line.clone()),
                Segment::Block(idx) => {
                    let text = self.blocks[*idx].finalize();
                    out.extend(text.lines().map(String::from));
                }
            }
        }
        out
    }

    /// Finalize every block and write the whole program to `sink`
    pub fn write_to<S: LineSink>(&mut self, sink: &mut S) -> io::Result<()> {
        for line in self.finalize() {
            sink.write_line(&line)?;
        }
        Ok(())
    }
}

struct OpenBlock {
    line_number: usize,
    initial_point: String,
    start_directive: [String; 2],
    lead_in_arc: [String; 2],
    main_path: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

enum SegmenterState {
    OutsideBlock,
    InsideBlock(OpenBlock),
}

/// Splits a line stream into a [`Document`]
#[derive(Debug, Default)]
pub struct BlockSegmenter;

impl BlockSegmenter {
    pub fn new() -> Self {
        Self
    }

    /// Segment the whole stream.
    ///
    /// A start marker that is never closed, or that lacks the two lines
    /// before it or the two lead-in lines after it, fails the whole run with
    /// [`SegmentError::MalformedBlock`]; no partial block is produced.
    pub fn segment<I>(&self, lines: I) -> Result<Document, SegmentError>
    where
        I: IntoIterator<Item = SourceLine>,
    {
        let lines: Vec<SourceLine> = lines.into_iter().collect();
        let mut doc = Document::default();
        let mut state = SegmenterState::OutsideBlock;
        // Pass-through lines since the last block closed
        let mut free_lines = 0usize;
        let mut i = 0;

        while i < lines.len() {
            let line = &lines[i];
            let instruction = Instruction::parse(&line.text);

            state = match std::mem::replace(&mut state, SegmenterState::OutsideBlock) {
                SegmenterState::OutsideBlock => {
                    if !instruction.is_control(ControlCode::SpindleDown) {
                        doc.segments.push(Segment::Line(line.text.clone()));
                        free_lines += 1;
                        i += 1;
                        continue;
                    }
                    if free_lines < 2 {
                        return Err(SegmentError::malformed(
                            line.number,
                            "start marker needs a pierce point line and a compensation line before it",
                        ));
                    }
                    if i + 2 >= lines.len() {
                        return Err(SegmentError::malformed(
                            line.number,
                            "start marker is not followed by two lead-in lines",
                        ));
                    }

                    // The two preceding lines belong to the block
                    doc.segments.truncate(doc.segments.len() - 2);
                    free_lines -= 2;

                    tracing::debug!(line = line.number, block = doc.blocks.len(), "Block opened");
                    // Pierce point, compensation line and lead-in pair
                    let diagnostics = [i - 2, i - 1, i + 1, i + 2]
                        .into_iter()
                        .filter(|&idx| !Instruction::parse(&lines[idx].text).is_recognized())
                        .map(|idx| Diagnostic::UnrecognizedLine {
                            line: lines[idx].text.clone(),
                        })
                        .collect();
                    let open = OpenBlock {
                        line_number: line.number,
                        initial_point: lines[i - 2].text.clone(),
                        start_directive: [lines[i - 1].text.clone(), line.text.clone()],
                        lead_in_arc: [lines[i + 1].text.clone(), lines[i + 2].text.clone()],
                        main_path: Vec::new(),
                        diagnostics,
                    };
                    i += 3;
                    SegmenterState::InsideBlock(open)
                }
                SegmenterState::InsideBlock(mut open) => {
                    let closes = instruction.is_control(ControlCode::SpindleUp)
                        && lines.get(i + 1).is_some_and(|next| {
                            Instruction::parse(&next.text)
                                .is_control(ControlCode::CompensationCancel)
                        });

                    if closes {
                        let sequence_id = doc.blocks.len();
                        let mut block = Block::new(
                            sequence_id,
                            open.line_number,
                            open.initial_point,
                            open.start_directive,
                            open.lead_in_arc,
                            open.main_path,
                            [line.text.clone(), lines[i + 1].text.clone()],
                        );
                        for diagnostic in open.diagnostics {
                            block.push_diagnostic(diagnostic);
                        }
                        tracing::debug!(
                            block = sequence_id,
                            path_lines = block.main_path.len(),
                            circle = block.is_circle,
                            "Block closed"
                        );
                        doc.blocks.push(block);
                        doc.segments.push(Segment::Block(sequence_id));
                        free_lines = 0;
                        i += 2;
                        SegmenterState::OutsideBlock
                    } else {
                        if instruction.is_control(ControlCode::SpindleDown) {
                            open.diagnostics.push(Diagnostic::NestedStartMarker {
                                line_number: line.number,
                            });
                        } else if !instruction.is_recognized() {
                            open.diagnostics.push(Diagnostic::UnrecognizedLine {
                                line: line.text.clone(),
                            });
                        }
                        open.main_path.push(line.text.clone());
                        i += 1;
                        SegmenterState::InsideBlock(open)
                    }
                }
            };
        }

        if let SegmenterState::InsideBlock(open) = state {
            return Err(SegmentError::malformed(
                open.line_number,
                "no closing M03/G40 pair before end of stream",
            ));
        }

        tracing::debug!(
            blocks = doc.blocks.len(),
            segments = doc.segments.len(),
            "Segmentation complete"
        );
        Ok(doc)
    }
}
