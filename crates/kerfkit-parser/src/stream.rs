//! Line sources and sinks
//!
//! A line source yields the non-blank lines of a program in order, each
//! tagged with its physical line number. A line sink accepts the corrected
//! sequence.

use std::io::{self, BufRead, Write};

/// A non-blank program line with its 1-based position in the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub number: usize,
    pub text: String,
}

impl SourceLine {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

fn clean(raw: &str) -> Option<&str> {
    let trimmed = raw.trim_end();
    if trimmed.trim_start().is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Split in-memory program text into source lines, dropping blank lines
pub fn source_lines(text: &str) -> Vec<SourceLine> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, raw)| clean(raw).map(|line| SourceLine::new(idx + 1, line)))
        .collect()
}

/// Streams source lines from any buffered reader
pub struct ReaderLineSource<R: BufRead> {
    reader: R,
    line_number: usize,
    buffer: String,
}

impl<R: BufRead> ReaderLineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            buffer: String::new(),
        }
    }
}

impl<R: BufRead> Iterator for ReaderLineSource<R> {
    type Item = io::Result<SourceLine>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buffer.clear();
            match self.reader.read_line(&mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_number += 1;
                    if let Some(line) = clean(&self.buffer) {
                        return Some(Ok(SourceLine::new(self.line_number, line)));
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Accepts output lines in order
pub trait LineSink {
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

/// Writes newline-terminated lines to any writer
pub struct WriterLineSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterLineSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> LineSink for WriterLineSink<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_lines_skip_blank_and_keep_numbers() {
        let lines = source_lines("BOF\n\n  \nG90\r\nM04  \n");
        assert_eq!(
            lines,
            vec![
                SourceLine::new(1, "BOF"),
                SourceLine::new(4, "G90"),
                SourceLine::new(5, "M04"),
            ]
        );
    }

    #[test]
    fn test_reader_source_matches_in_memory_source() {
        let text = "BOF\n\nG90\nG00X+1.0Y+2.0\n";
        let from_reader: Vec<SourceLine> = ReaderLineSource::new(text.as_bytes())
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(from_reader, source_lines(text));
    }

    #[test]
    fn test_writer_sink_terminates_lines() {
        let mut sink = WriterLineSink::new(Vec::new());
        sink.write_line("G41").unwrap();
        sink.write_line("M04").unwrap();
        let bytes = sink.into_inner().unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "G41\nM04\n");
    }
}
