//! Symbol spans.
//!
//! A [`Span`] carries both line numbers and byte offsets so that
//! "scope at cursor" queries can be answered from either coordinate.

use text_size::{TextRange, TextSize};

/// A half-open range in source text with the lines it starts and ends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start_line: u32,
    pub end_line: u32,
    pub range: TextRange,
}

impl Span {
    /// Create a span from line numbers and byte offsets.
    ///
    /// Offsets are swapped if given out of order so `start <= end` always holds.
    pub fn new(start_line: u32, start_offset: u32, end_line: u32, end_offset: u32) -> Self {
        let (start_line, end_line) = if start_line <= end_line {
            (start_line, end_line)
        } else {
            (end_line, start_line)
        };
        let (start, end) = if start_offset <= end_offset {
            (start_offset, end_offset)
        } else {
            (end_offset, start_offset)
        };
        Self {
            start_line,
            end_line,
            range: TextRange::new(TextSize::from(start), TextSize::from(end)),
        }
    }

    /// A span that covers a single line.
    pub fn on_line(line: u32, start_offset: u32, end_offset: u32) -> Self {
        Self::new(line, start_offset, line, end_offset)
    }

    pub fn start_offset(&self) -> u32 {
        self.range.start().into()
    }

    pub fn end_offset(&self) -> u32 {
        self.range.end().into()
    }

    pub fn len(&self) -> u32 {
        self.range.len().into()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Check if an offset falls within this span (half-open).
    pub fn contains(&self, offset: u32) -> bool {
        self.range.contains(TextSize::from(offset))
    }

    /// Like [`Span::contains`] but also accepts the end offset, which is
    /// where a caret sits right after the last character.
    pub fn contains_inclusive(&self, offset: u32) -> bool {
        self.range.contains_inclusive(TextSize::from(offset))
    }

    /// Whether this span ends at or before the offset.
    pub fn precedes(&self, offset: u32) -> bool {
        self.end_offset() <= offset
    }

    /// Whether two spans share at least one offset.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start_offset() < other.end_offset() && other.start_offset() < self.end_offset()
    }

    /// The smallest span covering both.
    pub fn cover(&self, other: &Span) -> Span {
        let (start_line, start) = if self.start_offset() <= other.start_offset() {
            (self.start_line, self.start_offset())
        } else {
            (other.start_line, other.start_offset())
        };
        let (end_line, end) = if self.end_offset() >= other.end_offset() {
            (self.end_line, self.end_offset())
        } else {
            (other.end_line, other.end_offset())
        };
        Span::new(start_line, start, end_line, end)
    }
}
