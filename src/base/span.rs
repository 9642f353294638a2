//! Line/column conversion over byte offsets.

pub use text_size::{TextRange, TextSize};

/// Zero-indexed line and column (column counted in chars).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// Maps byte offsets to line/column pairs and back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the first character of every line.
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];
        for (idx, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(TextSize::from(idx as u32 + 1));
            }
        }
        Self {
            line_starts,
            len: TextSize::of(text),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Line number containing the offset.
    pub fn line_of(&self, offset: TextSize) -> u32 {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line as u32,
            Err(next) => (next - 1) as u32,
        }
    }

    /// Convert a byte offset to a line/column pair.
    pub fn line_col(&self, text: &str, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = self.line_of(offset);
        let start = self.line_starts[line as usize];
        let col = text
            .get(usize::from(start)..usize::from(offset))
            .map(|s| s.chars().count() as u32)
            .unwrap_or(0);
        LineCol { line, col }
    }

    /// Convert a line/column pair to a byte offset.
    ///
    /// Returns `None` when the line does not exist. Columns past the end of
    /// the line clamp to the line end.
    pub fn offset(&self, text: &str, line_col: LineCol) -> Option<TextSize> {
        let start = *self.line_starts.get(line_col.line as usize)?;
        let end = self
            .line_starts
            .get(line_col.line as usize + 1)
            .copied()
            .unwrap_or(self.len);
        let line_text = text.get(usize::from(start)..usize::from(end))?;
        let line_text = line_text.strip_suffix('\n').unwrap_or(line_text);
        let byte_col: usize = line_text
            .chars()
            .take(line_col.col as usize)
            .map(char::len_utf8)
            .sum();
        Some(start + TextSize::from(byte_col as u32))
    }
}
