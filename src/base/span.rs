//! Source text positions and ranges.

use std::fmt;

// Re-export from text-size for compatibility
pub use text_size::TextRange;
pub use text_size::TextSize;

/// A line and column position in source text, as a code-completion request
/// reports it.
///
/// Both line and column are 1-indexed. The column counts UTF-8 bytes from the
/// start of the line.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct SourcePosition {
    /// 1-indexed line number
    pub line: u32,
    /// 1-indexed column (in UTF-8 bytes, not characters)
    pub column: u32,
}

impl SourcePosition {
    /// Create a new position from 1-indexed line and column.
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Compute the position of `offset` in `text` without building an index.
    ///
    /// The offset is clamped to `[0, text.len()]`. The line is one more than the
    /// number of `'\n'` bytes strictly before the offset.
    pub fn of_offset(text: &str, offset: usize) -> Self {
        let offset = offset.min(text.len());
        let before = &text.as_bytes()[..offset];
        let lines = before.iter().filter(|&&b| b == b'\n').count();
        let start_of_line = before
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |nl| nl + 1);

        Self {
            line: lines as u32 + 1,
            column: (offset - start_of_line) as u32 + 1,
        }
    }
}

impl fmt::Debug for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Index for converting between byte offsets and line/column positions.
#[derive(Clone, Debug)]
pub struct LineIndex {
    /// Byte offset of the start of each line
    line_starts: Vec<TextSize>,
    /// Total length of the indexed text
    len: TextSize,
}

impl LineIndex {
    /// Build a line index from source text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];

        for (offset, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(TextSize::from((offset + 1) as u32));
            }
        }

        Self {
            line_starts,
            len: TextSize::of(text),
        }
    }

    /// Clamp an offset to the indexed text.
    #[inline]
    pub fn clamp(&self, offset: TextSize) -> TextSize {
        offset.min(self.len)
    }

    /// Convert a byte offset to a 1-indexed position.
    ///
    /// Offsets past the end of the text are clamped to the end.
    pub fn position(&self, offset: TextSize) -> SourcePosition {
        let offset = self.clamp(offset);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);

        let line_start = self.line_starts[line];
        let col: u32 = (offset - line_start).into();

        SourcePosition {
            line: line as u32 + 1,
            column: col + 1,
        }
    }

    /// Convert a 1-indexed position back to a byte offset.
    pub fn offset(&self, position: SourcePosition) -> Option<TextSize> {
        let line = position.line.checked_sub(1)?;
        let column = position.column.checked_sub(1)?;
        let line_start = self.line_starts.get(line as usize)?;
        let offset = *line_start + TextSize::from(column);
        (offset <= self.len).then_some(offset)
    }

    /// Get the number of lines.
    pub fn len(&self) -> usize {
        self.line_starts.len()
    }

    /// Check if there are no lines (never true: empty text has one line).
    pub fn is_empty(&self) -> bool {
        self.line_starts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_display() {
        let pos = SourcePosition::new(1, 1);
        assert_eq!(format!("{}", pos), "1:1");

        let pos = SourcePosition::new(6, 11);
        assert_eq!(format!("{:?}", pos), "6:11");
    }

    #[test]
    fn test_of_offset_counts_newlines_before_offset() {
        let text = "ab\ncd\n\nef";
        assert_eq!(SourcePosition::of_offset(text, 0), SourcePosition::new(1, 1));
        assert_eq!(SourcePosition::of_offset(text, 2), SourcePosition::new(1, 3));
        // offset of the '\n' itself is still on the first line
        assert_eq!(SourcePosition::of_offset(text, 3), SourcePosition::new(2, 1));
        assert_eq!(SourcePosition::of_offset(text, 6), SourcePosition::new(3, 1));
        assert_eq!(SourcePosition::of_offset(text, 8), SourcePosition::new(4, 2));
    }

    #[test]
    fn test_of_offset_clamps() {
        let text = "one\ntwo";
        assert_eq!(SourcePosition::of_offset(text, 999), SourcePosition::new(2, 4));
        assert_eq!(SourcePosition::of_offset("", 5), SourcePosition::new(1, 1));
    }

    #[test]
    fn test_line_index_multi_line() {
        let index = LineIndex::new("hello\nworld\n!");

        assert_eq!(index.position(TextSize::from(0)), SourcePosition::new(1, 1));
        assert_eq!(index.position(TextSize::from(5)), SourcePosition::new(1, 6));
        assert_eq!(index.position(TextSize::from(6)), SourcePosition::new(2, 1));
        assert_eq!(index.position(TextSize::from(11)), SourcePosition::new(2, 6));
        assert_eq!(index.position(TextSize::from(12)), SourcePosition::new(3, 1));
        assert_eq!(index.position(TextSize::from(40)), SourcePosition::new(3, 2));
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_line_index_agrees_with_of_offset() {
        let text = "namespace a {\n  int x;\n}\n";
        let index = LineIndex::new(text);
        for offset in 0..=text.len() {
            assert_eq!(
                index.position(TextSize::from(offset as u32)),
                SourcePosition::of_offset(text, offset),
                "mismatch at offset {offset}"
            );
        }
    }

    #[test]
    fn test_line_index_offset() {
        let index = LineIndex::new("hello\nworld");

        assert_eq!(index.offset(SourcePosition::new(1, 1)), Some(TextSize::from(0)));
        assert_eq!(index.offset(SourcePosition::new(2, 1)), Some(TextSize::from(6)));
        assert_eq!(index.offset(SourcePosition::new(2, 4)), Some(TextSize::from(9)));
        assert_eq!(index.offset(SourcePosition::new(0, 1)), None);
        assert_eq!(index.offset(SourcePosition::new(3, 1)), None);
    }
}
