//! Byte-offset to line/column translation for diagnostic rendering.

/// Maps byte offsets to 1-based line and column numbers.
///
/// Columns count bytes, which is exact for ASCII source and stable enough
/// for caret-style diagnostic output.
pub struct SourceMap {
    line_starts: Vec<u32>,
}

impl SourceMap {
    pub fn new(source: &str) -> SourceMap {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i as u32 + 1),
        );
        SourceMap { line_starts }
    }

    /// 1-based (line, column) for a byte offset. Offsets past the end of the
    /// buffer land on the last line.
    pub fn line_col(&self, offset: u32) -> (usize, usize) {
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let col = offset.saturating_sub(self.line_starts[line]) as usize;
        (line + 1, col + 1)
    }
}
