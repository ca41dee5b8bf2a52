//! Line-indexed view over manifest text.

/// An immutable, line-indexed view of a manifest document.
///
/// Built per query from the live editor text. The view borrows the
/// text; no normalization is applied beyond splitting on `\n` (a
/// trailing `\r` from CRLF input is trimmed when lines are inspected).
#[derive(Debug, Clone)]
pub struct Document<'a> {
    lines: Vec<&'a str>,
}

impl<'a> Document<'a> {
    /// Create a document view over raw text.
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
        }
    }

    /// Number of lines in the document.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Get a line by 0-based index.
    pub fn line(&self, index: usize) -> Option<&'a str> {
        self.lines.get(index).copied()
    }

    /// Iterate over all lines.
    pub fn lines(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.lines.iter().copied()
    }

    /// Indentation (number of leading spaces) of a line.
    ///
    /// Returns `None` for out-of-range indices and for blank lines,
    /// which have no meaningful indentation of their own.
    pub fn indent_of(&self, index: usize) -> Option<usize> {
        let line = self.line(index)?;
        if line.trim().is_empty() {
            return None;
        }
        Some(line.len() - line.trim_start_matches(' ').len())
    }

    /// Whether a line is blank or a YAML comment.
    pub fn is_blank_or_comment(&self, index: usize) -> bool {
        match self.line(index) {
            Some(line) => {
                let trimmed = line.trim();
                trimmed.is_empty() || trimmed.starts_with('#')
            }
            None => false,
        }
    }

    /// Narrow the view to the line range `[start, end)`.
    ///
    /// Used to resolve nested blocks: callers first locate an enclosing
    /// block at root level, then slice to its range and query again.
    /// Line indices in the sliced view are relative to `start`.
    pub fn slice(&self, start: usize, end: usize) -> Document<'a> {
        let end = end.min(self.lines.len());
        let start = start.min(end);
        Document {
            lines: self.lines[start..end].to_vec(),
        }
    }
}
