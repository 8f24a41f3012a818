use crate::location::{Location, Position};
use std::sync::Arc;

/// A loaded source input and its line index.
///
/// The line index lets the reporter go from a `Location` back to a byte
/// offset when it wants to show the offending line.
#[derive(Debug, Clone)]
pub struct SourceFile {
    name: Arc<str>,
    contents: String,
    /// Byte offset of the first character of every line.
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(name: impl Into<Arc<str>>, contents: impl Into<String>) -> Self {
        let contents = contents.into();
        let line_starts = std::iter::once(0)
            .chain(contents.match_indices('\n').map(|(idx, _)| idx + 1))
            .collect();

        Self {
            name: name.into(),
            contents,
            line_starts,
        }
    }

    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Location of `byte_offset`, or `None` when the offset lies outside the
    /// file or splits a character.
    pub fn location_at(&self, byte_offset: usize) -> Option<Location> {
        if byte_offset > self.contents.len() || !self.contents.is_char_boundary(byte_offset) {
            return None;
        }

        let line_idx = match self.line_starts.binary_search(&byte_offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line_start = self.line_starts[line_idx];
        let column = self.contents[line_start..byte_offset].chars().count() + 1;

        Some(Location {
            file: self.name.clone(),
            position: Position::new(line_idx + 1, column),
        })
    }

    /// Byte offset of `position`. A column one past the last character of a
    /// line is accepted and maps to the line terminator.
    pub fn offset_of(&self, position: Position) -> Option<usize> {
        if position.line == 0 || position.column == 0 {
            return None;
        }
        let line_start = *self.line_starts.get(position.line - 1)?;
        let line = self.line_text(position.line)?;

        let mut chars = line.char_indices().map(|(idx, _)| idx).chain(std::iter::once(line.len()));
        chars.nth(position.column - 1).map(|idx| line_start + idx)
    }

    /// Text of the 1-based `line`, without its terminator.
    pub fn line_text(&self, line: usize) -> Option<&str> {
        let start = *self.line_starts.get(line.checked_sub(1)?)?;
        let end = self
            .line_starts
            .get(line)
            .map(|next| next - 1)
            .unwrap_or(self.contents.len());
        Some(self.contents[start..end].trim_end_matches('\r'))
    }
}
