//! The ordered line sequence that backs a document.

use crate::cursor::{CursorPosition, Selection};
use crate::splice::{self, Spliced};

/// Ordered lines of plain text. Never empty: an empty document is a single
/// empty line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentStore {
    lines: Vec<String>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
        }
    }

    pub fn from_text(text: &str) -> Self {
        let mut document = Self::new();
        document.set_from_text(text);
        document
    }

    /// Replaces every line with the lines of `text`. `\r\n` and lone `\r`
    /// count as line breaks.
    pub fn set_from_text(&mut self, text: &str) {
        self.lines = split_lines(text);
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Length of a line in characters; 0 past the end.
    pub fn line_len(&self, index: usize) -> usize {
        self.line(index).map(char_len).unwrap_or(0)
    }

    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }

    /// Position just after the last character of the last line.
    pub fn end(&self) -> CursorPosition {
        let line = self.lines.len() - 1;
        CursorPosition::new(line, self.line_len(line))
    }

    /// Replaces `selection` with `replacement` and returns where the cursor
    /// lands.
    pub fn splice(&mut self, selection: Selection, replacement: &[String]) -> CursorPosition {
        let Spliced { lines, cursor } = splice::splice_lines(&self.lines, selection, replacement);
        self.lines = lines;
        cursor
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits text into lines after normalising `\r\n` and `\r` to `\n`.
pub fn split_lines(text: &str) -> Vec<String> {
    normalize_line_breaks(text)
        .split('\n')
        .map(str::to_owned)
        .collect()
}

pub fn normalize_line_breaks(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte index of the `offset`-th character, clamped to the end of `text`.
pub(crate) fn byte_index(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}
