//! Replacing a selection with zero or more lines.
//!
//! The selected span is removed first, collapsing the selection at its start.
//! The line holding that point is then cut in two (`before` / `after`) and the
//! replacement lines are stitched between the halves:
//!
//! ```text
//! lines[..i] ++ [before + r[0], r[1..n-1].., r[n-1] + after] ++ lines[i+1..]
//! ```
//!
//! The cursor ends on line `i + n - 1`, just before `after`.

use crate::cursor::{CursorPosition, Selection};
use crate::document::{byte_index, char_len};

/// Spaces inserted for the tab key.
pub const TAB_WIDTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spliced {
    pub lines: Vec<String>,
    pub cursor: CursorPosition,
}

/// Replaces `selection` inside `lines` with `replacement`.
///
/// An empty `replacement` behaves like `[""]`, i.e. a plain deletion. The
/// selection is clamped to `lines` before use; `lines` must not be empty.
pub fn splice_lines(lines: &[String], selection: Selection, replacement: &[String]) -> Spliced {
    debug_assert!(!lines.is_empty());
    let (start, end) = clamp(lines, selection);

    let first = &lines[start.line];
    let last = &lines[end.line];
    let before = &first[..byte_index(first, start.offset)];
    let after = &last[byte_index(last, end.offset)..];

    let replacement: &[String] = if replacement.is_empty() {
        &[String::new()]
    } else {
        replacement
    };
    let n = replacement.len();

    let mut out = Vec::with_capacity(lines.len() - (end.line - start.line) + n - 1);
    out.extend(lines[..start.line].iter().cloned());
    for (i, piece) in replacement.iter().enumerate() {
        let mut line = String::new();
        if i == 0 {
            line.push_str(before);
        }
        line.push_str(piece);
        if i == n - 1 {
            line.push_str(after);
        }
        out.push(line);
    }
    out.extend(lines[end.line + 1..].iter().cloned());

    let cursor_line = start.line + n - 1;
    let cursor = CursorPosition::new(cursor_line, char_len(&out[cursor_line]) - char_len(after));

    Spliced { lines: out, cursor }
}

/// Lines for a tab key press.
pub fn tab_replacement(width: usize) -> Vec<String> {
    vec![" ".repeat(width)]
}

/// Turns inserted text into replacement lines: breaks normalised, tabs
/// expanded to `tab_width` spaces.
pub fn text_replacement(text: &str, tab_width: usize) -> Vec<String> {
    let spaces = " ".repeat(tab_width);
    crate::document::split_lines(text)
        .into_iter()
        .map(|line| line.replace('\t', &spaces))
        .collect()
}

/// Widens a collapsed selection by one character backwards, joining with the
/// previous line at a line start. `None` at the very start of the document.
pub fn extend_backward(lines: &[String], at: CursorPosition) -> Option<Selection> {
    let (at, _) = clamp(lines, Selection::collapsed(at));
    let from = if at.offset > 0 {
        CursorPosition::new(at.line, at.offset - 1)
    } else if at.line > 0 {
        CursorPosition::new(at.line - 1, char_len(&lines[at.line - 1]))
    } else {
        return None;
    };
    Some(Selection::new(from, at))
}

/// Widens a collapsed selection by one character forwards, joining with the
/// next line at a line end. `None` at the very end of the document.
pub fn extend_forward(lines: &[String], at: CursorPosition) -> Option<Selection> {
    let (at, _) = clamp(lines, Selection::collapsed(at));
    let to = if at.offset < char_len(&lines[at.line]) {
        CursorPosition::new(at.line, at.offset + 1)
    } else if at.line + 1 < lines.len() {
        CursorPosition::new(at.line + 1, 0)
    } else {
        return None;
    };
    Some(Selection::new(at, to))
}

fn clamp(lines: &[String], selection: Selection) -> (CursorPosition, CursorPosition) {
    let clamp_one = |position: CursorPosition| {
        let line = position.line.min(lines.len() - 1);
        CursorPosition::new(line, position.offset.min(char_len(&lines[line])))
    };
    let (start, end) = selection.ordered();
    (clamp_one(start), clamp_one(end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn at(line: usize, offset: usize) -> Selection {
        Selection::collapsed(CursorPosition::new(line, offset))
    }

    #[test]
    fn test_multiline_insert_mid_line() {
        let result = splice_lines(&lines(&["hello"]), at(0, 2), &lines(&["a", "b"]));
        assert_eq!(result.lines, ["hea", "bllo"]);
        assert_eq!(result.cursor, CursorPosition::new(1, 1));
    }

    #[test]
    fn test_single_line_insert() {
        let result = splice_lines(&lines(&["one", "two"]), at(1, 3), &lines(&["!"]));
        assert_eq!(result.lines, ["one", "two!"]);
        assert_eq!(result.cursor, CursorPosition::new(1, 4));
    }

    #[test]
    fn test_three_line_insert_keeps_middle_lines() {
        let result = splice_lines(
            &lines(&["A", "xy", "Z"]),
            at(1, 1),
            &lines(&["1", "2", "3"]),
        );
        assert_eq!(result.lines, ["A", "x1", "2", "3y", "Z"]);
        assert_eq!(result.cursor, CursorPosition::new(3, 1));
    }

    #[test]
    fn test_replacing_multiline_selection() {
        let selection = Selection::new(CursorPosition::new(2, 1), CursorPosition::new(0, 2));
        let result = splice_lines(&lines(&["abcd", "efgh", "ijkl"]), selection, &lines(&["-"]));
        assert_eq!(result.lines, ["ab-jkl"]);
        assert_eq!(result.cursor, CursorPosition::new(0, 3));
    }

    #[test]
    fn test_empty_replacement_is_deletion() {
        let selection = Selection::new(CursorPosition::new(0, 1), CursorPosition::new(0, 3));
        let result = splice_lines(&lines(&["abcd"]), selection, &lines(&[""]));
        assert_eq!(result.lines, ["ad"]);
        assert_eq!(result.cursor, CursorPosition::new(0, 1));

        let result = splice_lines(&lines(&["abcd"]), selection, &[]);
        assert_eq!(result.lines, ["ad"]);
    }

    #[test]
    fn test_deleting_everything_leaves_one_line() {
        let selection = Selection::new(CursorPosition::new(0, 0), CursorPosition::new(1, 3));
        let result = splice_lines(&lines(&["abc", "def"]), selection, &lines(&[""]));
        assert_eq!(result.lines, [""]);
        assert_eq!(result.cursor, CursorPosition::ORIGIN);
    }

    #[test]
    fn test_tab_inserts_four_spaces() {
        let result = splice_lines(&lines(&["ab"]), at(0, 1), &tab_replacement(TAB_WIDTH));
        assert_eq!(result.lines, ["a    b"]);
        assert_eq!(result.cursor, CursorPosition::new(0, 5));
    }

    #[test]
    fn test_insert_into_empty_document() {
        let result = splice_lines(&lines(&[""]), at(0, 0), &lines(&["x", "", "y"]));
        assert_eq!(result.lines, ["x", "", "y"]);
        assert_eq!(result.cursor, CursorPosition::new(2, 1));
    }

    #[test]
    fn test_trailing_newline_paste_lands_on_fresh_line() {
        let result = splice_lines(&lines(&["ab"]), at(0, 2), &text_replacement("cd\n", 4));
        assert_eq!(result.lines, ["abcd", ""]);
        assert_eq!(result.cursor, CursorPosition::new(1, 0));
    }

    #[test]
    fn test_multibyte_offsets() {
        let result = splice_lines(&lines(&["日本語"]), at(0, 1), &lines(&["→", "←"]));
        assert_eq!(result.lines, ["日→", "←本語"]);
        assert_eq!(result.cursor, CursorPosition::new(1, 1));
    }

    #[test]
    fn test_out_of_range_selection_is_clamped() {
        let result = splice_lines(&lines(&["ab"]), at(5, 9), &lines(&["c"]));
        assert_eq!(result.lines, ["abc"]);
        assert_eq!(result.cursor, CursorPosition::new(0, 3));
    }

    #[test]
    fn test_text_replacement_expands_tabs_and_breaks() {
        assert_eq!(text_replacement("a\tb\r\nc", 2), ["a  b", "c"]);
        assert_eq!(text_replacement("", 4), [""]);
    }

    #[test]
    fn test_extend_backward() {
        let doc = lines(&["ab", "cd"]);
        assert_eq!(
            extend_backward(&doc, CursorPosition::new(1, 1)),
            Some(Selection::new(CursorPosition::new(1, 0), CursorPosition::new(1, 1)))
        );
        assert_eq!(
            extend_backward(&doc, CursorPosition::new(1, 0)),
            Some(Selection::new(CursorPosition::new(0, 2), CursorPosition::new(1, 0)))
        );
        assert_eq!(extend_backward(&doc, CursorPosition::ORIGIN), None);
    }

    #[test]
    fn test_extend_forward() {
        let doc = lines(&["ab", "cd"]);
        assert_eq!(
            extend_forward(&doc, CursorPosition::new(0, 2)),
            Some(Selection::new(CursorPosition::new(0, 2), CursorPosition::new(1, 0)))
        );
        assert_eq!(extend_forward(&doc, CursorPosition::new(1, 2)), None);
    }
}
