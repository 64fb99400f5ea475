use txtcore::{CursorPosition, Selection, SelectionSurface, StyleTag};

/// What a session needs from the thing that shows the document: selection
/// access plus a way to repaint lines.
pub trait EditorSurface: SelectionSurface {
    /// Repaints the document. `changed` lists lines whose style differs from
    /// the previous redraw; a surface may use it to skip untouched lines.
    fn redraw(&mut self, lines: &[String], styles: &[StyleTag], changed: &[usize]);
}

/// In-memory surface for tools and tests. Keeps the last frame it was given.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    selection: Option<Selection>,
    lines: Vec<String>,
    styles: Vec<StyleTag>,
    redraws: usize,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates the user placing or dragging the selection.
    pub fn select(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }

    pub fn place_cursor(&mut self, line: usize, offset: usize) {
        self.select(Selection::collapsed(CursorPosition::new(line, offset)));
    }

    /// Simulates focus loss.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn styles(&self) -> &[StyleTag] {
        &self.styles
    }

    pub fn redraw_count(&self) -> usize {
        self.redraws
    }
}

impl SelectionSurface for HeadlessSurface {
    fn capture_selection(&self) -> Option<Selection> {
        self.selection
    }

    fn apply_selection(&mut self, position: CursorPosition) {
        self.selection = Some(Selection::collapsed(position));
    }
}

impl EditorSurface for HeadlessSurface {
    fn redraw(&mut self, lines: &[String], styles: &[StyleTag], _changed: &[usize]) {
        self.lines = lines.to_vec();
        self.styles = styles.to_vec();
        self.redraws += 1;
    }
}
