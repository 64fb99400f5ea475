//! Logical cursor positions and the bridge to whatever surface displays the
//! document and owns the live selection.

use serde::{Deserialize, Serialize};

use crate::document::DocumentStore;

/// A (line, character offset) point inside a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CursorPosition {
    pub line: usize,
    pub offset: usize,
}

impl CursorPosition {
    pub const ORIGIN: CursorPosition = CursorPosition { line: 0, offset: 0 };

    pub fn new(line: usize, offset: usize) -> Self {
        Self { line, offset }
    }

    /// Clamps the line to the document and the offset to that line's length.
    pub fn clamped(self, document: &DocumentStore) -> Self {
        let line = self.line.min(document.line_count() - 1);
        let offset = self.offset.min(document.line_len(line));
        Self { line, offset }
    }
}

/// A selection as reported by the surface. `anchor` and `head` may come in
/// either order; a collapsed selection has them equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: CursorPosition,
    pub head: CursorPosition,
}

impl Selection {
    pub fn new(anchor: CursorPosition, head: CursorPosition) -> Self {
        Self { anchor, head }
    }

    pub fn collapsed(at: CursorPosition) -> Self {
        Self::new(at, at)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    /// Start and end in document order.
    pub fn ordered(&self) -> (CursorPosition, CursorPosition) {
        if self.anchor <= self.head {
            (self.anchor, self.head)
        } else {
            (self.head, self.anchor)
        }
    }

    pub fn start(&self) -> CursorPosition {
        self.ordered().0
    }

    pub fn clamped(self, document: &DocumentStore) -> Self {
        Self::new(self.anchor.clamped(document), self.head.clamped(document))
    }
}

/// Capability a rendering surface exposes so the core can read and place
/// the selection without touching surface internals.
pub trait SelectionSurface {
    /// The active selection in logical coordinates, if the surface has one.
    fn capture_selection(&self) -> Option<Selection>;

    /// Collapses the surface's selection at `position`.
    fn apply_selection(&mut self, position: CursorPosition);
}

/// Active selection clamped to the document, or `None` if the surface has no
/// selection.
pub fn capture_selection<S: SelectionSurface + ?Sized>(
    surface: &S,
    document: &DocumentStore,
) -> Option<Selection> {
    surface
        .capture_selection()
        .map(|selection| selection.clamped(document))
}

/// Start of the active selection, or the origin when there is none.
pub fn capture<S: SelectionSurface + ?Sized>(surface: &S, document: &DocumentStore) -> CursorPosition {
    capture_selection(surface, document)
        .map(|selection| selection.start())
        .unwrap_or(CursorPosition::ORIGIN)
}

/// Clamps `position` to the document and hands it to the surface. Returns the
/// position actually applied.
pub fn restore<S: SelectionSurface + ?Sized>(
    surface: &mut S,
    document: &DocumentStore,
    position: CursorPosition,
) -> CursorPosition {
    let position = position.clamped(document);
    surface.apply_selection(position);
    position
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeSurface {
        selection: Option<Selection>,
    }

    impl SelectionSurface for FakeSurface {
        fn capture_selection(&self) -> Option<Selection> {
            self.selection
        }

        fn apply_selection(&mut self, position: CursorPosition) {
            self.selection = Some(Selection::collapsed(position));
        }
    }

    #[test]
    fn test_capture_without_selection_is_origin() {
        let document = DocumentStore::from_text("abc\ndef");
        let surface = FakeSurface::default();
        assert_eq!(capture(&surface, &document), CursorPosition::ORIGIN);
    }

    #[test]
    fn test_capture_returns_selection_start() {
        let document = DocumentStore::from_text("abc\ndef");
        let surface = FakeSurface {
            selection: Some(Selection::new(
                CursorPosition::new(1, 2),
                CursorPosition::new(0, 1),
            )),
        };
        assert_eq!(capture(&surface, &document), CursorPosition::new(0, 1));
    }

    #[test]
    fn test_capture_clamps_out_of_range_selection() {
        let document = DocumentStore::from_text("abc");
        let surface = FakeSurface {
            selection: Some(Selection::collapsed(CursorPosition::new(4, 10))),
        };
        assert_eq!(capture(&surface, &document), CursorPosition::new(0, 3));
    }

    #[test]
    fn test_restore_clamps_to_document() {
        let document = DocumentStore::from_text("abc\n\nxy");
        let mut surface = FakeSurface::default();

        let applied = restore(&mut surface, &document, CursorPosition::new(9, 9));
        assert_eq!(applied, CursorPosition::new(2, 2));

        // Empty target line collapses to its start.
        let applied = restore(&mut surface, &document, CursorPosition::new(1, 5));
        assert_eq!(applied, CursorPosition::new(1, 0));
        assert_eq!(
            surface.capture_selection(),
            Some(Selection::collapsed(CursorPosition::new(1, 0)))
        );
    }

    #[test]
    fn test_selection_ordering() {
        let a = CursorPosition::new(2, 0);
        let b = CursorPosition::new(1, 7);
        let selection = Selection::new(a, b);
        assert_eq!(selection.ordered(), (b, a));
        assert!(!selection.is_collapsed());
        assert!(Selection::collapsed(a).is_collapsed());
    }
}
