pub mod classify;
pub mod codec;
pub mod cursor;
pub mod document;
pub mod history;
pub mod splice;

pub use classify::{classify, LineClassifier, StyleTag};
pub use codec::CodecError;
pub use cursor::{CursorPosition, Selection, SelectionSurface};
pub use document::DocumentStore;
pub use history::{Snapshot, UndoRedoManager};
